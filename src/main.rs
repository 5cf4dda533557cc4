// src/main.rs
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use wallet_session::{
    AccessKeyRecord, Credentials, HttpTransport, WalletConfig, WalletError, WalletService,
};

#[derive(Parser)]
#[command(name = "wallet-session")]
#[command(about = "Talk to the wallet backend: sessions, payloads, PIN access")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Negotiate a session and print its ID
    Session { guid: String },
    /// Negotiate a session and fetch the encrypted payload
    Payload { guid: String },
    /// Fetch the pairing encryption password
    Pairing { guid: String },
    /// Register an access key for a PIN (random key/value when omitted)
    SetPin {
        pin: String,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        value: Option<String>,
    },
    /// Validate a PIN against a registered access key
    CheckPin { key: String, pin: String },
    /// Validate a PIN, then open a session and fetch the payload
    Unlock { guid: String, key: String, pin: String },
    /// Log an analytics event
    Event { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = WalletConfig::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    let transport = HttpTransport::new(&config).context("building HTTP client")?;
    let svc = WalletService::new(transport);
    info!("using wallet backend at {}", config.api_url);

    match cli.command {
        Commands::Session { guid } => {
            let token = svc.get_session_id(&guid).await?;
            println!("{}", token.as_str());
        }
        Commands::Payload { guid } => {
            let token = svc.get_session_id(&guid).await?;
            let payload = svc.get_encrypted_payload(&guid, &token).await?;
            println!("{}", String::from_utf8_lossy(&payload.0));
        }
        Commands::Pairing { guid } => {
            let password = svc.get_pairing_encryption_password(&guid).await?;
            println!("{}", password.0);
        }
        Commands::SetPin { pin, key, value } => {
            let mut record = AccessKeyRecord::generate(&pin);
            if let Some(key) = key {
                record.key = key;
            }
            if let Some(value) = value {
                record.value = value;
            }
            let status = svc.set_access_record(&record).await?;
            println!("{}", serde_json::to_string_pretty(&record_summary(&record, status.is_success()))?);
        }
        Commands::CheckPin { key, pin } => {
            let status = check(&svc, &key, &pin).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Unlock { guid, key, pin } => {
            let creds = Credentials { guid, pin };
            let status = check(&svc, &key, &creds.pin).await?;
            if !status.is_success() {
                anyhow::bail!("PIN validation did not succeed");
            }
            let token = svc.get_session_id(&creds.guid).await?;
            let payload = svc.get_encrypted_payload(&creds.guid, &token).await?;
            println!("{}", String::from_utf8_lossy(&payload.0));
            svc.log_event_best_effort("wallet_unlock").await;
        }
        Commands::Event { name } => {
            let status = svc.log_event(&name).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

async fn check(
    svc: &WalletService<HttpTransport>,
    key: &str,
    pin: &str,
) -> anyhow::Result<wallet_session::StatusResult> {
    match svc.validate_access(key, pin).await {
        Err(WalletError::InvalidCredentials) => {
            error!("incorrect PIN");
            anyhow::bail!("incorrect PIN")
        }
        other => Ok(other?),
    }
}

fn record_summary(record: &AccessKeyRecord, ok: bool) -> serde_json::Value {
    serde_json::json!({ "key": record.key, "value": record.value, "success": ok })
}
