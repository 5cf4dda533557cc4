// src/cookie.rs

pub const SESSION_FIELD: &str = "SID";

/// Ordered fields of a cookie-style header value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieFields<'a> {
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> CookieFields<'a> {
    /// Splits on `;` plus any following whitespace. Attributes without `=`
    /// (`HttpOnly`, `Secure`) become fields with an empty value.
    pub fn parse(header: &'a str) -> Self {
        let fields = header
            .split(';')
            .map(|f| f.trim_start())
            .filter(|f| !f.is_empty())
            .map(|f| f.split_once('=').unwrap_or((f, "")))
            .collect();
        Self { fields }
    }

    /// Value of the first field named exactly `name`.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

/// First non-empty `SID` across the given header values, in order.
pub fn session_id<'a, I>(headers: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .find_map(|h| CookieFields::parse(h).get(SESSION_FIELD).filter(|v| !v.is_empty()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_sid_before_attributes() {
        let c = CookieFields::parse("SID=abc123; Path=/; HttpOnly");
        assert_eq!(c.get("SID"), Some("abc123"));
        assert_eq!(c.get("HttpOnly"), Some(""));
        assert_eq!(c.fields.len(), 3);
    }

    #[test]
    fn first_exact_match_wins() {
        let c = CookieFields::parse("XSID=no;sid=lower;  SID=first; SID=second");
        assert_eq!(c.get("SID"), Some("first"));
    }

    #[test]
    fn value_may_contain_equals() {
        let c = CookieFields::parse("Path=/; SID=a=b==");
        assert_eq!(c.get("SID"), Some("a=b=="));
    }

    #[test]
    fn missing_field_is_none() {
        assert_eq!(CookieFields::parse("Path=/; Secure").get("SID"), None);
        assert!(CookieFields::parse("").fields.is_empty());
    }

    #[test]
    fn session_id_scans_every_header() {
        let headers = ["lang=en; Path=/", "SID=", "Domain=x; SID=tok; HttpOnly"];
        assert_eq!(session_id(headers), Some("tok".to_string()));
        assert_eq!(session_id(["Path=/"]), None);
    }
}
