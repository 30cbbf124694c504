//! Raw query-string access.
//!
//! Values are returned exactly as they appear in the URL so that routed
//! parameters survive byte-for-byte. Use [`decode`] when the content matters.

use std::borrow::Cow;
use url::Url;

/// First raw value for `name`. Empty values count as absent.
pub fn raw_param<'a>(url: &'a Url, name: &str) -> Option<&'a str> {
    url.query()?
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| decode(key).as_deref() == Some(name))
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Percent-decode a query component. `+` is kept as a literal plus so
/// base64 payloads are not corrupted.
pub fn decode(raw: &str) -> Option<Cow<'_, str>> {
    urlencoding::decode(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_raw_param_keeps_encoding() {
        let u = url("https://a.example/?event=ab%2Bc+d%3D&x=1");
        assert_eq!(raw_param(&u, "event"), Some("ab%2Bc+d%3D"));
        assert_eq!(raw_param(&u, "x"), Some("1"));
    }

    #[test]
    fn test_raw_param_first_occurrence_wins() {
        let u = url("https://a.example/?c=first&c=second");
        assert_eq!(raw_param(&u, "c"), Some("first"));
    }

    #[test]
    fn test_empty_or_missing_param_is_absent() {
        let u = url("https://a.example/?c=&flag");
        assert_eq!(raw_param(&u, "c"), None);
        assert_eq!(raw_param(&u, "flag"), None);
        assert_eq!(raw_param(&url("https://a.example/"), "c"), None);
    }

    #[test]
    fn test_decode_keeps_plus() {
        assert_eq!(decode("a+b%3D").as_deref(), Some("a+b="));
    }
}
