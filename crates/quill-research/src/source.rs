//! Source attribution for research results

use url::Url;

/// Display name for a URL's origin: its host with a leading `www.` removed
///
/// An explicit port is kept (`host:port`). Unparseable input yields an empty
/// string so attribution never fails.
pub fn source_name(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    let host = parsed.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Whether a URL has both a scheme and a host
pub fn is_fetchable(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_www() {
        assert_eq!(source_name("https://www.mckinsey.com/insights/retail"), "mckinsey.com");
        assert_eq!(source_name("http://x"), "x");
    }

    #[test]
    fn test_keeps_subdomains_and_ports() {
        assert_eq!(source_name("https://blog.example.com/a"), "blog.example.com");
        assert_eq!(source_name("http://127.0.0.1:8080/page"), "127.0.0.1:8080");
        assert_eq!(source_name("https://example.com:443/"), "example.com");
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(source_name("not a url"), "");
        assert!(!is_fetchable("not a url"));
        assert!(!is_fetchable("mailto:someone@example.com"));
        assert!(is_fetchable("https://example.com"));
    }
}
