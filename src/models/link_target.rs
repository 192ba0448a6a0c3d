use std::fmt;

use serde::{Serialize, Serializer};
use url::Url;

use crate::error::LinkError;

/// An autolinked URL discovered in page markup.
///
/// Two targets are equal when their normalized URLs are equal: the WHATWG
/// serialization with the fragment stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkTarget(Url);

impl LinkTarget {
    pub fn parse(raw: &str) -> Result<Self, LinkError> {
        let raw = raw.trim();
        let mut url = Url::parse(raw).map_err(|e| LinkError::Invalid {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(LinkError::UnsupportedScheme(other.to_string())),
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(LinkError::MissingHost(raw.to_string()));
        }

        url.set_fragment(None);
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LinkTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_url() {
        let target = LinkTarget::parse("https://github.com/boykush/scraps").unwrap();
        assert_eq!(target.as_str(), "https://github.com/boykush/scraps");
        assert_eq!(target.host(), "github.com");
    }

    #[test]
    fn normalizes_host_case_and_default_port() {
        let a = LinkTarget::parse("HTTPS://GitHub.com:443/boykush/scraps").unwrap();
        let b = LinkTarget::parse("https://github.com/boykush/scraps").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strips_fragment() {
        let target = LinkTarget::parse("https://example.com/page#section").unwrap();
        assert_eq!(target.as_str(), "https://example.com/page");
    }

    #[test]
    fn adds_root_path_to_bare_host() {
        let target = LinkTarget::parse("https://example.com").unwrap();
        assert_eq!(target.as_str(), "https://example.com/");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let target = LinkTarget::parse("  https://example.com/a \n").unwrap();
        assert_eq!(target.as_str(), "https://example.com/a");
    }

    #[test]
    fn rejects_relative_url() {
        let err = LinkTarget::parse("/scraps/autolink.html").unwrap_err();
        assert!(matches!(err, LinkError::Invalid { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = LinkTarget::parse("ftp://example.com/file").unwrap_err();
        assert_eq!(err, LinkError::UnsupportedScheme("ftp".into()));
    }

    #[test]
    fn rejects_mailto() {
        let err = LinkTarget::parse("mailto:someone@example.com").unwrap_err();
        assert_eq!(err, LinkError::UnsupportedScheme("mailto".into()));
    }

    #[test]
    fn serializes_as_plain_string() {
        let target = LinkTarget::parse("https://example.com/a").unwrap();
        let json = serde_json::to_string(&target).unwrap();
        assert_eq!(json, r#""https://example.com/a""#);
    }
}
