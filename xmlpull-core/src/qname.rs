//! Qualified names (`prefix:local`).
//!
//! A `QName` is the name form used for element tags and attribute keys.
//! Prefixes are not resolved here - resolution against in-scope namespace
//! bindings happens in [`crate::ns`].

use std::fmt;

use memchr::memchr;
use unicode_xid::UnicodeXID;

/// A qualified XML name: optional prefix plus local part.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName {
    prefix: Option<String>,
    local: String,
}

impl QName {
    /// Create an unprefixed name. The local part is taken as-is.
    pub fn new(local: impl Into<String>) -> Self {
        QName { prefix: None, local: local.into() }
    }

    /// Create a prefixed name. Both parts are taken as-is.
    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        QName { prefix: Some(prefix.into()), local: local.into() }
    }

    /// Parse `local` or `prefix:local`, validating both halves as XML names.
    ///
    /// The split happens at the first `:`; a second colon lands in the local
    /// part and fails validation there.
    pub fn parse(text: &str) -> Result<Self, NameError> {
        let qname = match memchr(b':', text.as_bytes()) {
            Some(pos) => QName {
                prefix: Some(text[..pos].to_owned()),
                local: text[pos + 1..].to_owned(),
            },
            None => QName { prefix: None, local: text.to_owned() },
        };

        if let Some(prefix) = &qname.prefix {
            if !is_name(prefix) {
                return Err(NameError { text: text.to_owned() });
            }
        }
        if !is_name(&qname.local) {
            return Err(NameError { text: text.to_owned() });
        }
        Ok(qname)
    }

    /// The prefix, if any.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The local part.
    #[inline]
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Error for text that is not a valid XML name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameError {
    /// The offending text.
    pub text: String,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid XML name: {:?}", self.text)
    }
}

impl std::error::Error for NameError {}

/// Check NCName validity: NameStartChar then NameChar*.
///
/// Approximated with XID classes, which track the XML 1.0 fifth-edition
/// name productions closely enough for real-world documents.
fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_xid_start() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_xid_continue() || c == '-' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let name = QName::parse("div").unwrap();
        assert_eq!(name.prefix(), None);
        assert_eq!(name.local(), "div");
    }

    #[test]
    fn test_parse_prefixed() {
        let name = QName::parse("svg:rect").unwrap();
        assert_eq!(name.prefix(), Some("svg"));
        assert_eq!(name.local(), "rect");
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        assert!(QName::parse("").is_err());
        assert!(QName::parse(":local").is_err());
        assert!(QName::parse("prefix:").is_err());
        assert!(QName::parse("a:b:c").is_err());
        assert!(QName::parse("1bad").is_err());
        assert!(QName::parse("no spaces").is_err());
    }

    #[test]
    fn test_parse_allows_name_punctuation() {
        assert!(QName::parse("x-y.z").is_ok());
        assert!(QName::parse("_private").is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(QName::new("a").to_string(), "a");
        assert_eq!(QName::prefixed("x", "b").to_string(), "x:b");
    }
}
