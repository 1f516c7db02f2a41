use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Where the browser keeps the session identifier once the launch completes.
///
/// `Cookie` uses the HttpOnly session cookie. Anything else (the platform's
/// `lti_storage_target`, typically a postMessage storage frame) is kept by
/// name and the identifier travels in a request header instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StorageTarget {
    #[default]
    Cookie,
    Other(String),
}

impl StorageTarget {
    pub fn from_param(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("cookie") {
            StorageTarget::Cookie
        } else {
            StorageTarget::Other(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StorageTarget::Cookie => "cookie",
            StorageTarget::Other(name) => name,
        }
    }

    #[inline]
    pub fn is_cookie(&self) -> bool {
        matches!(self, StorageTarget::Cookie)
    }
}

impl fmt::Display for StorageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StorageTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StorageTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(StorageTarget::from_param(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_param() {
        assert_eq!(StorageTarget::from_param("cookie"), StorageTarget::Cookie);
        assert_eq!(StorageTarget::from_param("COOKIE"), StorageTarget::Cookie);
        assert_eq!(StorageTarget::from_param(""), StorageTarget::Cookie);
        assert_eq!(
            StorageTarget::from_param("_parent"),
            StorageTarget::Other("_parent".to_string())
        );
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let target = StorageTarget::Other("_parent".to_string());
        assert_eq!(serde_json::to_string(&target).unwrap(), "\"_parent\"");

        let parsed: StorageTarget = serde_json::from_str("\"cookie\"").unwrap();
        assert!(parsed.is_cookie());
    }
}
