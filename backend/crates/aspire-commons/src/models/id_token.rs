use crate::constants::{COURSE_ID_KEY, LTI_CUSTOM_CLAIM};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validated claim set asserted by the platform.
///
/// Immutable once constructed. Claim values keep their JSON shape; the
/// accessors below cover the claims the gateway reads so callers never
/// walk the raw map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdToken(Map<String, Value>);

impl IdToken {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Raw claim lookup.
    #[inline]
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    /// Claim value when it is a JSON string.
    pub fn str_claim(&self, claim: &str) -> Option<&str> {
        self.0.get(claim).and_then(Value::as_str)
    }

    pub fn issuer(&self) -> Option<&str> {
        self.str_claim("iss")
    }

    pub fn subject(&self) -> Option<&str> {
        self.str_claim("sub")
    }

    pub fn nonce(&self) -> Option<&str> {
        self.str_claim("nonce")
    }

    /// `aud` may be a single string or an array of strings.
    pub fn audiences(&self) -> Vec<&str> {
        match self.0.get("aud") {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn has_audience(&self, client_id: &str) -> bool {
        self.audiences().iter().any(|aud| *aud == client_id)
    }

    /// The LTI custom-claims sub-map, if the platform sent one.
    pub fn custom_claims(&self) -> Option<&Map<String, Value>> {
        self.0.get(LTI_CUSTOM_CLAIM).and_then(Value::as_object)
    }

    pub fn custom_claim(&self, key: &str) -> Option<&Value> {
        self.custom_claims().and_then(|custom| custom.get(key))
    }

    /// Course identifier from the custom claims. Platforms substitute
    /// variables as strings, so numeric strings are accepted.
    pub fn course_id(&self) -> Option<i64> {
        match self.custom_claim(COURSE_ID_KEY)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for IdToken {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(value: Value) -> IdToken {
        match value {
            Value::Object(map) => IdToken::new(map),
            _ => panic!("claims must be an object"),
        }
    }

    #[test]
    fn test_standard_claims() {
        let claims = token(json!({
            "iss": "https://canvas.instructure.com",
            "sub": "user-1",
            "nonce": "abc",
            "aud": "client-1"
        }));

        assert_eq!(claims.issuer(), Some("https://canvas.instructure.com"));
        assert_eq!(claims.subject(), Some("user-1"));
        assert_eq!(claims.nonce(), Some("abc"));
        assert_eq!(claims.audiences(), vec!["client-1"]);
        assert!(claims.has_audience("client-1"));
        assert!(!claims.has_audience("client-2"));
    }

    #[test]
    fn test_audience_array() {
        let claims = token(json!({ "aud": ["client-1", "client-2", 7] }));
        assert_eq!(claims.audiences(), vec!["client-1", "client-2"]);
        assert!(claims.has_audience("client-2"));
    }

    #[test]
    fn test_custom_claims_and_course_id() {
        let claims = token(json!({
            LTI_CUSTOM_CLAIM: { "course_id": "42", "roles": "StudentEnrollment" }
        }));
        assert_eq!(claims.course_id(), Some(42));
        assert_eq!(
            claims.custom_claim("roles").and_then(Value::as_str),
            Some("StudentEnrollment")
        );

        let numeric = token(json!({ LTI_CUSTOM_CLAIM: { "course_id": 7 } }));
        assert_eq!(numeric.course_id(), Some(7));

        let missing = token(json!({ "iss": "x" }));
        assert!(missing.custom_claims().is_none());
        assert_eq!(missing.course_id(), None);
    }
}
