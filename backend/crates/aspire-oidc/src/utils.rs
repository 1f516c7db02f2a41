// JWT payload inspection without signature verification.
//
// Used only as a routing step: the `aud` claim selects which platform
// registration (and therefore which key material) verifies the token.
// Nothing read here is trusted until the selected validator accepts it.

use crate::error::OidcError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;

fn decode_payload_unverified(token: &str) -> Result<Value, OidcError> {
    let parts: Vec<&str> = token.splitn(3, '.').collect();
    if parts.len() < 3 {
        return Err(OidcError::JwtValidationFailed(
            "Invalid JWT format: expected 3 segments".into(),
        ));
    }

    let payload_bytes = URL_SAFE_NO_PAD.decode(parts[1]).map_err(|e| {
        OidcError::JwtValidationFailed(format!("Invalid JWT payload base64: {}", e))
    })?;

    serde_json::from_slice(&payload_bytes)
        .map_err(|e| OidcError::JwtValidationFailed(format!("Invalid JWT payload JSON: {}", e)))
}

/// Extract the `aud` claim (string or array) **without verifying the signature**.
pub fn extract_audience_unverified(token: &str) -> Result<Vec<String>, OidcError> {
    let audiences: Vec<String> = match decode_payload_unverified(token)?.get("aud") {
        Some(Value::String(aud)) => vec![aud.clone()],
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    if audiences.is_empty() {
        return Err(OidcError::MissingClaim("aud"));
    }
    Ok(audiences)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_extract_audience_string_and_array() {
        let token = unsigned(r#"{"aud":"c1"}"#);
        assert_eq!(extract_audience_unverified(&token).unwrap(), vec!["c1"]);

        let token = unsigned(r#"{"aud":["c1","c2"]}"#);
        assert_eq!(extract_audience_unverified(&token).unwrap(), vec!["c1", "c2"]);
    }

    #[test]
    fn test_missing_audience() {
        let token = unsigned(r#"{"iss":"x"}"#);
        assert!(matches!(
            extract_audience_unverified(&token),
            Err(OidcError::MissingClaim("aud"))
        ));
    }

    #[test]
    fn test_malformed_token() {
        assert!(extract_audience_unverified("not-a-jwt").is_err());
        assert!(extract_audience_unverified("a.!!!.c").is_err());
    }
}
