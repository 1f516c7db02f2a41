//! Tool-signed LTI messages.
//!
//! The tool holds an RSA private key whose public half is published at
//! `/lti/public_jwk`. The local launch simulator uses it to mint the
//! `id_token` a platform would normally post back.

use crate::error::OidcError;
use aspire_commons::constants::LTI_CUSTOM_CLAIM;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::Path;

pub const LTI_MESSAGE_TYPE_CLAIM: &str = "https://purl.imsglobal.org/spec/lti/claim/message_type";
pub const LTI_VERSION_CLAIM: &str = "https://purl.imsglobal.org/spec/lti/claim/version";

const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 300;

/// Claims for one tool-minted launch token.
#[derive(Debug, Clone)]
pub struct LaunchClaims {
    pub audience: String,
    pub nonce: String,
    pub subject: String,
    pub custom: Map<String, Value>,
}

#[derive(Clone)]
pub struct ToolSigner {
    key: EncodingKey,
    key_id: Option<String>,
    issuer: String,
    lifetime_seconds: i64,
}

impl fmt::Debug for ToolSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSigner")
            .field("key_id", &self.key_id)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl ToolSigner {
    pub fn from_rsa_pem(
        pem: &[u8],
        key_id: Option<String>,
        issuer: impl Into<String>,
    ) -> Result<Self, OidcError> {
        let key = EncodingKey::from_rsa_pem(pem)
            .map_err(|e| OidcError::InvalidKeyFormat(format!("Invalid RSA private key: {}", e)))?;
        Ok(Self {
            key,
            key_id,
            issuer: issuer.into(),
            lifetime_seconds: DEFAULT_TOKEN_LIFETIME_SECONDS,
        })
    }

    /// Read an RSA private key (PEM) from disk.
    pub fn from_pem_file<P: AsRef<Path>>(
        path: P,
        key_id: Option<String>,
        issuer: impl Into<String>,
    ) -> Result<Self, OidcError> {
        let path = path.as_ref();
        let pem = std::fs::read(path).map_err(|e| {
            OidcError::InvalidKeyFormat(format!(
                "Failed to read private key '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_rsa_pem(&pem, key_id, issuer)
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// Sign an RS256 resource-link launch token.
    pub fn mint_id_token(&self, claims: &LaunchClaims) -> Result<String, OidcError> {
        let now = chrono::Utc::now().timestamp();
        let payload = json!({
            "iss": self.issuer,
            "aud": claims.audience,
            "sub": claims.subject,
            "iat": now,
            "exp": now + self.lifetime_seconds,
            "nonce": claims.nonce,
            LTI_MESSAGE_TYPE_CLAIM: "LtiResourceLinkRequest",
            LTI_VERSION_CLAIM: "1.3.0",
            LTI_CUSTOM_CLAIM: claims.custom,
        });

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();
        encode(&header, &payload, &self.key)
            .map_err(|e| OidcError::InvalidKeyFormat(format!("Failed to sign token: {}", e)))
    }
}
