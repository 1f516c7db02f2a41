//! Platform key material.
//!
//! A [`KeySource`] turns a token header into the [`DecodingKey`] that must
//! verify it. Platforms either publish a JWKS endpoint ([`JwksKeySource`])
//! or hand the tool a key out of band ([`StaticKeySource`]).

use crate::error::OidcError;
use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{DecodingKey, Header};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

#[async_trait]
pub trait KeySource: Send + Sync {
    /// Resolve the key that verifies a token with this header.
    async fn decoding_key(&self, header: &Header) -> Result<DecodingKey, OidcError>;
}

fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, OidcError> {
    DecodingKey::from_jwk(jwk).map_err(|e| OidcError::InvalidKeyFormat(e.to_string()))
}

fn index_by_kid(jwks: JwkSet) -> HashMap<String, Jwk> {
    let mut keys = HashMap::new();
    for jwk in jwks.keys {
        if let Some(kid) = jwk.common.key_id.clone() {
            log::debug!("Caching key: {}", kid);
            keys.insert(kid, jwk);
        }
    }
    keys
}

/// Keys fetched from a platform JWKS endpoint and cached by `kid`.
///
/// An unknown `kid` triggers one refresh, which picks up rotated keys.
/// The fetch happens while only this source's own lock is involved.
#[derive(Clone)]
pub struct JwksKeySource {
    jwks_uri: String,
    client: reqwest::Client,
    jwks_cache: Arc<RwLock<HashMap<String, Jwk>>>,
}

impl JwksKeySource {
    pub fn new(jwks_uri: impl Into<String>) -> Self {
        Self::with_client(jwks_uri, reqwest::Client::new())
    }

    pub fn with_client(jwks_uri: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            jwks_uri: jwks_uri.into(),
            client,
            jwks_cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }

    /// Look up a JWK by `kid`. Refreshes the cache on miss.
    async fn get_jwk(&self, kid: &str) -> Result<Jwk, OidcError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(jwk) = cache.get(kid) {
                return Ok(jwk.clone());
            }
        }

        self.refresh_jwks_cache().await?;

        let cache = self.jwks_cache.read().await;
        cache
            .get(kid)
            .cloned()
            .ok_or_else(|| OidcError::KeyNotFound(kid.to_string()))
    }

    /// Fetch the JWKS and replace the cache if the key ids changed.
    pub async fn refresh_jwks_cache(&self) -> Result<(), OidcError> {
        log::info!("Refreshing JWKS cache from {}", self.jwks_uri);

        let new_keys = index_by_kid(self.fetch_jwks().await?);

        let needs_update = {
            let cache = self.jwks_cache.read().await;
            new_keys.len() != cache.len() || new_keys.keys().any(|kid| !cache.contains_key(kid))
        };

        if needs_update {
            let mut cache = self.jwks_cache.write().await;
            *cache = new_keys;
            log::info!(
                "JWKS cache refreshed with {} keys from {}",
                cache.len(),
                self.jwks_uri
            );
        } else {
            log::debug!("JWKS cache unchanged for {}", self.jwks_uri);
        }

        Ok(())
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, OidcError> {
        log::debug!("Fetching JWKS from: {}", self.jwks_uri);

        let response = self.client.get(&self.jwks_uri).send().await.map_err(|e| {
            OidcError::JwksFetchFailed(format!(
                "Failed to fetch JWKS from '{}': {}",
                self.jwks_uri, e
            ))
        })?;

        if !response.status().is_success() {
            return Err(OidcError::JwksFetchFailed(format!(
                "JWKS request to '{}' returned status {}",
                self.jwks_uri,
                response.status()
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            OidcError::JwksFetchFailed(format!(
                "Failed to parse JWKS JSON from '{}': {}",
                self.jwks_uri, e
            ))
        })?;

        log::debug!("Fetched {} keys from JWKS", jwks.keys.len());
        Ok(jwks)
    }
}

#[async_trait]
impl KeySource for JwksKeySource {
    async fn decoding_key(&self, header: &Header) -> Result<DecodingKey, OidcError> {
        let kid = header.kid.as_deref().ok_or(OidcError::MissingKid)?;
        let jwk = self.get_jwk(kid).await?;
        jwk_to_decoding_key(&jwk)
    }
}

enum StaticKeys {
    /// One key used for every token, whatever its `kid`
    Single(DecodingKey),
    /// Keys selected by `kid`
    ByKid(HashMap<String, Jwk>),
}

/// Pre-provisioned platform keys. Never touches the network.
pub struct StaticKeySource {
    keys: StaticKeys,
}

impl StaticKeySource {
    /// Use one RSA public key (PEM) for every token.
    pub fn from_rsa_pem(pem: &[u8]) -> Result<Self, OidcError> {
        let key = DecodingKey::from_rsa_pem(pem)
            .map_err(|e| OidcError::InvalidKeyFormat(format!("Invalid RSA PEM: {}", e)))?;
        Ok(Self {
            keys: StaticKeys::Single(key),
        })
    }

    /// Read an RSA public key (PEM) from disk.
    pub fn from_pem_file<P: AsRef<Path>>(path: P) -> Result<Self, OidcError> {
        let path = path.as_ref();
        let pem = std::fs::read(path).map_err(|e| {
            OidcError::InvalidKeyFormat(format!(
                "Failed to read public key '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_rsa_pem(&pem)
    }

    /// Use a JWK set document, selecting keys by `kid`.
    pub fn from_jwk_set_json(json: &str) -> Result<Self, OidcError> {
        let jwks: JwkSet = serde_json::from_str(json)
            .map_err(|e| OidcError::InvalidKeyFormat(format!("Invalid JWK set: {}", e)))?;
        Ok(Self::from_jwk_set(jwks))
    }

    pub fn from_jwk_set(jwks: JwkSet) -> Self {
        Self {
            keys: StaticKeys::ByKid(index_by_kid(jwks)),
        }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn decoding_key(&self, header: &Header) -> Result<DecodingKey, OidcError> {
        match &self.keys {
            StaticKeys::Single(key) => Ok(key.clone()),
            StaticKeys::ByKid(keys) => {
                let kid = header.kid.as_deref().ok_or(OidcError::MissingKid)?;
                let jwk = keys
                    .get(kid)
                    .ok_or_else(|| OidcError::KeyNotFound(kid.to_string()))?;
                jwk_to_decoding_key(jwk)
            }
        }
    }
}
