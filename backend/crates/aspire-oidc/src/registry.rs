use crate::config::PlatformConfig;
use crate::error::OidcError;
use crate::keys::{JwksKeySource, KeySource, StaticKeySource};
use crate::validator::PlatformValidator;
use aspire_configs::PlatformSettings;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered platforms keyed by the `client_id` they issued to this tool.
#[derive(Clone, Default)]
pub struct PlatformRegistry {
    validators: HashMap<String, Arc<PlatformValidator>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build validators for every configured platform.
    ///
    /// A pre-provisioned public key takes precedence over the JWKS endpoint.
    pub fn from_settings(platforms: &[PlatformSettings]) -> Result<Self, OidcError> {
        let mut registry = Self::new();

        for settings in platforms {
            let config = PlatformConfig::from(settings);
            let keys: Arc<dyn KeySource> = match (&settings.public_key_path, &settings.jwks_uri) {
                (Some(path), _) => Arc::new(StaticKeySource::from_pem_file(path)?),
                (None, Some(jwks_uri)) => Arc::new(JwksKeySource::new(jwks_uri.clone())),
                (None, None) => {
                    return Err(OidcError::InvalidKeyFormat(format!(
                        "Platform '{}' has no key material",
                        config.name
                    )))
                }
            };

            log::info!(
                "Registered platform '{}' (issuer: {}, client_id: {})",
                config.name,
                config.issuer,
                config.client_id
            );
            registry.register(PlatformValidator::new(config, keys));
        }

        Ok(registry)
    }

    /// Add or replace the registration for the validator's client id.
    pub fn register(&mut self, validator: PlatformValidator) {
        let client_id = validator.config().client_id.clone();
        if self
            .validators
            .insert(client_id.clone(), Arc::new(validator))
            .is_some()
        {
            log::warn!("Replaced platform registration for client_id {}", client_id);
        }
    }

    pub fn get(&self, client_id: &str) -> Option<Arc<PlatformValidator>> {
        self.validators.get(client_id).cloned()
    }

    /// First registered validator whose client id is in `audiences`.
    pub fn find_by_audience<S: AsRef<str>>(&self, audiences: &[S]) -> Option<Arc<PlatformValidator>> {
        audiences.iter().find_map(|aud| self.get(aud.as_ref()))
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.validators.contains_key(client_id)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(client_id: &str) -> PlatformSettings {
        PlatformSettings {
            name: Some("Test LMS".to_string()),
            issuer: "https://lms.example.edu".to_string(),
            client_id: client_id.to_string(),
            auth_request_url: "https://lms.example.edu/auth".to_string(),
            jwks_uri: Some("https://lms.example.edu/jwks".to_string()),
            public_key_path: None,
            leeway_seconds: 60,
        }
    }

    #[test]
    fn test_from_settings_with_jwks() {
        let registry = PlatformRegistry::from_settings(&[settings("c1"), settings("c2")]).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("c1"));
        assert!(registry.get("c3").is_none());
    }

    #[test]
    fn test_from_settings_with_public_key() {
        let mut platform = settings("c1");
        platform.jwks_uri = None;
        platform.public_key_path = Some(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../testdata/platform_public.pem"
        )
        .to_string());
        let registry = PlatformRegistry::from_settings(&[platform]).unwrap();
        assert!(registry.contains("c1"));
    }

    #[test]
    fn test_missing_key_material() {
        let mut platform = settings("c1");
        platform.jwks_uri = None;
        assert!(PlatformRegistry::from_settings(&[platform]).is_err());

        let mut platform = settings("c1");
        platform.jwks_uri = None;
        platform.public_key_path = Some("/nonexistent.pem".to_string());
        assert!(PlatformRegistry::from_settings(&[platform]).is_err());
    }

    #[test]
    fn test_find_by_audience() {
        let registry = PlatformRegistry::from_settings(&[settings("c1")]).unwrap();
        let found = registry.find_by_audience(&["other", "c1"]).unwrap();
        assert_eq!(found.config().client_id, "c1");
        assert!(registry.find_by_audience(&["other"]).is_none());
    }
}
