use crate::config::PlatformConfig;
use crate::error::OidcError;
use crate::keys::KeySource;
use aspire_commons::IdToken;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Asymmetric algorithms a platform may sign with. Symmetric algorithms are
/// never accepted: the tool holds no shared secret with the platform.
const ALLOWED_ALGORITHMS: [Algorithm; 8] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
    Algorithm::ES256,
    Algorithm::ES384,
];

/// Validates `id_token`s issued by one registered platform.
///
/// Validation includes:
/// - Signature verification with the algorithm named in the header
/// - `exp` and `iat` present and within the configured leeway
/// - `iss` equal to the registration issuer
/// - `aud` containing the registration client id (and `azp`, when several
///   audiences are present, naming it)
/// - a non-empty `nonce` claim
///
/// Whether the nonce belongs to a live launch is checked by the caller.
#[derive(Clone)]
pub struct PlatformValidator {
    config: PlatformConfig,
    keys: Arc<dyn KeySource>,
}

impl PlatformValidator {
    pub fn new(config: PlatformConfig, keys: Arc<dyn KeySource>) -> Self {
        Self { config, keys }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub async fn validate(&self, token: &str) -> Result<IdToken, OidcError> {
        log::debug!("Validating id_token for platform {}", self.config.name);

        let header = decode_header(token)?;
        if !ALLOWED_ALGORITHMS.contains(&header.alg) {
            return Err(OidcError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        let decoding_key = self.keys.decoding_key(&header).await?;

        // Pin validation to the exact algorithm in the token header
        let mut validation = Validation::new(header.alg);
        validation.leeway = self.config.leeway_seconds;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.client_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        let token_data = decode::<Map<String, Value>>(token, &decoding_key, &validation)
            .map_err(|e| {
                log::warn!(
                    "id_token rejected for platform {}: kind={:?}",
                    self.config.name,
                    e.kind()
                );
                OidcError::from(e)
            })?;

        let claims = IdToken::new(token_data.claims);
        self.check_issued_at(&claims)?;
        self.check_authorized_party(&claims)?;

        match claims.nonce() {
            Some(nonce) if !nonce.is_empty() => {}
            _ => return Err(OidcError::MissingClaim("nonce")),
        }

        log::debug!("id_token verified for platform {}", self.config.name);
        Ok(claims)
    }

    fn check_issued_at(&self, claims: &IdToken) -> Result<(), OidcError> {
        let iat = claims
            .get("iat")
            .and_then(Value::as_i64)
            .ok_or(OidcError::MissingClaim("iat"))?;

        let now = chrono::Utc::now().timestamp();
        let leeway = i64::try_from(self.config.leeway_seconds).unwrap_or(i64::MAX);
        if iat > now.saturating_add(leeway) {
            return Err(OidcError::JwtValidationFailed(
                "Token issued in the future".into(),
            ));
        }
        Ok(())
    }

    fn check_authorized_party(&self, claims: &IdToken) -> Result<(), OidcError> {
        if claims.audiences().len() <= 1 {
            return Ok(());
        }
        match claims.str_claim("azp") {
            Some(azp) if azp == self.config.client_id => Ok(()),
            Some(_) => Err(OidcError::JwtValidationFailed(
                "Authorized party does not match client id".into(),
            )),
            None => Err(OidcError::MissingClaim("azp")),
        }
    }
}
