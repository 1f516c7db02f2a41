//! Platform authentication response

use serde::{Deserialize, Serialize};

/// Form posted by the platform to the redirect URI.
///
/// Carries either `id_token` and `state`, or an OIDC `error`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OidcResponseForm {
    pub id_token: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl OidcResponseForm {
    /// The platform's error as a single message, if it sent one.
    pub fn platform_error(&self) -> Option<String> {
        let error = self.error.as_deref().filter(|e| !e.is_empty())?;
        Some(match self.error_description.as_deref() {
            Some(description) if !description.is_empty() => {
                format!("Platform returned {}: {}", error, description)
            },
            _ => format!("Platform returned {}", error),
        })
    }
}
