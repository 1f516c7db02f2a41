//! Login initiation parameters

use crate::error::ApiError;
use aspire_auth::LoginInitiation;
use aspire_commons::StorageTarget;
use serde::{Deserialize, Serialize};

/// Parameters of a third-party initiated login, sent as query or form.
///
/// Every field is optional at the wire level so that a missing one is
/// reported as a JSON error body instead of an extractor failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InitParams {
    pub iss: Option<String>,
    pub client_id: Option<String>,
    pub target_link_uri: Option<String>,
    pub login_hint: Option<String>,
    pub lti_message_hint: Option<String>,
    pub lti_storage_target: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ApiError::MissingParameter(name))
}

impl InitParams {
    /// Storage target for the launch: the cookie, unless the browser sent no
    /// cookies and the platform offered a storage frame.
    pub fn storage_target(&self, request_has_cookies: bool) -> StorageTarget {
        match self.lti_storage_target.as_deref() {
            Some(target) if !request_has_cookies => StorageTarget::from_param(target),
            _ => StorageTarget::Cookie,
        }
    }

    pub fn into_login(self, request_has_cookies: bool) -> Result<LoginInitiation, ApiError> {
        let storage_target = self.storage_target(request_has_cookies);
        Ok(LoginInitiation {
            issuer: self.iss.filter(|iss| !iss.is_empty()),
            client_id: required(self.client_id, "client_id")?,
            target_link_uri: required(self.target_link_uri, "target_link_uri")?,
            login_hint: required(self.login_hint, "login_hint")?,
            lti_message_hint: self.lti_message_hint.filter(|hint| !hint.is_empty()),
            storage_target,
        })
    }
}
