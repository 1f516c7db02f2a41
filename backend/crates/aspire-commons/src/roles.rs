//! Role derivation from platform claims.
//!
//! Platforms encode roles differently, so the gateway never reads a role
//! field directly. A [`RoleProvider`] is chosen per deployment and handed to
//! the auth guard.

use crate::constants::{DEFAULT_ROLES_KEY, LTI_ROLES_CLAIM};
use crate::models::IdToken;
use serde_json::Value;
use std::collections::HashSet;

/// Derives the role set of a session from its validated claims.
pub trait RoleProvider: Send + Sync {
    fn roles(&self, claims: &IdToken) -> HashSet<String>;
}

/// Reads a comma-delimited role string from the custom-claims sub-map.
///
/// This is the default: the tool's custom field is configured on the
/// platform as e.g. `roles=$Canvas.membership.roles`.
#[derive(Debug, Clone)]
pub struct CustomClaimRoles {
    key: String,
}

impl CustomClaimRoles {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for CustomClaimRoles {
    fn default() -> Self {
        Self::new(DEFAULT_ROLES_KEY)
    }
}

impl RoleProvider for CustomClaimRoles {
    fn roles(&self, claims: &IdToken) -> HashSet<String> {
        claims
            .custom_claim(&self.key)
            .and_then(Value::as_str)
            .map(split_roles)
            .unwrap_or_default()
    }
}

/// Reads the standard LTI roles claim (an array of role URIs).
///
/// Each URI is returned as-is and also by its short name after `#`, so
/// `http://purl.imsglobal.org/vocab/lis/v2/membership#Instructor` matches
/// both the full URI and `Instructor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LtiRolesClaim;

impl RoleProvider for LtiRolesClaim {
    fn roles(&self, claims: &IdToken) -> HashSet<String> {
        let mut roles = HashSet::new();
        let Some(Value::Array(values)) = claims.get(LTI_ROLES_CLAIM) else {
            return roles;
        };

        for role in values.iter().filter_map(Value::as_str) {
            if let Some((_, short)) = role.rsplit_once('#') {
                if !short.is_empty() {
                    roles.insert(short.to_string());
                }
            }
            roles.insert(role.to_string());
        }
        roles
    }
}

/// Split a comma-delimited role list into a set, trimming blanks.
pub fn split_roles(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect()
}
