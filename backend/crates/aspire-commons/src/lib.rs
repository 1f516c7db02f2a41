//! # aspire-commons
//!
//! Models shared by every Aspire crate: launch nonce records, client
//! sessions, the validated `id_token` claim set, role derivation and the
//! JSON error body returned by the HTTP layer.

pub mod constants;
pub mod ids;
pub mod models;
pub mod roles;

pub use models::{
    ClientCredentials, ErrorBody, IdToken, NonceRecord, Session, SessionUpdate, StorageTarget,
};
pub use roles::{CustomClaimRoles, LtiRolesClaim, RoleProvider};
