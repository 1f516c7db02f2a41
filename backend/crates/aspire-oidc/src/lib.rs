// Aspire OIDC Library
// Validates platform-signed LTI id_tokens against per-platform key material
// and signs tool-issued launch tokens

pub mod config;
pub mod error;
pub mod keys;
pub mod registry;
pub mod signer;
pub mod utils;
pub mod validator;

pub use config::PlatformConfig;
pub use error::OidcError;
pub use keys::{JwksKeySource, KeySource, StaticKeySource};
pub use registry::PlatformRegistry;
pub use signer::{LaunchClaims, ToolSigner};
pub use utils::extract_audience_unverified;
pub use validator::PlatformValidator;
