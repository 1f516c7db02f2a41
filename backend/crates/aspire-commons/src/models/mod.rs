//! Launch and session models.

mod credentials;
mod error_body;
mod id_token;
mod nonce;
mod session;
mod storage_target;

pub use credentials::ClientCredentials;
pub use error_body::ErrorBody;
pub use id_token::IdToken;
pub use nonce::NonceRecord;
pub use session::{Session, SessionUpdate};
pub use storage_target::StorageTarget;
