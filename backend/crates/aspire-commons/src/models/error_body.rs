use serde::{Deserialize, Serialize};

/// JSON body returned for every validation failure.
///
/// `error_type` is serialized as `type` and names the error kind, e.g.
/// `TokenValidationError` or `DataAccessError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl ErrorBody {
    #[inline]
    pub fn new(code: u16, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            error_type: error_type.into(),
            message: message.into(),
        }
    }
}
