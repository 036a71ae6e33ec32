use serde::{Deserialize, Serialize};

/// JWT payload used for authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub email: String,
    /// Issued at, unix seconds.
    pub iat: usize,
    /// Expiry, unix seconds.
    pub exp: usize,
    pub iss: String,
}
