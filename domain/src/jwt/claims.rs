//! Claims carried by the session tokens issued after a Google sign in.

use entity::Id;
use serde::{Deserialize, Serialize};

/// Serialized with camelCase keys: `{userId, email, iat, exp}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: Id,
    pub email: String,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}
