use serde::{Deserialize, Serialize};

use crate::models::UserRole;

/// Access-token payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}
