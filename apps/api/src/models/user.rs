use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public slice of a user record, as returned by `GET /profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub email: String,
    pub username: String,
    pub gender: Option<String>,
    pub avatar_id: Option<String>,
}
