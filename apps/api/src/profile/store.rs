use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::UserProfile;

/// Record store holding user profiles, keyed by user id.
///
/// Carried in `AppState` as `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, sqlx::Error>;
}

/// PostgreSQL-backed user store.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT email, username, gender, avatar_id FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
