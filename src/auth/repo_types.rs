use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String, // always lowercase
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, not exposed in JSON
    pub income: Option<f64>,
    pub currency: Option<String>,
    pub goal: Option<String>,
    pub goal_amount: Option<f64>,
    pub goal_set_date: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Profile fields a user may change about themselves. `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub income: Option<f64>,
    pub currency: Option<String>,
    pub goal: Option<String>,
    pub goal_amount: Option<f64>,
    pub goal_set_date: Option<OffsetDateTime>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn create(&self, username: &str, email: &str, password_hash: &str)
        -> anyhow::Result<User>;
    /// Returns `None` when no row with `id` exists any more.
    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> anyhow::Result<Option<User>>;
}
