use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{ProfilePatch, User, UserRepo};

const USER_COLUMNS: &str = "id, username, email, password_hash, income, currency, goal, \
                            goal_amount, goal_set_date, created_at, updated_at";

/// Postgres-backed credential store.
#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: &str, value: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    /// Find a user by exact (case-sensitive) username.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        self.find_one("username", username).await
    }

    /// Find a user by email; callers pass it already lowercased.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.find_one("email", email).await
    }

    /// Create a new user with hashed password.
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.db)
            .await?;
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> anyhow::Result<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
               SET income        = COALESCE($2, income),
                   currency      = COALESCE($3, currency),
                   goal          = COALESCE($4, goal),
                   goal_amount   = COALESCE($5, goal_amount),
                   goal_set_date = COALESCE($6, goal_set_date),
                   updated_at    = now()
             WHERE id = $1
         RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(patch.income)
            .bind(patch.currency.as_deref())
            .bind(patch.goal.as_deref())
            .bind(patch.goal_amount)
            .bind(patch.goal_set_date)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }
}

/// True when `err` is a Postgres unique-constraint violation (SQLSTATE 23505).
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}
