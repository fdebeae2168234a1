use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::transactions::repo_types::{
    NewTransaction, Transaction, TransactionPatch, TransactionRepo,
};

#[derive(Clone)]
pub struct PgTransactionRepo {
    db: PgPool,
}

impl PgTransactionRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepo for PgTransactionRepo {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, title, amount, date, category, kind, created_at, updated_at
              FROM transactions
             WHERE user_id = $1
             ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, user_id: Uuid, new: &NewTransaction) -> anyhow::Result<Transaction> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, title, amount, date, category, kind)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, amount, date, category, kind, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&new.title)
        .bind(new.amount)
        .bind(new.date)
        .bind(&new.category)
        .bind(new.kind)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> anyhow::Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
               SET title      = COALESCE($3, title),
                   amount     = COALESCE($4, amount),
                   date       = COALESCE($5, date),
                   category   = COALESCE($6, category),
                   kind       = COALESCE($7, kind),
                   updated_at = now()
             WHERE id = $1 AND user_id = $2
         RETURNING id, user_id, title, amount, date, category, kind, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.title.as_deref())
        .bind(patch.amount)
        .bind(patch.date)
        .bind(patch.category.as_deref())
        .bind(patch.kind)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
