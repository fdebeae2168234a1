use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Transaction row. Always owned by exactly one user.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fully validated input for a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    pub date: OffsetDateTime,
    pub category: String,
    pub kind: TransactionKind,
}

/// Validated partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<OffsetDateTime>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
}

/// Every method takes the owner id and filters on it alongside any
/// transaction id, so another user's rows are indistinguishable from
/// missing ones.
#[async_trait]
pub trait TransactionRepo: Send + Sync {
    /// Newest `date` first.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Transaction>>;
    async fn create(&self, user_id: Uuid, new: &NewTransaction) -> anyhow::Result<Transaction>;
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> anyhow::Result<Option<Transaction>>;
    /// Returns whether a row was removed.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}
