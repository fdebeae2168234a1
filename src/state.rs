use crate::auth::repo::PgUserRepo;
use crate::auth::repo_types::UserRepo;
use crate::chat::client::{ChatClient, OpenRouterClient};
use crate::config::AppConfig;
use crate::transactions::repo::PgTransactionRepo;
use crate::transactions::repo_types::TransactionRepo;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared, read-only per request. All mutable state lives in the store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub transactions: Arc<dyn TransactionRepo>,
    pub chat: Arc<dyn ChatClient>,
}

impl AppState {
    pub fn init(config: Arc<AppConfig>, db: PgPool) -> anyhow::Result<Self> {
        let chat = Arc::new(OpenRouterClient::new(&config.chat, &config.frontend_url)?)
            as Arc<dyn ChatClient>;

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgTransactionRepo::new(db)),
            chat,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        transactions: Arc<dyn TransactionRepo>,
        chat: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            config,
            users,
            transactions,
            chat,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::testing::{test_config, EchoChat, MemoryTransactions, MemoryUsers};

        Self::from_parts(
            Arc::new(test_config()),
            Arc::new(MemoryUsers::default()),
            Arc::new(MemoryTransactions::default()),
            Arc::new(EchoChat),
        )
    }
}
