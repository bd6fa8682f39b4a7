//! PostgreSQL Transaction Coordinator

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::domain::model::DispatchError;
use crate::domain::ports::TxCoordinator;

pub struct PostgresTxCoordinator {
    db: DatabaseConnection,
}

impl PostgresTxCoordinator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TxCoordinator for PostgresTxCoordinator {
    async fn begin(&self) -> Result<DatabaseTransaction, DispatchError> {
        Ok(self.db.begin().await?)
    }
}
