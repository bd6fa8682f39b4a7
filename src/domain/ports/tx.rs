//! Transaction Coordinator Port
//!
//! Opens database transactions for service operations. The returned handle
//! is passed down to every store call in the scope, so one transactional
//! block sees exactly one transaction. The service commits on success and
//! rolls back on error, with the error's identity preserved through the
//! scope.

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use crate::domain::model::DispatchError;

#[async_trait]
pub trait TxCoordinator: Send + Sync {
    async fn begin(&self) -> Result<DatabaseTransaction, DispatchError>;
}
