pub mod courier_admin;
pub mod dispatch;
pub mod order_changed;

use sea_orm::DatabaseTransaction;
use tracing::warn;

use crate::domain::model::DispatchError;

/// Commits the transaction on success, rolls it back on error. The error
/// keeps its identity so callers can match sentinels through the scope.
pub(crate) async fn finish_tx<T>(
    txn: DatabaseTransaction,
    outcome: Result<T, DispatchError>,
) -> Result<T, DispatchError> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}
