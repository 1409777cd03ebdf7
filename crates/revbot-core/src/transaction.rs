use revbot_database_interface::DbTransaction;
use tracing::warn;

use crate::Result;

/// Commit `tx` if `result` is a success, roll it back otherwise.
pub(crate) async fn finish<T>(tx: Box<dyn DbTransaction>, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            discard(tx).await;
            Err(e)
        }
    }
}

/// Roll `tx` back, logging failures.
pub(crate) async fn discard(tx: Box<dyn DbTransaction>) {
    if let Err(e) = tx.rollback().await {
        warn!(error = %e, "Transaction rollback failed");
    }
}
