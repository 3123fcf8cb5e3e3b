//! Store-backed service calls run on tokio's blocking pool. A sled write
//! flushes to disk while the account lock is held.

use crate::{ApiError, ApiResult};
use smeraldo_mining::MiningError;
use tracing::error;

pub(crate) async fn run_blocking<F, T>(task: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, MiningError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!(error = %e, "blocking_task_failed");
            Err(ApiError::Internal("Request task failed".to_string()))
        }
    }
}
