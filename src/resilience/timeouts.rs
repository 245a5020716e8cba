//! Deadline enforcement for OS commands.

use std::future::Future;
use std::time::Duration;

use crate::error::{FailoverError, FailoverResult};

/// Run `fut` with a deadline, mapping elapse to [`FailoverError::Timeout`].
pub async fn with_deadline<T, F>(label: &str, after: Duration, fut: F) -> FailoverResult<T>
where
    F: Future<Output = FailoverResult<T>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => Err(FailoverError::Timeout {
            command: label.to_string(),
            after,
        }),
    }
}
