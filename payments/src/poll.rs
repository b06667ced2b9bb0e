use std::future::Future;

use tracing::{trace, warn};

use crate::config::PollConfig;
use crate::errors::{ClientError, ServiceError};

/// Calls `check` until it yields a value, sleeping `config.delay_for(attempt)`
/// before each attempt. Errors count as unanswered attempts.
pub async fn poll_until<T, F, Fut>(config: &PollConfig, mut check: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ServiceError>>,
{
    for attempt in 0..config.max_attempts {
        let delay = config.delay_for(attempt);
        if delay.as_millis() > 0 {
            tokio::time::sleep(delay).await;
        }
        match check().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => trace!(attempt, "not settled yet"),
            Err(error) => warn!(attempt, %error, "poll attempt failed"),
        }
    }
    Err(ClientError::PollLimitReached {
        attempts: config.max_attempts,
    })
}
