//! Polling for upstream jobs that complete asynchronously.

use std::{future::Future, time::Duration};

use crate::{model::destiny::ReportState, server::error::AppError};

/// Delay between report status checks.
pub const REPORT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Polls `check` until it reports a terminal state.
///
/// The first check runs immediately; later checks wait `interval` in between. Errors
/// from `check` abort polling.
///
/// # Arguments
/// - `attempts` - Maximum number of checks
/// - `interval` - Delay between checks
/// - `check` - Fetches the current state
///
/// # Returns
/// - `Ok(attempt)` - 1-based attempt at which the job completed
/// - `Err(AppError::InternalError)` - Job failed upstream or never completed
/// - `Err(AppError)` - Error returned by `check`
pub async fn poll_until_complete<F, Fut>(
    attempts: u32,
    interval: Duration,
    mut check: F,
) -> Result<u32, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ReportState, AppError>>,
{
    for attempt in 1..=attempts {
        if attempt > 1 {
            tokio::time::sleep(interval).await;
        }

        match check().await? {
            ReportState::Complete => return Ok(attempt),
            ReportState::Failed => {
                return Err(AppError::InternalError(
                    "Report generation failed upstream".to_string(),
                ))
            }
            state => tracing::debug!("Report not ready ({:?}), attempt {}", state, attempt),
        }
    }

    Err(AppError::InternalError(format!(
        "Report did not complete after {} attempts",
        attempts
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn states(sequence: Vec<ReportState>) -> impl FnMut() -> std::future::Ready<Result<ReportState, AppError>> {
        let calls = AtomicU32::new(0);
        move || {
            let index = calls.fetch_add(1, Ordering::SeqCst) as usize;
            let state = sequence
                .get(index)
                .copied()
                .unwrap_or(ReportState::Pending);
            std::future::ready(Ok(state))
        }
    }

    /// Tests polling until the report completes.
    ///
    /// Expected: Ok(3) after pending and running states
    #[tokio::test]
    async fn completes_after_pending_states() {
        let result = poll_until_complete(
            5,
            Duration::from_millis(1),
            states(vec![
                ReportState::Pending,
                ReportState::Running,
                ReportState::Complete,
            ]),
        )
        .await;

        assert_eq!(result.unwrap(), 3);
    }

    /// Tests that an upstream failure stops polling.
    ///
    /// Expected: Err(InternalError) on the failed state
    #[tokio::test]
    async fn stops_on_failure() {
        let result = poll_until_complete(
            5,
            Duration::from_millis(1),
            states(vec![ReportState::Running, ReportState::Failed]),
        )
        .await;

        assert!(matches!(result, Err(AppError::InternalError(_))));
    }

    /// Tests giving up after the configured attempts.
    ///
    /// Expected: Err(InternalError) mentioning the attempt count
    #[tokio::test]
    async fn gives_up_after_attempts() {
        let result = poll_until_complete(3, Duration::from_millis(1), states(vec![])).await;

        match result {
            Err(AppError::InternalError(msg)) => assert!(msg.contains("3 attempts")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
