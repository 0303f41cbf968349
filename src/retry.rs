//! Fixed-count retry for pipeline tasks

use std::time::Duration;

use crate::error::PipelineError;
use crate::pipeline::TaskId;

/// Run a task, retrying up to `retries` more times after a failure.
///
/// Every error is retried; a task has no partial results to keep between attempts.
/// Returns `Ok(T)` on first success, or [`PipelineError::TaskFailed`] wrapping
/// the last error once attempts are exhausted.
pub fn retry_task<T>(
    task: TaskId,
    retries: u32,
    delay: Duration,
    mut attempt_fn: impl FnMut() -> Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    let mut attempt = 0u32;
    loop {
        match attempt_fn() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < retries => {
                attempt += 1;
                log::warn!("{task}: attempt {attempt}/{} failed: {e}, retrying...", retries + 1);
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
            }
            Err(e) => {
                log::error!("{task}: failed permanently: {e}");
                return Err(PipelineError::TaskFailed {
                    task,
                    attempts: attempt + 1,
                    source: Box::new(e),
                });
            }
        }
    }
}
