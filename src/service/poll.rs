use std::time::Duration;

use crate::foundation::error::{EditorError, EditorResult};
use crate::service::api::{JobRecord, ServiceApi};

/// Polling cadence for [`poll_job`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollOpts {
    /// Pause between polls.
    pub interval: Duration,
    /// Number of polls before giving up.
    pub max_attempts: u32,
}

impl Default for PollOpts {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 60,
        }
    }
}

/// Poll a job until it completes or fails.
///
/// `on_update` sees every fetched record, including the terminal one. Fetch errors end polling
/// immediately.
#[tracing::instrument(skip(api, opts, on_update))]
pub fn poll_job(
    api: &dyn ServiceApi,
    job_id: &str,
    opts: PollOpts,
    mut on_update: impl FnMut(&JobRecord),
) -> EditorResult<JobRecord> {
    for attempt in 1..=opts.max_attempts {
        let job = api.job_status(job_id)?;
        tracing::debug!(attempt, status = ?job.status, "polled job");
        on_update(&job);
        if job.status.is_terminal() {
            return Ok(job);
        }
        if attempt < opts.max_attempts {
            std::thread::sleep(opts.interval);
        }
    }
    Err(EditorError::timeout(format!(
        "job '{job_id}' not finished after {} polls",
        opts.max_attempts
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/service/poll.rs"]
mod tests;
