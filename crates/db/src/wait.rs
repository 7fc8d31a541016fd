use std::time::Duration;

use pgwait_kernel::settings::WaitSettings;
use tokio::time::Instant;

use crate::error::{ProbeError, WaitError};
use crate::probe::Probe;

/// Result of a successful wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Probe repeatedly until it succeeds or the wall-clock timeout is exceeded.
///
/// Every failure is treated the same way: if more than `timeout` has elapsed
/// since the first attempt the last error is returned, otherwise the loop
/// sleeps for `interval` and tries again.
///
/// No attempt may run past `timeout + interval` from the first attempt, so a
/// host that never answers still fails within one interval of the timeout.
/// `connect_timeout` caps single attempts further; zero leaves only that
/// overall bound.
pub async fn wait_for(probe: &dyn Probe, settings: &WaitSettings) -> Result<WaitOutcome, WaitError> {
    let start = Instant::now();
    let hard_deadline = start + settings.timeout() + settings.interval();
    let target = probe.target();
    let mut attempts: u32 = 0;

    tracing::info!(
        endpoint = %target,
        timeout_secs = settings.timeout_secs,
        "waiting for Postgres"
    );

    loop {
        attempts = attempts.saturating_add(1);

        let mut limit = hard_deadline.saturating_duration_since(Instant::now());
        if !settings.connect_timeout().is_zero() {
            limit = limit.min(settings.connect_timeout());
        }

        let error = match attempt(probe, limit).await {
            Ok(()) => {
                let elapsed = start.elapsed();
                tracing::info!(endpoint = %target, attempts, ?elapsed, "Postgres accepted a connection");
                return Ok(WaitOutcome { attempts, elapsed });
            }
            Err(error) => error,
        };

        let elapsed = start.elapsed();
        if elapsed > settings.timeout() {
            tracing::error!(endpoint = %target, attempts, ?elapsed, error = %error, "giving up on Postgres");
            return Err(WaitError::TimedOut {
                target,
                elapsed,
                attempts,
                source: error,
            });
        }

        tracing::warn!(endpoint = %target, attempts, error = %error, "Postgres not ready yet");
        tokio::time::sleep(settings.interval()).await;
    }
}

async fn attempt(probe: &dyn Probe, limit: Duration) -> Result<(), ProbeError> {
    match tokio::time::timeout(limit, probe.probe()).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::AttemptTimedOut(limit)),
    }
}
