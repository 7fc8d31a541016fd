//! Error types for probing and waiting.

use std::time::Duration;

use thiserror::Error;

/// A single failed connection attempt. Every variant means "not ready yet".
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("connection attempt did not complete within {0:?}")]
    AttemptTimedOut(Duration),
}

#[derive(Error, Debug)]
pub enum WaitError {
    #[error("timed out after {elapsed:?} waiting for Postgres at {target} ({attempts} attempts)")]
    TimedOut {
        target: String,
        elapsed: Duration,
        attempts: u32,
        #[source]
        source: ProbeError,
    },
}
