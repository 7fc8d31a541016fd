//! PostgreSQL readiness probing.

pub mod error;
pub mod probe;
pub mod wait;

pub use error::{ProbeError, WaitError};
pub use probe::{PgProbe, Probe};
pub use wait::{wait_for, WaitOutcome};
