//! pgwait
//!
//! Startup gate that blocks until PostgreSQL accepts a connection.

pub mod cli;

use anyhow::Context;
use pgwait_db::{wait_for, PgProbe};
use pgwait_kernel::settings::Settings;

pub use cli::Cli;

pub const READY_MESSAGE: &str = "Postgres is ready";
pub const TIMED_OUT_MESSAGE: &str = "Timed out waiting for Postgres";

/// Load settings, wait for the database, and report the result on stdout.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load().with_context(|| "failed to load pgwait settings")?;
    cli.apply(&mut settings);

    pgwait_telemetry::init(&settings.telemetry)?;

    tracing::debug!(
        endpoint = %settings.database.target(),
        timeout_secs = settings.wait.timeout_secs,
        interval_ms = settings.wait.interval_ms,
        "settings loaded"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_context(|| "failed to start async runtime")?;

    let probe = PgProbe::new(&settings.database);

    match runtime.block_on(wait_for(&probe, &settings.wait)) {
        Ok(outcome) => {
            println!("{READY_MESSAGE}");
            tracing::debug!(
                attempts = outcome.attempts,
                elapsed = ?outcome.elapsed,
                "readiness gate passed"
            );
            Ok(())
        }
        Err(err) => {
            println!("{TIMED_OUT_MESSAGE}");
            Err(err.into())
        }
    }
}
