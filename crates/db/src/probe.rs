use async_trait::async_trait;
use pgwait_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::error::ProbeError;

/// One readiness check against a database endpoint.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Human-readable endpoint description used in logs and errors.
    fn target(&self) -> String;

    /// Attempt to reach the endpoint once.
    async fn probe(&self) -> Result<(), ProbeError>;
}

/// Probe that opens a real PostgreSQL connection and closes it again.
pub struct PgProbe {
    options: PgConnectOptions,
    target: String,
}

impl PgProbe {
    pub fn new(settings: &DatabaseSettings) -> Self {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.database)
            .username(&settings.user)
            .password(&settings.password);

        Self {
            options,
            target: settings.target(),
        }
    }
}

#[async_trait]
impl Probe for PgProbe {
    fn target(&self) -> String {
        self.target.clone()
    }

    async fn probe(&self) -> Result<(), ProbeError> {
        let conn = PgConnection::connect_with(&self.options).await?;
        conn.close().await?;
        Ok(())
    }
}
