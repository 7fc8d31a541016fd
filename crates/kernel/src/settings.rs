use std::fmt;
use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const DATABASE_ENV_PREFIX: &str = "POSTGRES";
const WAIT_ENV_PREFIX: &str = "DB_WAIT";
const TELEMETRY_ENV_PREFIX: &str = "PGWAIT_LOG";

/// Raw environment variables keyed by their full name (`POSTGRES_HOST`, ...).
pub type EnvVars = config::Map<String, String>;

/// Top-level configuration, one section per environment variable prefix.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub wait: WaitSettings,
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration from `.env` and the process environment.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        Self::from_vars(None)
    }

    /// Build settings from an explicit variable map, or from the process
    /// environment when `vars` is `None`.
    pub fn from_vars(vars: Option<&EnvVars>) -> anyhow::Result<Self> {
        Ok(Self {
            database: section(DATABASE_ENV_PREFIX, vars)
                .with_context(|| "failed to read POSTGRES_* settings")?,
            wait: section(WAIT_ENV_PREFIX, vars)
                .with_context(|| "failed to read DB_WAIT_* settings")?,
            telemetry: section(TELEMETRY_ENV_PREFIX, vars)
                .with_context(|| "failed to read PGWAIT_LOG_* settings")?,
        })
    }
}

fn section<T: DeserializeOwned>(prefix: &str, vars: Option<&EnvVars>) -> anyhow::Result<T> {
    let mut environment = config::Environment::with_prefix(prefix)
        .prefix_separator("_")
        .ignore_empty(true);
    if let Some(vars) = vars {
        environment = environment.source(Some(vars.clone()));
    }

    let cfg = config::Config::builder()
        .add_source(environment)
        .build()
        .with_context(|| "failed to build configuration")?;

    cfg.try_deserialize()
        .with_context(|| "failed to deserialize configuration")
}

/// Connection parameters of the database being waited on.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_host")]
    pub host: String,
    #[serde(default = "DatabaseSettings::default_port")]
    pub port: u16,
    #[serde(rename = "db", default = "DatabaseSettings::default_database")]
    pub database: String,
    #[serde(default = "DatabaseSettings::default_user")]
    pub user: String,
    #[serde(default = "DatabaseSettings::default_password")]
    pub password: String,
}

impl DatabaseSettings {
    fn default_host() -> String {
        "db".to_string()
    }

    fn default_port() -> u16 {
        5432
    }

    fn default_database() -> String {
        "devops_db".to_string()
    }

    fn default_user() -> String {
        "devops_user".to_string()
    }

    fn default_password() -> String {
        "devops_pass".to_string()
    }

    /// `user@host:port/database`, safe to log.
    pub fn target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            database: Self::default_database(),
            user: Self::default_user(),
            password: Self::default_password(),
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Timing of the wait loop.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WaitSettings {
    /// Wall-clock budget for the whole wait, in seconds.
    #[serde(rename = "timeout", default = "WaitSettings::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause between failed attempts, in milliseconds.
    #[serde(default = "WaitSettings::default_interval_ms")]
    pub interval_ms: u64,
    /// Upper bound on a single connection attempt, in seconds.
    #[serde(
        rename = "connect_timeout",
        default = "WaitSettings::default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,
}

impl WaitSettings {
    fn default_timeout_secs() -> u64 {
        60
    }

    fn default_interval_ms() -> u64 {
        1000
    }

    fn default_connect_timeout_secs() -> u64 {
        5
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            interval_ms: Self::default_interval_ms(),
            connect_timeout_secs: Self::default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct TelemetrySettings {
    #[serde(rename = "format", default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
