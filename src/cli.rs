use clap::{Parser, ValueEnum};
use pgwait_kernel::settings::{LogFormat, Settings};

/// Block until a PostgreSQL database accepts connections.
///
/// Connection parameters are read from POSTGRES_HOST, POSTGRES_PORT,
/// POSTGRES_DB, POSTGRES_USER and POSTGRES_PASSWORD; the overall budget from
/// DB_WAIT_TIMEOUT. Flags take precedence over the environment.
#[derive(Debug, Parser)]
#[command(name = "pgwait", version, about, long_about)]
pub struct Cli {
    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Database port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database name
    #[arg(long)]
    pub dbname: Option<String>,

    /// Database user
    #[arg(long)]
    pub user: Option<String>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Pause between attempts
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Bound on a single connection attempt, 0 for only the overall timeout
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormatArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// Overlay explicitly passed flags on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.database.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.database.port = port;
        }
        if let Some(dbname) = &self.dbname {
            settings.database.database = dbname.clone();
        }
        if let Some(user) = &self.user {
            settings.database.user = user.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.wait.timeout_secs = timeout;
        }
        if let Some(interval_ms) = self.interval_ms {
            settings.wait.interval_ms = interval_ms;
        }
        if let Some(connect_timeout) = self.connect_timeout {
            settings.wait.connect_timeout_secs = connect_timeout;
        }
        if let Some(format) = self.log_format {
            settings.telemetry.log_format = format.into();
        }
    }
}
