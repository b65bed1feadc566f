use std::net::SocketAddr;
use std::path::PathBuf;

use chrono_tz::Tz;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub snapshot_path: PathBuf,
    pub timezone: Tz,
    /// Six-field cron expression (`sec min hour dom mon dow`) for the daily run.
    pub schedule: String,
    pub run_on_startup: bool,
    pub chrome_executable: Option<PathBuf>,
    pub nav_timeout_secs: u64,
    pub nav_max_attempts: u32,
    pub nav_backoff_ms: u64,
    pub settle_delay_ms: u64,
    pub location_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("snapshot_path", &self.snapshot_path)
            .field("timezone", &self.timezone.name())
            .field("schedule", &self.schedule)
            .field("run_on_startup", &self.run_on_startup)
            .field("chrome_executable", &self.chrome_executable)
            .field("nav_timeout_secs", &self.nav_timeout_secs)
            .field("nav_max_attempts", &self.nav_max_attempts)
            .field("nav_backoff_ms", &self.nav_backoff_ms)
            .field("settle_delay_ms", &self.settle_delay_ms)
            .field("location_delay_ms", &self.location_delay_ms)
            .finish()
    }
}
