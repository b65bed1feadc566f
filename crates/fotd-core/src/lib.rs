pub mod app_config;
pub mod clock;
pub mod config;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use clock::Clock;
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    CalendarDate, DayLabel, Flavor, FlavorDay, Location, LocationStatus, Snapshot, SourceError,
    NO_DATA_DISPLAY, PLACEHOLDER_DESCRIPTION,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
