use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a working
/// development config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("FOTD_ENV", "development"))?;

    let bind_addr = or_default("FOTD_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("FOTD_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("FOTD_LOG_LEVEL", "info");
    let snapshot_path = PathBuf::from(or_default("FOTD_SNAPSHOT_PATH", "./data/flavors.json"));

    let timezone = or_default("FOTD_TIMEZONE", "America/Chicago")
        .parse::<chrono_tz::Tz>()
        .map_err(|e| invalid("FOTD_TIMEZONE", e.to_string()))?;

    let schedule = or_default("FOTD_SCHEDULE", "0 0 6 * * *");
    let fields = schedule.split_whitespace().count();
    if !(6..=7).contains(&fields) {
        return Err(invalid(
            "FOTD_SCHEDULE",
            format!("expected 6 or 7 cron fields, got {fields}"),
        ));
    }

    let run_on_startup = parse_bool(
        "FOTD_RUN_ON_STARTUP",
        &or_default("FOTD_RUN_ON_STARTUP", "true"),
    )?;
    let chrome_executable = lookup("FOTD_CHROME_EXECUTABLE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let nav_timeout_secs = parse_u64("FOTD_NAV_TIMEOUT_SECS", "30")?;
    let nav_max_attempts = parse_u32("FOTD_NAV_MAX_ATTEMPTS", "3")?;
    if nav_max_attempts == 0 {
        return Err(invalid(
            "FOTD_NAV_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let nav_backoff_ms = parse_u64("FOTD_NAV_BACKOFF_MS", "2000")?;
    let settle_delay_ms = parse_u64("FOTD_SETTLE_DELAY_MS", "3000")?;
    let location_delay_ms = parse_u64("FOTD_LOCATION_DELAY_MS", "2000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        snapshot_path,
        timezone,
        schedule,
        run_on_startup,
        chrome_executable,
        nav_timeout_secs,
        nav_max_attempts,
        nav_backoff_ms,
        settle_delay_ms,
        location_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOTD_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
