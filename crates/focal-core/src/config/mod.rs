use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_FILE_NAME, DEFAULT_MAX_RECURRENCE_ITERATIONS,
    NOW_REFRESH_INTERVAL_SECS,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub display: DisplayConfig,
    pub recurrence: RecurrenceConfig,
    pub refresh: RefreshConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// IANA (or Windows) timezone name. The system zone is used when unset.
    pub timezone: Option<String>,
    /// First column of the week, 0 = Sunday.
    pub first_weekday: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `focal.toml`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// ## Summary
    /// Loads configuration, reading `file` instead of the default `focal.toml` when given.
    /// A missing default file is fine; an explicitly requested file must exist.
    ///
    /// ## Errors
    /// Returns an error if building, deserializing or validating the configuration fails.
    pub fn load_with(file: Option<&str>) -> Result<Self> {
        let file_source = match file {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name(CONFIG_FILE_NAME).required(false),
        };

        let settings = Config::builder()
            .set_default("display.first_weekday", 0)?
            .set_default("recurrence.max_iterations", i64::try_from(DEFAULT_MAX_RECURRENCE_ITERATIONS)?)?
            .set_default("refresh.interval_secs", i64::try_from(NOW_REFRESH_INTERVAL_SECS)?)?
            .set_default("logging.level", "info")?
            // TOML file
            .add_source(file_source)
            // Env
            .add_source(
                config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks value ranges that serde cannot express.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` for an out-of-range weekday, a zero
    /// iteration limit or a zero refresh interval.
    pub fn validate(&self) -> CoreResult<()> {
        if self.display.first_weekday > 6 {
            return Err(CoreError::ConfigError(format!(
                "display.first_weekday must be 0..=6, got {}",
                self.display.first_weekday
            )));
        }
        if self.recurrence.max_iterations == 0 {
            return Err(CoreError::ConfigError(
                "recurrence.max_iterations must be positive".to_string(),
            ));
        }
        if self.refresh.interval_secs == 0 {
            return Err(CoreError::ConfigError(
                "refresh.interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display: DisplayConfig {
                timezone: None,
                first_weekday: 0,
            },
            recurrence: RecurrenceConfig {
                max_iterations: DEFAULT_MAX_RECURRENCE_ITERATIONS,
            },
            refresh: RefreshConfig {
                interval_secs: NOW_REFRESH_INTERVAL_SECS,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` and the config file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(file: Option<&str>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    tracing::debug!(file = ?file, "Loading settings");
    Settings::load_with(file)
}

#[cfg(test)]
mod tests;
