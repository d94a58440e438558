//! Engine configuration, read from `GAMEMASTER_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use gamemaster_catan::application::spinner::SpinSettings;
use gamemaster_session::application::export::ExportFormat;
use thiserror::Error;

/// A configuration variable is set but unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable lines.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Tracing filter directive, e.g. `info` or `gamemaster_session=debug`.
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Catan dice animation timing.
    pub dice_spin: SpinSettings,
    /// Format used when an export does not name one.
    pub export_format: ExportFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_owned(),
            log_format: LogFormat::default(),
            dice_spin: SpinSettings::default(),
            export_format: ExportFormat::default(),
        }
    }
}

impl EngineConfig {
    /// Reads the configuration from the process environment. Unset variables
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a variable that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a variable that does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let log_filter = lookup("GAMEMASTER_LOG").unwrap_or(defaults.log_filter);
        let log_format = parse(
            &lookup,
            "GAMEMASTER_LOG_FORMAT",
            "json or pretty",
            defaults.log_format,
        )?;
        let period_ms = parse(
            &lookup,
            "GAMEMASTER_DICE_SPIN_MS",
            "a positive number of milliseconds",
            u64::try_from(defaults.dice_spin.period.as_millis()).unwrap_or(80),
        )?;
        if period_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "GAMEMASTER_DICE_SPIN_MS",
                expected: "a positive number of milliseconds",
                value: "0".to_owned(),
            });
        }
        let frames = parse(
            &lookup,
            "GAMEMASTER_DICE_SPIN_FRAMES",
            "a frame count",
            defaults.dice_spin.frames,
        )?;
        let export_format = parse(
            &lookup,
            "GAMEMASTER_EXPORT_FORMAT",
            "json or yaml",
            defaults.export_format,
        )?;

        Ok(Self {
            log_filter,
            log_format,
            dice_spin: SpinSettings {
                period: Duration::from_millis(period_ms),
                frames,
            },
            export_format,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.dice_spin.period, Duration::from_millis(80));
        assert_eq!(config.dice_spin.frames, 10);
    }

    #[test]
    fn test_variables_override_defaults() {
        // Arrange
        let vars = lookup(&[
            ("GAMEMASTER_LOG", "gamemaster_session=debug"),
            ("GAMEMASTER_LOG_FORMAT", "pretty"),
            ("GAMEMASTER_DICE_SPIN_MS", "25"),
            ("GAMEMASTER_DICE_SPIN_FRAMES", "4"),
            ("GAMEMASTER_EXPORT_FORMAT", "YAML"),
        ]);

        // Act
        let config = EngineConfig::from_lookup(vars).unwrap();

        // Assert
        assert_eq!(config.log_filter, "gamemaster_session=debug");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.dice_spin.period, Duration::from_millis(25));
        assert_eq!(config.dice_spin.frames, 4);
        assert_eq!(config.export_format, ExportFormat::Yaml);
    }

    #[test]
    fn test_bad_values_are_reported_by_name() {
        let result = EngineConfig::from_lookup(lookup(&[("GAMEMASTER_DICE_SPIN_FRAMES", "many")]));
        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                name: "GAMEMASTER_DICE_SPIN_FRAMES",
                expected: "a frame count",
                value: "many".to_owned(),
            })
        );

        let result = EngineConfig::from_lookup(lookup(&[("GAMEMASTER_DICE_SPIN_MS", "0")]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "GAMEMASTER_DICE_SPIN_MS", .. })));

        let result = EngineConfig::from_lookup(lookup(&[("GAMEMASTER_LOG_FORMAT", "xml")]));
        assert!(result.is_err());
    }
}
