//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{EngineConfig, LogFormat};

/// Builds the filter for `config`. `RUST_LOG` wins over the configured
/// directive when it is set.
#[must_use]
pub fn env_filter(config: &EngineConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Returns `false` if one was already set.
pub fn init_tracing(config: &EngineConfig) -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(config));
    let installed = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        let config = EngineConfig::default();

        init_tracing(&config);

        assert!(!init_tracing(&config));
    }
}
