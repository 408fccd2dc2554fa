//! Application configuration.
//!
//! Defaults are constants; `.env` and the process environment can override
//! the few values a deployment cares about. CLI arguments win over both.

use std::env;

/// Port for the HTTP preview server.
pub const DEFAULT_PORT: u16 = 3000;

/// File name (without extension) for saves into a directory.
pub const DEFAULT_OUTPUT_NAME: &str = "output";

/// Extension given to saved output.
pub const DEFAULT_EXTENSION: &str = "csv";

/// Upload size limit for the HTTP shell (in bytes).
///
/// 10 MB limit.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Environment variable overriding [`DEFAULT_PORT`].
pub const PORT_VAR: &str = "CARIS_PORT";

/// Environment variable overriding [`DEFAULT_OUTPUT_NAME`].
pub const OUTPUT_NAME_VAR: &str = "CARIS_OUTPUT_NAME";

/// Text shown by the `about` command.
pub const ABOUT_TEXT: &str = "\
Especially for my Polish comrade.
The principle of operation is simple:
open the source file and save it in CSV format";

/// Maintainer line shown under [`ABOUT_TEXT`].
pub const MAINTAINER: &str = "Created by Sergei Shekin\nemail: shekin.sergey@yandex.com";

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub output_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present) and read overrides from the environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable or empty values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup(PORT_VAR)
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let output_name = lookup(OUTPUT_NAME_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.output_name);

        Self { port, output_name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.output_name, "output");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [(PORT_VAR, "8080"), (OUTPUT_NAME_VAR, " lines ")].into();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.port, 8080);
        assert_eq!(config.output_name, "lines");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let vars: HashMap<&str, &str> = [(PORT_VAR, "not-a-port"), (OUTPUT_NAME_VAR, "  ")].into();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config, AppConfig::default());
    }
}
