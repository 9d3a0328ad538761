//! Configuration loading for `~/.config/winddown/config.toml`.
//!
//! Missing files silently fall back to defaults; malformed files warn
//! and fall back. Loaded values are clamped to safe ranges.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Process-list refresh behavior.
    pub refresh: RefreshConfig,
    /// File logging settings.
    pub logging: LogConfig,
}

/// Refresh settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Fallback poll interval in seconds. The environment watcher covers
    /// most changes; this interval covers missed notifications.
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

impl Config {
    /// Clamps values to safe ranges. Prevents a poll interval so short
    /// it thrashes enumeration or so long the list goes permanently
    /// stale.
    pub fn validate(&mut self) {
        self.refresh.interval_secs = self.refresh.interval_secs.clamp(5, 600);
    }
}

/// Returns the config directory: `~/.config/winddown/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("winddown"))
}

/// Returns the config file path: `~/.config/winddown/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse `config.toml`.
///
/// Returns `Ok(Config)` on success, or an error string describing
/// what went wrong (IO error, parse error, etc.).
pub fn try_load() -> Result<Config, String> {
    let path = config_path().ok_or("could not determine config path")?;
    let content = std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut config: Config =
        toml::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
///
/// Non-existent files silently return defaults; other errors warn first.
pub fn load() -> Config {
    match try_load() {
        Ok(config) => config,
        Err(e) if is_file_not_found(&e) => Config::default(),
        Err(e) => {
            eprintln!("Warning: {e}");
            Config::default()
        }
    }
}

/// Returns true if the error message indicates a missing file.
fn is_file_not_found(e: &str) -> bool {
    e.contains("No such file")
        || e.contains("cannot find the path")
        || e.contains("The system cannot find")
}

/// Generates the commented default `config.toml`, written by
/// `winddown init`.
pub fn generate_template() -> String {
    let defaults = RefreshConfig::default();
    format!(
        r#"# Winddown configuration

[refresh]
# Fallback poll interval for the process list, in seconds (5-600).
# Window-change notifications refresh the list immediately; this
# interval only covers notifications that were missed.
interval_secs = {interval}

[logging]
# Enable file logging to the winddown data directory.
enabled = false
# Minimum level: "debug", "info", "warn", or "error".
level = "info"
# Rotate the log file when it exceeds this size in megabytes.
max_file_mb = 10
"#,
        interval = defaults.interval_secs
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation_unchanged() {
        let mut config = Config::default();
        config.validate();
        assert_eq!(config.refresh.interval_secs, 30);
    }

    #[test]
    fn validate_clamps_the_poll_interval() {
        let mut config = Config::default();
        config.refresh.interval_secs = 0;
        config.validate();
        assert_eq!(config.refresh.interval_secs, 5);

        config.refresh.interval_secs = 100_000;
        config.validate();
        assert_eq!(config.refresh.interval_secs, 600);
    }

    #[test]
    fn template_parses_back_to_defaults() {
        let parsed: Config = toml::from_str(&generate_template()).unwrap();
        assert_eq!(parsed.refresh.interval_secs, 30);
        assert!(!parsed.logging.enabled);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[refresh]\ninterval_secs = 60\n").unwrap();
        assert_eq!(parsed.refresh.interval_secs, 60);
        assert_eq!(parsed.logging.max_file_mb, 10);
    }
}
