//! Configuration for the orbit-scan engine.

use serde::Deserialize;

/// Top-level engine configuration.
///
/// Loaded from `orbit.toml` `[scan]` section or `ORBIT_SCAN__` environment
/// variables.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Path to the external scanner executable (default: "orbit-probe").
    #[serde(default = "default_scanner_path")]
    pub scanner_path: String,

    /// Arguments passed to the scanner before the target and stealth flag
    /// (e.g. a script path when the scanner is an interpreter).
    #[serde(default)]
    pub scanner_args: Vec<String>,

    /// Hard limit on scanner wall-clock time; the subprocess is killed when
    /// it elapses.
    #[serde(default = "default_timeout_secs")]
    pub scan_timeout_secs: u64,

    /// Path of the append-only scan history log.
    #[serde(default = "default_history_path")]
    pub history_path: String,
}

fn default_scanner_path() -> String {
    "orbit-probe".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_history_path() -> String {
    "./scan_history.jsonl".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scanner_path: default_scanner_path(),
            scanner_args: Vec::new(),
            scan_timeout_secs: default_timeout_secs(),
            history_path: default_history_path(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from `{file_prefix}.toml` and the environment,
    /// falling back to defaults when the `[scan]` section is absent.
    pub fn load(file_prefix: &str) -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("ORBIT_SCAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match cfg.get::<EngineConfig>("scan") {
            Ok(c) => Ok(c),
            Err(_) => Ok(EngineConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.scanner_path, "orbit-probe");
        assert!(config.scanner_args.is_empty());
        assert_eq!(config.scan_timeout_secs, 300);
        assert_eq!(config.history_path, "./scan_history.jsonl");
    }

    #[test]
    fn test_missing_section_falls_back_to_defaults() {
        let config = EngineConfig::load("does-not-exist").unwrap();
        assert_eq!(config.scanner_path, "orbit-probe");
    }
}
