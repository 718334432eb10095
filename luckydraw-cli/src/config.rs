use anyhow::Context;
use clap::ValueEnum;
use luckydraw_core::RestConfig;
use luckydraw_lottery::AnimationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// SQLite file in the data directory
    Local,
    /// Hosted PostgREST store
    Rest,
    /// In-process only, forgotten on exit
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    pub rest: RestConfig,
    pub animation: AnimationConfig,
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: BackendKind::Local,
            rest: RestConfig::default(),
            animation: AnimationConfig::default(),
            verbose: false,
        }
    }
}

impl CliConfig {
    /// Read `<data_dir>/config.json` if present, otherwise defaults.
    /// REST settings pick up environment overrides either way.
    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let path = data_dir.join(CONFIG_FILE);

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<CliConfig>(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            CliConfig::default()
        };

        config.data_dir = data_dir.to_path_buf();
        config.rest = config.rest.with_env_overrides();
        Ok(config)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("luckydraw")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = CliConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.data_dir, temp_dir.path());
        assert_eq!(config.animation.duration.as_millis(), 5000);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            r#"{ "backend": "memory", "verbose": true, "rest": { "history_table": "winners" } }"#,
        )
        .unwrap();

        let config = CliConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert!(config.verbose);
        assert_eq!(config.rest.participants_table, "participants");
        assert_eq!(config.rest.history_table, "winners");
    }

    #[test]
    fn test_animation_timings_are_milliseconds() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            r#"{ "animation": { "duration": 3000, "reveal_delay": 500 }, "rest": { "timeout": 2000 } }"#,
        )
        .unwrap();

        let config = CliConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.animation.duration, Duration::from_millis(3000));
        assert_eq!(config.animation.reveal_delay, Duration::from_millis(500));
        assert_eq!(config.animation.frame_interval, Duration::from_millis(80));
        assert_eq!(config.rest.timeout, Duration::from_millis(2000));
    }

    #[test]
    fn test_saved_config_loads_back() {
        let temp_dir = tempdir().unwrap();
        let mut config = CliConfig::default();
        config.animation.duration = Duration::from_millis(1200);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["animation"]["duration"], 1200);

        std::fs::write(temp_dir.path().join(CONFIG_FILE), json.to_string()).unwrap();
        let loaded = CliConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.animation.duration, Duration::from_millis(1200));
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert!(CliConfig::load(temp_dir.path()).is_err());
    }
}
