//! Configuration file loading
//!
//! Brokkr reads `~/.brokkr/config.yaml` (honoring `BROKKR_HOME`). A missing
//! file yields the defaults; a malformed one is an error rather than a
//! silent fallback.

use anyhow::{Context, Result};
use brokkr_core::brokkr_home;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration file name under the Brokkr home directory
const CONFIG_FILE: &str = "config.yaml";

fn default_timeout_secs() -> u64 {
    brokkr_sources::command::DEFAULT_TIMEOUT_SECS
}

/// Loaded Brokkr configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokkrConfig {
    /// Target root used by `repo add` when `--target` is not given
    #[serde(default)]
    pub default_target_root: Option<Utf8PathBuf>,

    /// Wall-clock timeout for external commands, in seconds
    #[serde(default = "default_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Command run by `--reload` to refresh the host's module list
    #[serde(default)]
    pub reload_hook: Option<ReloadHook>,
}

/// Operator-configured reload command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadHook {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for BrokkrConfig {
    fn default() -> Self {
        Self {
            default_target_root: None,
            command_timeout_secs: default_timeout_secs(),
            reload_hook: None,
        }
    }
}

impl BrokkrConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: BrokkrConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Command timeout as a [`Duration`]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

fn config_path() -> Result<PathBuf> {
    Ok(brokkr_home()?.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = BrokkrConfig::load_from(temp_dir.path().join("config.yaml")).unwrap();

        assert!(config.default_target_root.is_none());
        assert_eq!(config.command_timeout_secs, 300);
        assert!(config.reload_hook.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "default_target_root: /srv/modules\n").unwrap();

        let config = BrokkrConfig::load_from(path).unwrap();
        assert_eq!(
            config.default_target_root,
            Some(Utf8PathBuf::from("/srv/modules"))
        );
        assert_eq!(config.command_timeout_secs, 300);
    }

    #[test]
    fn test_reload_hook_parsing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(
            &path,
            "command_timeout_secs: 60\nreload_hook:\n  program: systemctl\n  args: [reload, host]\n",
        )
        .unwrap();

        let config = BrokkrConfig::load_from(path).unwrap();
        assert_eq!(config.command_timeout(), Duration::from_secs(60));

        let hook = config.reload_hook.unwrap();
        assert_eq!(hook.program, "systemctl");
        assert_eq!(hook.args, vec!["reload", "host"]);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "command_timeout_secs: [not, a, number]\n").unwrap();

        assert!(BrokkrConfig::load_from(path).is_err());
    }
}
