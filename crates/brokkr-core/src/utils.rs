//! Shared utility functions for Brokkr crates

use anyhow::anyhow;
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so container
/// setups that point HOME somewhere writable behave the same as the shell
/// scripts around them.
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Base directory for Brokkr state (config, repository store, ledger).
///
/// `BROKKR_HOME` overrides the default of `~/.brokkr`.
pub fn brokkr_home() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var("BROKKR_HOME") {
        return Ok(PathBuf::from(dir));
    }

    Ok(get_home_dir()?.join(".brokkr"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_brokkr_home_env_override() {
        std::env::set_var("BROKKR_HOME", "/tmp/brokkr-test-home");
        let home = brokkr_home().unwrap();
        assert_eq!(home, PathBuf::from("/tmp/brokkr-test-home"));
        std::env::remove_var("BROKKR_HOME");
    }

    #[test]
    #[serial]
    fn test_brokkr_home_defaults_under_home() {
        std::env::remove_var("BROKKR_HOME");
        if std::env::var("HOME").is_ok() {
            let home = brokkr_home().unwrap();
            assert!(home.ends_with(".brokkr"));
        }
    }
}
