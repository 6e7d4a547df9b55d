//! Build-time version information

use serde::Serialize;
use std::fmt;

/// Version details stamped into the binary by the build script
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,

    /// Short git commit SHA, absent when built outside a checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_date: Option<&'static str>,

    /// Target triple the binary was compiled for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'static str>,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_SHA"),
            build_date: option_env!("BUILD_DATE"),
            target: option_env!("TARGET"),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "brokkr {}", self.version)?;
        if let Some(commit) = self.commit {
            write!(f, " ({commit})")?;
        }
        if let Some(target) = self.target {
            write!(f, " {target}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_always_includes_the_package_version() {
        let info = VersionInfo::current();
        assert!(info.to_string().starts_with(&format!(
            "brokkr {}",
            env!("CARGO_PKG_VERSION")
        )));
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let info = VersionInfo {
            version: "0.2.0",
            commit: None,
            build_date: None,
            target: None,
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"version":"0.2.0"}"#);
    }
}
