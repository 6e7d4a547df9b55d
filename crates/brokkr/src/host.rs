//! Host bridge implementation for the CLI
//!
//! Reload runs the operator-configured hook command; restart signals the
//! parent/supervisor process with SIGHUP, mirroring how supervised daemons
//! are asked to reload.

use crate::config::ReloadHook;
use anyhow::{anyhow, Context, Result};
use brokkr_sources::HostBridge;
use std::process::Command;
use tracing::{debug, info};

pub struct ProcessHost {
    reload_hook: Option<ReloadHook>,
}

impl ProcessHost {
    pub fn new(reload_hook: Option<ReloadHook>) -> Self {
        Self { reload_hook }
    }
}

impl HostBridge for ProcessHost {
    fn reload_module_list(&self) -> Result<()> {
        let Some(hook) = &self.reload_hook else {
            debug!("no reload hook configured, nothing to do");
            return Ok(());
        };

        info!("running reload hook: {}", hook.program);
        let output = Command::new(&hook.program)
            .args(&hook.args)
            .output()
            .with_context(|| format!("Failed to run reload hook '{}'", hook.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "Reload hook '{}' failed: {}",
                hook.program,
                stderr.trim_end()
            ));
        }

        Ok(())
    }

    #[cfg(unix)]
    fn restart_host(&self) -> Result<()> {
        let supervisor = std::os::unix::process::parent_id();
        info!("signalling supervisor process {} to restart", supervisor);

        let output = Command::new("kill")
            .args(["-HUP", &supervisor.to_string()])
            .output()
            .context("Failed to run kill")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "Could not signal process {}: {}",
                supervisor,
                stderr.trim_end()
            ));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn restart_host(&self) -> Result<()> {
        Err(anyhow!("Restart signalling is only supported on unix hosts"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_without_hook_is_a_no_op() {
        let host = ProcessHost::new(None);
        assert!(host.reload_module_list().is_ok());
    }

    #[test]
    fn test_reload_hook_failure_surfaces_stderr() {
        let host = ProcessHost::new(Some(ReloadHook {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo broken >&2; exit 1".to_string()],
        }));

        let err = host.reload_module_list().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_reload_hook_success() {
        let host = ProcessHost::new(Some(ReloadHook {
            program: "true".to_string(),
            args: Vec::new(),
        }));
        assert!(host.reload_module_list().is_ok());
    }
}
