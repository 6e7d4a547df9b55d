//! Host-bridge interfaces
//!
//! The engine does not know how the hosting application reloads its module
//! catalog or restarts itself; it calls these seams and reports failures as
//! warnings, never rolling back the already-completed checkout.

use brokkr_core::types::Warning;

/// Collaborator interface implemented by the hosting application
pub trait HostBridge {
    /// Make newly published directories visible to the host's own module
    /// catalog
    fn reload_module_list(&self) -> anyhow::Result<()>;

    /// Signal the hosting process (or its supervisor) to restart
    fn restart_host(&self) -> anyhow::Result<()>;
}

/// Run the requested post-checkout hooks, converting failures into warnings.
pub fn run_post_checkout(bridge: &dyn HostBridge, reload: bool, restart: bool) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if reload {
        if let Err(e) = bridge.reload_module_list() {
            warnings.push(Warning::ReloadFailed {
                message: e.to_string(),
            });
        }
    }

    if restart {
        if let Err(e) = bridge.restart_host() {
            warnings.push(Warning::RestartFailed {
                message: e.to_string(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::Cell;

    struct RecordingBridge {
        reloads: Cell<usize>,
        restarts: Cell<usize>,
        fail_restart: bool,
    }

    impl RecordingBridge {
        fn new(fail_restart: bool) -> Self {
            Self {
                reloads: Cell::new(0),
                restarts: Cell::new(0),
                fail_restart,
            }
        }
    }

    impl HostBridge for RecordingBridge {
        fn reload_module_list(&self) -> anyhow::Result<()> {
            self.reloads.set(self.reloads.get() + 1);
            Ok(())
        }

        fn restart_host(&self) -> anyhow::Result<()> {
            self.restarts.set(self.restarts.get() + 1);
            if self.fail_restart {
                return Err(anyhow!("no supervisor"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_hooks_run_only_when_requested() {
        let bridge = RecordingBridge::new(false);
        let warnings = run_post_checkout(&bridge, false, false);
        assert!(warnings.is_empty());
        assert_eq!(bridge.reloads.get(), 0);
        assert_eq!(bridge.restarts.get(), 0);
    }

    #[test]
    fn test_successful_hooks_produce_no_warnings() {
        let bridge = RecordingBridge::new(false);
        let warnings = run_post_checkout(&bridge, true, true);
        assert!(warnings.is_empty());
        assert_eq!(bridge.reloads.get(), 1);
        assert_eq!(bridge.restarts.get(), 1);
    }

    #[test]
    fn test_restart_failure_becomes_warning() {
        let bridge = RecordingBridge::new(true);
        let warnings = run_post_checkout(&bridge, true, true);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], Warning::RestartFailed { .. }));
        // The reload still ran and the checkout is untouched
        assert_eq!(bridge.reloads.get(), 1);
    }
}
