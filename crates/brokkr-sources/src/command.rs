//! Subprocess execution with timeouts
//!
//! Commands are always structured argument lists handed to the OS process
//! spawn, never shell strings, so operator-supplied values (URLs, ref names)
//! cannot be reinterpreted by a shell.

use brokkr_core::error::CommandError;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Default wall-clock timeout for external commands
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Runs external commands, capturing output and enforcing a hard timeout
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a command to completion and return its right-trimmed stdout.
    ///
    /// Non-zero exits fail with the captured stderr attached. When the
    /// timeout expires the child is killed and the error is the distinct
    /// [`CommandError::TimedOut`] variant.
    pub async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<String, CommandError> {
        let rendered = render_command(program, args);
        debug!("running `{}`", rendered);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the in-flight future on timeout kills the child
            .kill_on_drop(true);

        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| CommandError::Io {
            command: rendered.clone(),
            source: e,
        })?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    Ok(stdout.trim_end().to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr)
                        .trim_end()
                        .to_string();
                    match output.status.code() {
                        Some(exit_code) => Err(CommandError::Failed {
                            command: rendered,
                            exit_code,
                            stderr,
                        }),
                        None => Err(CommandError::Killed {
                            command: rendered,
                            stderr,
                        }),
                    }
                }
            }
            Ok(Err(e)) => Err(CommandError::Io {
                command: rendered,
                source: e,
            }),
            Err(_) => Err(CommandError::TimedOut {
                command: rendered,
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }
}

/// Render a command line for error messages and logs
fn render_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_trimmed_stdout() {
        let runner = CommandRunner::new();
        let out = runner.run("echo", &["hello"], None).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_code_and_stderr() {
        let runner = CommandRunner::new();
        let err = runner
            .run("sh", &["-c", "echo oops >&2; exit 3"], None)
            .await
            .unwrap_err();

        match err {
            CommandError::Failed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, 3);
                assert_eq!(stderr, "oops");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let runner = CommandRunner::new();
        let err = runner
            .run("brokkr-definitely-not-a-binary", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Io { .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_distinct_from_failure() {
        let runner = CommandRunner::with_timeout(Duration::from_millis(100));
        let err = runner.run("sleep", &["5"], None).await.unwrap_err();
        assert!(err.is_timeout());
        assert!(matches!(err, CommandError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = std::env::temp_dir();
        let runner = CommandRunner::new();
        let out = runner.run("pwd", &[], Some(&dir)).await.unwrap();
        // Some systems report the temp dir through a symlink
        let reported = std::fs::canonicalize(out).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir).unwrap());
    }
}
