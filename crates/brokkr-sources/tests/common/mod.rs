//! Shared fixtures for engine integration tests

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Tests that need a real git binary skip themselves when it is absent.
pub fn git_available() -> bool {
    which::which("git").is_ok()
}

/// A local git repository with annotated tags and branches, served over a
/// `file://` URL so ls-remote and shallow clones exercise the real
/// transport.
pub struct GitFixture {
    _dir: TempDir,
    pub url: String,
}

impl GitFixture {
    pub fn new(tags: &[&str], extra_branches: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        // Named subdirectory so the URL basename is a stable module name
        let repo = dir.path().join("fixture-repo");
        std::fs::create_dir_all(&repo).unwrap();

        git(&repo, &["init", "--quiet"]);
        git(&repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&repo, &["config", "user.email", "fixture@example.com"]);
        git(&repo, &["config", "user.name", "Fixture"]);
        git(&repo, &["config", "commit.gpgsign", "false"]);

        std::fs::write(repo.join("README.md"), "fixture\n").unwrap();
        git(&repo, &["add", "."]);
        git(&repo, &["commit", "--quiet", "-m", "initial"]);

        // Annotated tags so ls-remote reports `^{}` dereference lines too
        for tag in tags {
            git(&repo, &["tag", "-a", tag, "-m", tag]);
        }
        for branch in extra_branches {
            git(&repo, &["branch", branch]);
        }

        let url = format!("file://{}", repo.display());
        Self { _dir: dir, url }
    }
}

fn git(cwd: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}
