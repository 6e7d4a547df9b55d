//! Embeds build metadata consumed by `brokkr version`

use std::process::Command;

fn main() {
    println!(
        "cargo:rustc-env=BUILD_DATE={}",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    // TARGET is only set for the build script, so re-export it to the crate
    if let Ok(target) = std::env::var("TARGET") {
        println!("cargo:rustc-env=TARGET={target}");
    }

    if let Some(sha) = git_short_sha() {
        println!("cargo:rustc-env=GIT_SHA={sha}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
}

/// Short commit SHA of the checkout being built, when building from git
fn git_short_sha() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
