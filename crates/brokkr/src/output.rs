//! Terminal output helpers

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Warnings go to stderr so piped output stays clean
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Spinner shown while a remote operation is in flight
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap());
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
