//! Installed module commands

use anyhow::{anyhow, Result};
use brokkr_core::types::{InstalledCheckout, RemoveOutcome};
use brokkr_sources::CheckoutLedger;
use dialoguer::Confirm;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::{ModuleCommands, ModuleListArgs, ModuleRemoveArgs};
use crate::output;

pub(crate) async fn run(command: ModuleCommands) -> Result<()> {
    match command {
        ModuleCommands::List(args) => list(args),
        ModuleCommands::Remove(args) => remove(args),
    }
}

#[derive(Tabled)]
struct ModuleRow {
    module: String,
    #[tabled(rename = "ref")]
    reference: String,
    source: String,
    path: String,
    installed: String,
}

fn list(args: ModuleListArgs) -> Result<()> {
    let ledger = CheckoutLedger::load_default()?;
    let mut records = ledger.live_records()?;
    // Newest first
    records.sort_by(|a, b| b.installed_at.cmp(&a.installed_at));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        output::info("No modules installed");
        return Ok(());
    }

    let rows: Vec<ModuleRow> = records
        .iter()
        .map(|r| ModuleRow {
            module: r.module_name.clone(),
            reference: r.ref_name.clone(),
            source: r.source_name.clone(),
            path: r.installed_path.display().to_string(),
            installed: r.installed_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::sharp());
    println!("{}", table);

    Ok(())
}

fn remove(args: ModuleRemoveArgs) -> Result<()> {
    let ledger = CheckoutLedger::load_default()?;
    let record = resolve_target(&ledger, &args.target)?;

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove {} ({} at {})?",
                record.module_name,
                record.ref_name,
                record.installed_path.display()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            output::info("Cancelled");
            return Ok(());
        }
    }

    let outcome = ledger.remove(&record)?;
    match &outcome {
        RemoveOutcome::Deleted { .. } => output::success(&outcome.message()),
        RemoveOutcome::RecordOnly { .. } => output::warning(&outcome.message()),
    }

    Ok(())
}

/// Resolve an installed checkout by its path or module name
fn resolve_target(ledger: &CheckoutLedger, target: &str) -> Result<InstalledCheckout> {
    let records = ledger.live_records()?;

    let mut matches: Vec<InstalledCheckout> = records
        .into_iter()
        .filter(|r| r.installed_path == Path::new(target) || r.module_name == target)
        .collect();

    match matches.len() {
        0 => Err(anyhow!("No installed module matches '{}'", target)),
        1 => Ok(matches.remove(0)),
        _ => {
            let paths: Vec<String> = matches
                .iter()
                .map(|r| r.installed_path.display().to_string())
                .collect();
            Err(anyhow!(
                "'{}' matches multiple installed modules; pass the installed path instead:\n  {}",
                target,
                paths.join("\n  ")
            ))
        }
    }
}
