//! Repository source commands

use anyhow::{anyhow, Result};
use brokkr_core::types::{RefKind, RepositorySource, SyncState};
use brokkr_core::validate::{validate_source_name, validate_target_root, validate_url};
use brokkr_sources::{catalog, CheckoutLedger, CommandRunner};
use dialoguer::Confirm;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::{
    RepoAddArgs, RepoCommands, RepoListArgs, RepoRefsArgs, RepoRemoveArgs, RepoValidateArgs,
};
use crate::config::BrokkrConfig;
use crate::output;
use crate::store::RepositoryStore;

pub(crate) async fn run(command: RepoCommands) -> Result<()> {
    match command {
        RepoCommands::Add(args) => add(args),
        RepoCommands::List(args) => list(args),
        RepoCommands::Validate(args) => validate(args).await,
        RepoCommands::Refs(args) => refs(args),
        RepoCommands::Remove(args) => remove(args),
    }
}

/// Register a repository source, validating its URL and target root eagerly
fn add(args: RepoAddArgs) -> Result<()> {
    validate_source_name(&args.name)?;
    validate_url(&args.url)?;

    let config = BrokkrConfig::load()?;
    let target = args
        .target
        .or(config.default_target_root)
        .ok_or_else(|| {
            anyhow!(
                "No target directory given; pass --target or set \
                 default_target_root in the config file"
            )
        })?;
    let target_root = target.as_std_path().to_path_buf();
    validate_target_root(&target_root)?;

    let mut source = RepositorySource::new(&args.name, &args.url, target_root);
    source.active = !args.inactive;
    let kind = source.host_kind();

    let store = RepositoryStore::load_default()?;
    store.insert(source)?;

    output::success(&format!("Registered repository '{}' ({})", args.name, kind));
    output::info(&format!(
        "Run 'brokkr repo validate {}' to fetch its ref catalog",
        args.name
    ));
    Ok(())
}

#[derive(Tabled)]
struct RepoRow {
    name: String,
    kind: String,
    url: String,
    state: String,
    refs: usize,
    #[tabled(rename = "last synced")]
    last_synced: String,
}

fn list(args: RepoListArgs) -> Result<()> {
    let store = RepositoryStore::load_default()?;
    let sources: Vec<RepositorySource> = store
        .load()?
        .into_iter()
        .filter(|s| args.all || s.active)
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }

    if sources.is_empty() {
        output::info("No repositories registered");
        return Ok(());
    }

    let rows: Vec<RepoRow> = sources
        .iter()
        .map(|s| RepoRow {
            name: s.name.clone(),
            kind: s.host_kind().to_string(),
            url: s.url.clone(),
            state: match (&s.sync_state, s.active) {
                (state, true) => state.to_string(),
                (state, false) => format!("{state} (inactive)"),
            },
            refs: s.catalog.len(),
            last_synced: s
                .last_synced_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::sharp());
    println!("{}", table);

    for source in sources.iter().filter(|s| s.sync_state == SyncState::Error) {
        if let Some(error) = &source.last_error {
            output::warning(&format!("{}: {}", source.name, error));
        }
    }

    Ok(())
}

/// Validate the repository and refresh its catalog. The state transition is
/// persisted on success and failure alike, so an error state survives the
/// process.
async fn validate(args: RepoValidateArgs) -> Result<()> {
    let store = RepositoryStore::load_default()?;
    let mut source = store
        .find(&args.name)?
        .ok_or_else(|| anyhow!("No repository named '{}' is registered", args.name))?;

    let config = BrokkrConfig::load()?;
    let runner = CommandRunner::with_timeout(config.command_timeout());

    let spinner = output::spinner(&format!("Listing refs for {}...", source.url));
    let result = catalog::validate(&mut source, &runner).await;
    spinner.finish_and_clear();

    store.update(source)?;

    let summary = result?;
    for warning in &summary.warnings {
        output::warning(&warning.to_string());
    }
    output::success(&summary.message());
    Ok(())
}

#[derive(Tabled)]
struct RefRow {
    kind: String,
    name: String,
    reference: String,
}

/// Glyph shown next to a ref kind in listings, computed on read
fn kind_glyph(kind: RefKind) -> &'static str {
    match kind {
        RefKind::Tag => "🏷",
        RefKind::Branch => "🌿",
    }
}

fn refs(args: RepoRefsArgs) -> Result<()> {
    let store = RepositoryStore::load_default()?;
    let source = store
        .find(&args.name)?
        .ok_or_else(|| anyhow!("No repository named '{}' is registered", args.name))?;

    if source.sync_state != SyncState::Validated {
        return Err(anyhow!(
            "Repository '{}' has no validated catalog. Run 'brokkr repo validate {}' first.",
            args.name,
            args.name
        ));
    }

    if args.json {
        let references: Vec<String> = source
            .catalog
            .iter()
            .map(|r| r.full_reference())
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "name": source.name,
                "url": source.url,
                "last_synced_at": source.last_synced_at,
                "refs": references,
            }))?
        );
        return Ok(());
    }

    let rows: Vec<RefRow> = source
        .catalog
        .iter()
        .map(|r| RefRow {
            kind: format!("{} {}", kind_glyph(r.kind), r.kind),
            name: r.name.clone(),
            reference: r.full_reference(),
        })
        .collect();

    output::header(&format!("Refs: {}", source.name));
    let mut table = Table::new(&rows);
    table.with(Style::sharp());
    println!("{}", table);

    if let Some(synced) = source.last_synced_at {
        output::info(&format!("Last synced {}", synced.format("%Y-%m-%d %H:%M")));
    }

    Ok(())
}

/// Drop a source and cascade its checkout records. On-disk module
/// directories are kept; removing those is an explicit `module remove`.
fn remove(args: RepoRemoveArgs) -> Result<()> {
    let store = RepositoryStore::load_default()?;
    if store.find(&args.name)?.is_none() {
        return Err(anyhow!("No repository named '{}' is registered", args.name));
    }

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove repository '{}'? Its checkout records will be dropped \
                 (installed directories are kept)",
                args.name
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            output::info("Cancelled");
            return Ok(());
        }
    }

    store.remove(&args.name)?;

    let ledger = CheckoutLedger::load_default()?;
    let dropped = ledger.remove_for_source(&args.name)?;
    if dropped > 0 {
        output::info(&format!(
            "Dropped {} checkout record(s); installed directories were kept",
            dropped
        ));
    }

    output::success(&format!("Removed repository '{}'", args.name));
    Ok(())
}
