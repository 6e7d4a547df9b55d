//! Checkout command

use anyhow::{anyhow, Result};
use brokkr_core::types::SyncState;
use brokkr_sources::{run_post_checkout, CheckoutEngine, CheckoutLedger, CommandRunner};

use crate::cli::CheckoutArgs;
use crate::config::BrokkrConfig;
use crate::host::ProcessHost;
use crate::output;
use crate::store::RepositoryStore;

/// Check out a ref from a registered repository into its target root
pub(crate) async fn run(args: CheckoutArgs) -> Result<()> {
    let store = RepositoryStore::load_default()?;
    let source = store
        .find(&args.repo)?
        .ok_or_else(|| anyhow!("No repository named '{}' is registered", args.repo))?;

    // Selection is offered from a validated catalog; the engine itself
    // re-resolves the ref against the remote
    if source.sync_state != SyncState::Validated {
        return Err(anyhow!(
            "Repository '{}' has no validated catalog. Run 'brokkr repo validate {}' first.",
            args.repo,
            args.repo
        ));
    }

    let config = BrokkrConfig::load()?;
    let runner = CommandRunner::with_timeout(config.command_timeout());
    let ledger = CheckoutLedger::load_default()?;
    let engine = CheckoutEngine::new(runner, ledger);

    output::header("Checkout");
    output::kv("Repository", &source.url);
    output::kv("Reference", &args.reference);
    println!();

    let spinner = output::spinner("Staging checkout...");
    let result = engine
        .checkout(&source, &args.reference, args.module_name.as_deref())
        .await;
    spinner.finish_and_clear();

    let outcome = result?;

    for warning in &outcome.warnings {
        output::warning(&warning.to_string());
    }
    output::success(&format!(
        "Checked out {} to {}",
        outcome.record.ref_name,
        outcome.installed_path.display()
    ));

    // Post-checkout host hooks never roll back the published checkout;
    // their failures come back as warnings
    let host = ProcessHost::new(config.reload_hook.clone());
    for warning in run_post_checkout(&host, args.reload, args.restart) {
        output::warning(&warning.to_string());
    }

    Ok(())
}
