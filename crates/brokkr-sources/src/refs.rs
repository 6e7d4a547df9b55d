//! Remote ref discovery
//!
//! Lists tags and branches from a remote repository with `git ls-remote`
//! without fetching content, and normalizes the result into the sorted
//! catalog form.

use crate::command::CommandRunner;
use brokkr_core::error::{CommandError, ListError};
use brokkr_core::types::{sort_catalog, RefDescriptor, RefKind, Warning};
use tracing::warn;

const TAG_PREFIX: &str = "refs/tags/";
const HEAD_PREFIX: &str = "refs/heads/";

/// Annotated tags are reported twice; the `^{}` line points at the commit
/// the tag object dereferences to and is not a separate tag.
const DEREF_SUFFIX: &str = "^{}";

/// A normalized ref listing together with any partial-query warnings
#[derive(Debug, Clone)]
pub struct RefListing {
    /// Tags before branches, reverse-lexicographic within each kind
    pub refs: Vec<RefDescriptor>,
    pub warnings: Vec<Warning>,
}

impl RefListing {
    pub fn count_of(&self, kind: RefKind) -> usize {
        self.refs.iter().filter(|r| r.kind == kind).count()
    }
}

/// Query a remote for tags and branches and merge them into a catalog.
///
/// A repository may have tags but no branches or vice versa, so a single
/// failed query degrades to a [`Warning`] and contributes nothing. The
/// operation only fails when both queries fail (the first failure's message
/// is preserved) or when the merged result is empty.
pub async fn list_refs(runner: &CommandRunner, url: &str) -> Result<RefListing, ListError> {
    let tags = query_refs(runner, url, RefKind::Tag).await;
    let branches = query_refs(runner, url, RefKind::Branch).await;

    if let (Err(tag_err), Err(_)) = (&tags, &branches) {
        return Err(ListError::QueriesFailed {
            url: url.to_string(),
            message: tag_err.to_string(),
        });
    }

    let mut refs = Vec::new();
    let mut warnings = Vec::new();

    match tags {
        Ok(mut found) => refs.append(&mut found),
        Err(e) => {
            warn!("tag listing failed for {}: {}", url, e);
            warnings.push(Warning::TagQueryFailed {
                url: url.to_string(),
                message: e.to_string(),
            });
        }
    }

    match branches {
        Ok(mut found) => refs.append(&mut found),
        Err(e) => {
            warn!("branch listing failed for {}: {}", url, e);
            warnings.push(Warning::BranchQueryFailed {
                url: url.to_string(),
                message: e.to_string(),
            });
        }
    }

    if refs.is_empty() {
        return Err(ListError::NoRefs {
            url: url.to_string(),
        });
    }

    sort_catalog(&mut refs);

    Ok(RefListing { refs, warnings })
}

async fn query_refs(
    runner: &CommandRunner,
    url: &str,
    kind: RefKind,
) -> Result<Vec<RefDescriptor>, CommandError> {
    let (flag, prefix) = match kind {
        RefKind::Tag => ("--tags", TAG_PREFIX),
        RefKind::Branch => ("--heads", HEAD_PREFIX),
    };

    let stdout = runner.run("git", &["ls-remote", flag, url], None).await?;

    Ok(parse_ls_remote(&stdout, prefix)
        .into_iter()
        .map(|name| RefDescriptor { kind, name })
        .collect())
}

/// Extract ref names from `git ls-remote` output.
///
/// Each line is `<oid>\t<refname>`. Lines without the expected prefix are
/// skipped, as are annotated-tag dereference entries.
fn parse_ls_remote(output: &str, prefix: &str) -> Vec<String> {
    let mut names = Vec::new();

    for line in output.lines() {
        let Some(idx) = line.find(prefix) else {
            continue;
        };
        let name = &line[idx + prefix.len()..];
        if name.is_empty() || name.ends_with(DEREF_SUFFIX) {
            continue;
        }
        names.push(name.to_string());
    }

    names
}
