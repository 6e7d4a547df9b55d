//! Repository sources and their ref catalogs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Kind of a remote ref
///
/// The declaration order drives catalog ordering: tags sort before branches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    Tag,
    Branch,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Tag => "tag",
            RefKind::Branch => "branch",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named pointer reported by a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefDescriptor {
    pub kind: RefKind,
    /// Ref name as reported by the remote; branch names may contain `/`
    pub name: String,
}

impl RefDescriptor {
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            kind: RefKind::Tag,
            name: name.into(),
        }
    }

    pub fn branch(name: impl Into<String>) -> Self {
        Self {
            kind: RefKind::Branch,
            name: name.into(),
        }
    }

    /// Stable identifier used for selection and persistence, e.g.
    /// `tag:2.0` or `branch:feature/login`. Round-trips through [`parse`].
    ///
    /// [`parse`]: RefDescriptor::parse
    pub fn full_reference(&self) -> String {
        format!("{}:{}", self.kind, self.name)
    }

    /// Parse a full reference by splitting on the first `:`.
    ///
    /// Inputs without a kind prefix come from legacy single-kind catalogs
    /// and default to [`RefKind::Tag`]. Git forbids `:` in ref names, so an
    /// unrecognized prefix means the whole string is a legacy tag name.
    pub fn parse(reference: &str) -> Self {
        match reference.split_once(':') {
            Some(("tag", name)) => Self::tag(name),
            Some(("branch", name)) => Self::branch(name),
            _ => Self::tag(reference),
        }
    }
}

impl fmt::Display for RefDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_reference())
    }
}

/// Sort a catalog in place: all tags before all branches, names in
/// reverse-lexicographic order within each kind (a best-effort proxy for
/// newest-first, not semver-aware).
pub fn sort_catalog(refs: &mut [RefDescriptor]) {
    refs.sort_by(catalog_order);
}

fn catalog_order(a: &RefDescriptor, b: &RefDescriptor) -> Ordering {
    a.kind.cmp(&b.kind).then_with(|| b.name.cmp(&a.name))
}

/// Render a catalog as its persisted textual form: newline-separated full
/// references, preserving input order.
pub fn format_catalog(refs: &[RefDescriptor]) -> String {
    refs.iter()
        .map(RefDescriptor::full_reference)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the persisted textual form back into a catalog, preserving input
/// order. Blank lines are skipped.
pub fn parse_catalog(text: &str) -> Vec<RefDescriptor> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(RefDescriptor::parse)
        .collect()
}

/// Advisory classification of a repository host, inferred from the URL.
///
/// Display-only: nothing behavioral hangs off it. Hosts that are neither
/// GitHub nor GitLab are reported as [`HostKind::Unknown`] rather than
/// silently defaulting, so a misconfigured URL stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKind {
    GitHub,
    GitLab,
    Unknown,
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostKind::GitHub => write!(f, "github"),
            HostKind::GitLab => write!(f, "gitlab"),
            HostKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Synchronization state of a repository source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    #[default]
    Unsynced,
    Validated,
    Error,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Unsynced => write!(f, "unsynced"),
            SyncState::Validated => write!(f, "validated"),
            SyncState::Error => write!(f, "error"),
        }
    }
}

/// A registered remote repository and its cached ref catalog
///
/// Invariants maintained by the sync operation: `catalog` is non-empty
/// whenever `sync_state` is `Validated`; `last_error` is cleared on every
/// successful listing and set on every failed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySource {
    /// Operator-chosen unique label, used as the CLI handle
    pub name: String,

    /// Fully-qualified remote location (scheme + host required)
    pub url: String,

    /// Absolute path under which checkouts are published
    pub target_root: PathBuf,

    #[serde(default)]
    pub sync_state: SyncState,

    /// Set only on a successful listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,

    /// Set only when `sync_state` is `Error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,

    /// Cached ref catalog, present only when validated.
    ///
    /// Persisted as newline-separated full-reference text, the stored form
    /// selection references are parsed back out of.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "catalog_encoding"
    )]
    pub catalog: Vec<RefDescriptor>,

    /// Inactive sources are hidden from default listings but keep their
    /// records
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Serde representation of a catalog: the newline-separated full-reference
/// string, round-tripping through [`format_catalog`]/[`parse_catalog`]
mod catalog_encoding {
    use super::{format_catalog, parse_catalog, RefDescriptor};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        refs: &[RefDescriptor],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_catalog(refs))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<RefDescriptor>, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(parse_catalog(&text))
    }
}

impl RepositorySource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        target_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            target_root: target_root.into(),
            sync_state: SyncState::Unsynced,
            last_synced_at: None,
            last_error: None,
            catalog: Vec::new(),
            active: true,
        }
    }

    /// Host classification inferred from the URL, computed on read
    pub fn host_kind(&self) -> HostKind {
        let host = Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase));

        match host.as_deref() {
            Some(h) if h.contains("github") => HostKind::GitHub,
            Some(h) if h.contains("gitlab") => HostKind::GitLab,
            _ => HostKind::Unknown,
        }
    }
}
