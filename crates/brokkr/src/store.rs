//! Persisted repository records
//!
//! The record-storage collaborator the engine stays agnostic of: a JSON
//! file of [`RepositorySource`] records under the Brokkr home directory,
//! written atomically via a temp file and rename so a crash mid-save never
//! truncates the store.

use anyhow::{anyhow, Context, Result};
use brokkr_core::brokkr_home;
use brokkr_core::types::RepositorySource;
use std::fs;
use std::path::{Path, PathBuf};

/// Store file name under the Brokkr home directory
const STORE_FILE: &str = "repositories.json";

pub struct RepositoryStore {
    store_path: PathBuf,
}

impl RepositoryStore {
    /// Create/load the store from its default location
    /// (`~/.brokkr/repositories.json`, honoring `BROKKR_HOME`)
    pub fn load_default() -> Result<Self> {
        let base = brokkr_home()?;
        fs::create_dir_all(&base).context("Failed to create brokkr home directory")?;
        Ok(Self {
            store_path: base.join(STORE_FILE),
        })
    }

    /// Create a store at a custom path
    pub fn new(store_path: PathBuf) -> Self {
        Self { store_path }
    }

    pub fn path(&self) -> &Path {
        &self.store_path
    }

    /// All registered sources, in registration order
    pub fn load(&self) -> Result<Vec<RepositorySource>> {
        if !self.store_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.store_path)
            .with_context(|| format!("Failed to read {}", self.store_path.display()))?;

        let sources: Vec<RepositorySource> = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt repository store: {}", self.store_path.display()))?;

        Ok(sources)
    }

    /// Find a source by name
    pub fn find(&self, name: &str) -> Result<Option<RepositorySource>> {
        Ok(self.load()?.into_iter().find(|s| s.name == name))
    }

    /// Insert a new source; fails if the name is taken
    pub fn insert(&self, source: RepositorySource) -> Result<()> {
        let mut sources = self.load()?;
        if sources.iter().any(|s| s.name == source.name) {
            return Err(anyhow!(
                "A repository named '{}' is already registered",
                source.name
            ));
        }
        sources.push(source);
        self.save(&sources)
    }

    /// Replace an existing source's record; fails if it is not registered
    pub fn update(&self, source: RepositorySource) -> Result<()> {
        let mut sources = self.load()?;
        let slot = sources
            .iter_mut()
            .find(|s| s.name == source.name)
            .ok_or_else(|| anyhow!("No repository named '{}' is registered", source.name))?;
        *slot = source;
        self.save(&sources)
    }

    /// Remove a source by name; returns whether a record was dropped
    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut sources = self.load()?;
        let before = sources.len();
        sources.retain(|s| s.name != name);

        if sources.len() == before {
            return Ok(false);
        }

        self.save(&sources)?;
        Ok(true)
    }

    /// Write the full record set atomically: temp file, fsync, rename
    fn save(&self, sources: &[RepositorySource]) -> Result<()> {
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent).context("Failed to create store parent directory")?;
        }

        let temp_path = self.store_path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(sources).context("Failed to serialize store")?;

        fs::write(&temp_path, json).context("Failed to write temp store file")?;
        let file = fs::File::open(&temp_path).context("Failed to reopen temp store file")?;
        file.sync_all().context("Failed to sync temp store file")?;
        drop(file);

        fs::rename(&temp_path, &self.store_path).context("Failed to replace store file")?;
        Ok(())
    }
}
