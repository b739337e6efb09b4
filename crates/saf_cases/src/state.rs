//! Persisted dedup state
//!
//! On disk the state is a JSON object mapping folder label to the list of case
//! ids already emitted for it. Nothing guards the file against concurrent
//! runs; a single reader/writer per pass is assumed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::error::StateError;

/// Folder label → case ids already emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DedupState {
    folders: BTreeMap<String, BTreeSet<String>>,
}

impl DedupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, folder: &str, case_id: &str) -> bool {
        self.folders
            .get(folder)
            .is_some_and(|ids| ids.contains(case_id))
    }

    /// Record `case_id` as emitted. Returns false if it was already known.
    pub fn insert(&mut self, folder: &str, case_id: &str) -> bool {
        self.folders
            .entry(folder.to_string())
            .or_default()
            .insert(case_id.to_string())
    }

    /// Number of ids known for `folder`.
    pub fn folder_len(&self, folder: &str) -> usize {
        self.folders.get(folder).map_or(0, BTreeSet::len)
    }

    pub fn folders(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.folders.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total ids across all folders.
    pub fn len(&self) -> usize {
        self.folders.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Location of the persisted dedup state.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state, falling back to empty.
    ///
    /// The state is a cache of what was already sent: an absent file is a
    /// first run, and an unreadable one is logged and ignored.
    pub fn load(&self) -> DedupState {
        match self.try_load() {
            Ok(Some(state)) => {
                debug!(path = %self.path.display(), cases = state.len(), "Loaded dedup state");
                state
            }
            Ok(None) => DedupState::new(),
            Err(err) => {
                error!(error = %err, "Failed to load state file");
                DedupState::new()
            }
        }
    }

    fn try_load(&self) -> Result<Option<DedupState>, StateError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StateError::Io {
            path: self.path.clone(),
            source,
        })?;
        let state = serde_json::from_str(&content).map_err(|source| StateError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(state))
    }

    /// Persist the state. Failures are logged, never raised.
    pub fn save(&self, state: &DedupState) {
        if let Err(err) = self.try_save(state) {
            error!(error = %err, "Failed to save state file");
        }
    }

    fn try_save(&self, state: &DedupState) -> Result<(), StateError> {
        let io_err = |source| StateError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        state.serialize(&mut ser).map_err(|source| StateError::Json {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, buf).map_err(io_err)
    }
}
