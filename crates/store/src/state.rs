use crate::error::{Result, StoreError};
use recall_protocol::{Document, FolderNode, ReviewRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryState {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub reading_records: BTreeMap<String, ReviewRecord>,
    #[serde(default)]
    pub folder_structure: FolderNode,
}

impl LibraryState {
    pub fn find(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Drop review records whose document is no longer in the catalog.
    pub fn prune_orphaned_records(&mut self) -> usize {
        let live: HashSet<&str> = self.documents.iter().map(|d| d.id.as_str()).collect();
        let before = self.reading_records.len();
        self.reading_records.retain(|id, _| live.contains(id.as_str()));
        before - self.reading_records.len()
    }
}

/// JSON file holding a [`LibraryState`].
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

    /// Read the state, creating an empty file (and its parent) when absent.
    pub fn load_or_init(&self) -> Result<LibraryState> {
        if !self.path.exists() {
            let state = LibraryState::default();
            self.save(&state)?;
            log::info!("Created empty state file {}", self.path.display());
            return Ok(state);
        }

        let bytes = std::fs::read(&self.path).map_err(|e| StoreError::fs(&self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::persistence(&self.path, e))
    }

    /// Write via a sibling temp file and rename, so readers never observe a
    /// half-written state.
    pub fn save(&self, state: &LibraryState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::fs(parent, e))?;
        }

        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| StoreError::persistence(&self.path, e))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(|e| StoreError::fs(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::fs(&self.path, e))?;
        Ok(())
    }
}
