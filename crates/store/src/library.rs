use crate::error::{Result, StoreError};
use crate::join::{join_all, with_review};
use crate::state::{LibraryState, StateFile};
use chrono::{DateTime, Utc};
use recall_indexer::{normalize_folder_query, MarkdownScanner, ScanStats};
use recall_protocol::{Document, FolderNode, ReviewRecord, ReviewedDocument};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

/// Where a library reads Markdown from and keeps its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryConfig {
    pub markdown_dir: PathBuf,
    pub db_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub documents: Vec<Document>,
    pub folder_tree: FolderNode,
    pub stats: ScanStats,
    /// Review records dropped because their document disappeared
    #[serde(default)]
    pub pruned_records: usize,
}

/// A document with its review state and raw Markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    #[serde(flatten)]
    pub document: ReviewedDocument,
    pub content: String,
}

/// Owns the catalog, folder tree and review records of one Markdown root.
///
/// Every mutation is persisted before it becomes visible. Scans are
/// exclusive: a second scan requested while one runs fails with
/// [`StoreError::ScanInProgress`].
pub struct Library {
    config: LibraryConfig,
    state_file: StateFile,
    state: RwLock<LibraryState>,
    scan_guard: Mutex<()>,
}

impl Library {
    /// Load persisted state, creating an empty state file if needed. Does not
    /// scan.
    pub fn open(config: LibraryConfig) -> Result<Self> {
        let state_file = StateFile::new(&config.db_file);
        let state = state_file.load_or_init()?;
        log::info!(
            "Opened library {} ({} documents, {} review records)",
            state_file.path().display(),
            state.documents.len(),
            state.reading_records.len()
        );

        Ok(Self {
            config,
            state_file,
            state: RwLock::new(state),
            scan_guard: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.markdown_dir
    }

    /// Rescan the root and replace the catalog and folder tree wholesale.
    /// Review records are kept.
    pub fn scan(&self) -> Result<ScanReport> {
        self.scan_with(false)
    }

    /// Rescan, then drop review records of documents that no longer exist.
    pub fn scan_and_prune(&self) -> Result<ScanReport> {
        self.scan_with(true)
    }

    fn scan_with(&self, prune: bool) -> Result<ScanReport> {
        let _scan = match self.scan_guard.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(StoreError::ScanInProgress),
        };

        let output = MarkdownScanner::new(self.root()).scan()?;

        let mut state = self.write();
        let mut next = LibraryState {
            documents: output.documents,
            reading_records: state.reading_records.clone(),
            folder_structure: output.folder_tree,
        };
        let pruned_records = if prune {
            next.prune_orphaned_records()
        } else {
            0
        };
        if pruned_records > 0 {
            log::info!("Removed {pruned_records} orphaned review records");
        }

        self.state_file.save(&next)?;
        *state = next;

        Ok(ScanReport {
            documents: state.documents.clone(),
            folder_tree: state.folder_structure.clone(),
            stats: output.stats,
            pruned_records,
        })
    }

    /// Drop review records of documents missing from the current catalog.
    pub fn prune_orphaned_records(&self) -> Result<usize> {
        let mut state = self.write();
        let mut next = state.clone();
        let removed = next.prune_orphaned_records();
        if removed > 0 {
            self.state_file.save(&next)?;
            *state = next;
            log::info!("Removed {removed} orphaned review records");
        }
        Ok(removed)
    }

    pub fn list_documents(&self, now: DateTime<Utc>) -> Vec<ReviewedDocument> {
        let state = self.read();
        join_all(&state.documents, &state.reading_records, now)
    }

    /// Documents whose folder path equals `folder_path` exactly; `""` lists
    /// the root only.
    pub fn list_documents_in_folder(
        &self,
        folder_path: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReviewedDocument>> {
        let folder = normalize_folder_query(folder_path)?;
        let state = self.read();
        Ok(join_all(
            state.documents.iter().filter(|doc| doc.folder_path == folder),
            &state.reading_records,
            now,
        ))
    }

    pub fn list_due_documents(&self, now: DateTime<Utc>) -> Vec<ReviewedDocument> {
        let mut documents = self.list_documents(now);
        documents.retain(|doc| doc.due_for_review);
        documents
    }

    pub fn document_count(&self) -> usize {
        self.read().documents.len()
    }

    pub fn folder_tree(&self) -> FolderNode {
        self.read().folder_structure.clone()
    }

    pub fn document(&self, id: &str) -> Result<Document> {
        self.read()
            .find(id)
            .cloned()
            .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))
    }

    pub fn review_record(&self, id: &str) -> Option<ReviewRecord> {
        self.read().reading_records.get(id).cloned()
    }

    /// Raw Markdown of a catalogued document, read from disk now.
    pub fn document_content(&self, id: &str) -> Result<String> {
        let document = self.document(id)?;
        let path = self.root().join(&document.relative_path);
        if !path.is_file() {
            return Err(StoreError::FileMissing {
                id: document.id,
                path,
            });
        }

        let bytes = std::fs::read(&path).map_err(|e| {
            log::error!("Failed to read {}: {e}", path.display());
            StoreError::fs(&path, e)
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn document_with_content(&self, id: &str, now: DateTime<Utc>) -> Result<DocumentContent> {
        let content = self.document_content(id)?;
        let state = self.read();
        let document = state
            .find(id)
            .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))?;
        Ok(DocumentContent {
            document: with_review(document, state.reading_records.get(id), now),
            content,
        })
    }

    /// Record a review of `id` at `now` and persist the new schedule.
    ///
    /// Returns the document joined with its updated record, taken under the
    /// same write lock as the update.
    pub fn mark_reviewed(&self, id: &str, now: DateTime<Utc>) -> Result<ReviewedDocument> {
        let mut state = self.write();
        let document = state
            .find(id)
            .cloned()
            .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))?;

        let updated = recall_scheduler::mark_reviewed(state.reading_records.get(id), now);
        let mut next = state.clone();
        next.reading_records.insert(id.to_string(), updated.clone());
        self.state_file.save(&next)?;
        *state = next;

        log::info!(
            "Reviewed {} in {} (count {}, next {})",
            document.title,
            document.folder_label(),
            updated.review_count,
            updated
                .next_review_date
                .map(|d| d.to_rfc3339())
                .unwrap_or_default()
        );
        Ok(with_review(&document, Some(&updated), now))
    }

    fn read(&self) -> RwLockReadGuard<'_, LibraryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LibraryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
