use crate::error::{IndexerError, Result};
use crate::paths::{document_id, folder_path_of, relative_path};
use crate::stats::ScanStats;
use crate::title::extract_title;
use recall_protocol::{Document, FolderNode};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::{DirEntry, WalkDir};

/// Result of a full scan: the catalog, its folder tree and counters.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub documents: Vec<Document>,
    pub folder_tree: FolderNode,
    pub stats: ScanStats,
}

/// Walks a root directory and catalogs every `.md` file below it.
pub struct MarkdownScanner {
    root: PathBuf,
}

impl MarkdownScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the whole tree.
    ///
    /// A missing root is created empty. Unreadable files and subdirectories
    /// are logged and skipped; only a failure on the root itself aborts.
    pub fn scan(&self) -> Result<ScanOutput> {
        let start = Instant::now();
        let mut output = ScanOutput::default();

        log::info!("Scanning Markdown directory {}", self.root.display());
        self.ensure_root()?;

        // Iterative walk: nesting depth is bounded by heap, not the call stack.
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(IndexerError::from_walk(&self.root, err));
                }
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {err}");
                    output.stats.skipped += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() || !is_markdown(entry.path()) {
                continue;
            }

            match self.index_file(&entry) {
                Ok(doc) => {
                    output.folder_tree.insert_path(&doc.folder_path);
                    output.stats.total_bytes += doc.size;
                    output.documents.push(doc);
                }
                Err(err) => {
                    log::warn!("Skipping {}: {err}", entry.path().display());
                    output.stats.skipped += 1;
                }
            }
        }

        output.stats.documents = output.documents.len();
        output.stats.folders = output.folder_tree.folder_count();
        output.stats.duration_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Found {} Markdown files in {} folders ({} skipped, {} ms)",
            output.stats.documents,
            output.stats.folders,
            output.stats.skipped,
            output.stats.duration_ms
        );
        Ok(output)
    }

    fn ensure_root(&self) -> Result<()> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(IndexerError::InvalidRoot(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                std::fs::create_dir_all(&self.root)
                    .map_err(|e| IndexerError::fs(&self.root, e))?;
                log::info!("Created missing directory {}", self.root.display());
                Ok(())
            }
            Err(err) => Err(IndexerError::fs(&self.root, err)),
        }
    }

    fn index_file(&self, entry: &DirEntry) -> Result<Document> {
        let path = entry.path();
        let size = entry
            .metadata()
            .map_err(|e| IndexerError::from_walk(path, e))?
            .len();
        let bytes = std::fs::read(path).map_err(|e| IndexerError::fs(path, e))?;
        let content = String::from_utf8_lossy(&bytes);

        let relative_path = relative_path(&self.root, path)?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let title = extract_title(&content).unwrap_or_else(|| file_stem(path, &file_name));

        Ok(Document {
            id: document_id(&relative_path),
            title,
            file_name,
            folder_path: folder_path_of(&relative_path),
            relative_path,
            size,
        })
    }
}

/// True for files with a `.md` extension, compared case-insensitively.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

fn file_stem(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}
