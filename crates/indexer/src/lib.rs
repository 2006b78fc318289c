//! # Recall Indexer
//!
//! Builds the document catalog for a folder of Markdown notes.
//!
//! ## Pipeline
//!
//! ```text
//! Root directory
//!     │
//!     ├──> Walker (file-name order, symlinks followed)
//!     │      └─> *.md files
//!     │
//!     ├──> Per-file indexing
//!     │      └─> id = md5(relative path), title, folder path, size
//!     │
//!     └──> Folder tree
//!            └─> only folders holding at least one document
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use recall_indexer::MarkdownScanner;
//!
//! fn main() -> recall_indexer::Result<()> {
//!     let output = MarkdownScanner::new("./docs").scan()?;
//!     println!("Indexed {} documents", output.stats.documents);
//!     Ok(())
//! }
//! ```

mod error;
mod paths;
mod scanner;
mod stats;
mod title;

pub use error::{IndexerError, Result};
pub use paths::{
    document_id, folder_path_of, normalize_folder_query, normalize_separators, relative_path,
};
pub use scanner::{is_markdown, MarkdownScanner, ScanOutput};
pub use stats::ScanStats;
pub use title::extract_title;
