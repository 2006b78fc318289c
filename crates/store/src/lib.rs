//! # Recall Store
//!
//! The [`Library`] joins the scanned catalog with persisted review records.
//!
//! ```text
//! scan()            ──> MarkdownScanner ──> replace catalog + tree ──> data.json
//! mark_reviewed()   ──> scheduler       ──> update one record      ──> data.json
//! list_*()          ──> catalog ⋈ records, evaluated at `now`
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Utc;
//! use recall_store::{Library, LibraryConfig};
//!
//! fn main() -> recall_store::Result<()> {
//!     let library = Library::open(LibraryConfig {
//!         markdown_dir: "./docs".into(),
//!         db_file: "./db/data.json".into(),
//!     })?;
//!     library.scan()?;
//!     for doc in library.list_due_documents(Utc::now()) {
//!         println!("{} ({})", doc.document.title, doc.document.folder_label());
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod join;
mod library;
mod state;

pub use error::{ErrorKind, Result, StoreError};
pub use join::{join_all, with_review};
pub use library::{DocumentContent, Library, LibraryConfig, ScanReport};
pub use recall_indexer::ScanStats;
pub use state::{LibraryState, StateFile};
