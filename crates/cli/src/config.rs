//! Runtime configuration resolved from flags, environment and defaults

use recall_store::LibraryConfig;
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_MARKDOWN_DIR: &str = "docs";
pub const DEFAULT_DB_FILE: &str = "db/data.json";
pub const DEFAULT_PORT: u16 = 3030;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub markdown_dir: PathBuf,
    pub db_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            markdown_dir: PathBuf::from(DEFAULT_MARKDOWN_DIR),
            db_file: PathBuf::from(DEFAULT_DB_FILE),
        }
    }
}

impl AppConfig {
    pub fn new(markdown_dir: impl Into<PathBuf>, db_file: impl Into<PathBuf>) -> Self {
        Self {
            markdown_dir: markdown_dir.into(),
            db_file: db_file.into(),
        }
    }

    pub fn library_config(&self) -> LibraryConfig {
        LibraryConfig {
            markdown_dir: self.markdown_dir.clone(),
            db_file: self.db_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(AppConfig::default()).unwrap();
        assert_eq!(value["markdownDir"], "docs");
        assert_eq!(value["dbFile"], "db/data.json");
    }
}
