//! # Recall Protocol
//!
//! Data model shared by the indexer, the library store and the front-ends.
//!
//! All types serialize with camelCase keys so the persisted state file and the
//! HTTP payloads keep the same shape:
//!
//! ```json
//! {
//!   "documents": [{ "id": "…", "title": "Hello", "fileName": "a.md",
//!                   "relativePath": "a.md", "folderPath": "", "size": 12 }],
//!   "readingRecords": { "…": { "reviewCount": 1,
//!                              "lastReviewed": "2024-01-01T00:00:00Z",
//!                              "nextReviewDate": "2024-01-02T00:00:00Z" } },
//!   "folderStructure": { "sub": {} }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label shown to users for the empty folder path.
pub const ROOT_FOLDER_LABEL: &str = "root";

/// A Markdown file discovered by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Hex digest of `relative_path`
    pub id: String,
    pub title: String,
    pub file_name: String,
    /// Path below the scan root, always `/`-separated
    pub relative_path: String,
    /// Directory part of `relative_path`; empty for files at the root
    pub folder_path: String,
    /// File size in bytes at scan time
    pub size: u64,
}

impl Document {
    pub fn is_at_root(&self) -> bool {
        self.folder_path.is_empty()
    }

    /// Folder path as presented to users ("root" for top-level documents).
    pub fn folder_label(&self) -> &str {
        if self.is_at_root() {
            ROOT_FOLDER_LABEL
        } else {
            &self.folder_path
        }
    }
}

/// Nested folder map. Leaves are empty maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderNode {
    children: BTreeMap<String, FolderNode>,
}

impl FolderNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every segment of a `/`-separated folder path, creating missing
    /// intermediate nodes. Empty segments are ignored, so `""` is a no-op.
    pub fn insert_path(&mut self, folder_path: &str) {
        let mut level = self;
        for segment in folder_path.split('/').filter(|s| !s.is_empty()) {
            level = level.children.entry(segment.to_string()).or_default();
        }
    }

    /// Look up the node for a `/`-separated folder path. `""` returns `self`.
    pub fn get(&self, folder_path: &str) -> Option<&FolderNode> {
        let mut level = self;
        for segment in folder_path.split('/').filter(|s| !s.is_empty()) {
            level = level.children.get(segment)?;
        }
        Some(level)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of folders in this subtree, excluding `self`.
    pub fn folder_count(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.folder_count())
            .sum()
    }
}

/// Spaced-repetition state of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub review_count: u32,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review_date: Option<DateTime<Utc>>,
}

impl ReviewRecord {
    /// Never reviewed, or the next review date has arrived.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review_date {
            None => true,
            Some(next) => next <= now,
        }
    }
}

/// A catalog entry decorated with its review state at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedDocument {
    #[serde(flatten)]
    pub document: Document,
    pub review_count: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review_date: Option<DateTime<Utc>>,
    pub due_for_review: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn folder_tree_serializes_as_nested_maps() {
        let mut tree = FolderNode::new();
        tree.insert_path("notes/rust");
        tree.insert_path("notes/go");
        tree.insert_path("sub");
        tree.insert_path("");

        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"notes": {"go": {}, "rust": {}}, "sub": {}})
        );
        assert_eq!(tree.folder_count(), 4);
        assert!(tree.get("notes/rust").unwrap().is_empty());
        assert!(tree.get("notes/python").is_none());
    }

    #[test]
    fn folder_tree_round_trips_nested_layout() {
        let raw = json!({"a": {"b": {"c": {}}}});
        let tree: FolderNode = serde_json::from_value(raw.clone()).unwrap();
        assert!(tree.get("a/b/c").is_some());
        assert_eq!(serde_json::to_value(&tree).unwrap(), raw);
    }

    #[test]
    fn review_record_due_boundaries() {
        let never = ReviewRecord::default();
        assert!(never.is_due(at(1)));

        let record = ReviewRecord {
            review_count: 1,
            last_reviewed: Some(at(1)),
            next_review_date: Some(at(2)),
        };
        assert!(!record.is_due(at(1)));
        assert!(record.is_due(at(2)));
        assert!(record.is_due(at(3)));
    }

    #[test]
    fn review_record_reads_null_timestamps() {
        let record: ReviewRecord = serde_json::from_value(json!({
            "reviewCount": 0,
            "lastReviewed": null,
            "nextReviewDate": null
        }))
        .unwrap();
        assert_eq!(record, ReviewRecord::default());

        let sparse: ReviewRecord = serde_json::from_value(json!({"reviewCount": 2})).unwrap();
        assert_eq!(sparse.review_count, 2);
        assert_eq!(sparse.next_review_date, None);
    }

    #[test]
    fn reviewed_document_flattens_fields() {
        let doc = ReviewedDocument {
            document: Document {
                id: "abc".into(),
                title: "Hello".into(),
                file_name: "a.md".into(),
                relative_path: "a.md".into(),
                folder_path: String::new(),
                size: 7,
            },
            review_count: 0,
            last_reviewed: None,
            next_review_date: None,
            due_for_review: true,
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["fileName"], json!("a.md"));
        assert_eq!(value["dueForReview"], json!(true));
        assert_eq!(value["nextReviewDate"], json!(null));
        assert_eq!(doc.document.folder_label(), ROOT_FOLDER_LABEL);
    }
}
