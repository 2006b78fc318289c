use serde::{Deserialize, Serialize};

/// Counters collected during one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub documents: usize,
    pub folders: usize,
    /// Entries dropped because they could not be read
    pub skipped: usize,
    pub total_bytes: u64,
    pub duration_ms: u64,
}
