use crate::error::{IndexerError, Result};
use std::path::{Component, Path};

/// Convert every `\` to `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Path of `path` below `root`, `/`-separated regardless of platform.
pub fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(root).map_err(|_| {
        IndexerError::InvalidPath(format!(
            "{} is not below {}",
            path.display(),
            root.display()
        ))
    })?;

    let joined = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    Ok(normalize_separators(&joined))
}

/// Stable document id: hex MD5 of the normalized relative path.
pub fn document_id(relative_path: &str) -> String {
    let normalized = normalize_separators(relative_path);
    format!("{:x}", md5::compute(normalized.as_bytes()))
}

/// Directory portion of a relative path; `""` for files at the root.
pub fn folder_path_of(relative_path: &str) -> String {
    let normalized = normalize_separators(relative_path);
    match normalized.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    }
}

/// Normalize a user-supplied folder path for exact matching against
/// `Document::folder_path`.
///
/// `""` and `"."` map to the root; empty and `.` segments are dropped.
/// Segment names are kept byte for byte, surrounding spaces included.
/// Absolute paths and parent references are rejected.
pub fn normalize_folder_query(raw: &str) -> Result<String> {
    let value = normalize_separators(raw);

    if value.starts_with('/') || has_drive_prefix(&value) {
        return Err(IndexerError::InvalidPath(format!(
            "folder path must be relative: {raw:?}"
        )));
    }

    let mut segments = Vec::new();
    for segment in value.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(IndexerError::InvalidPath(format!(
                    "folder path must not contain '..': {raw:?}"
                )))
            }
            other => segments.push(other),
        }
    }
    Ok(segments.join("/"))
}

fn has_drive_prefix(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
