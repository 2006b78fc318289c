use chrono::{DateTime, Utc};
use recall_protocol::{Document, ReviewRecord, ReviewedDocument};
use std::collections::BTreeMap;

/// Decorate a catalog entry with its review state as of `now`.
///
/// Documents never reviewed get a default record, which is always due.
pub fn with_review(
    document: &Document,
    record: Option<&ReviewRecord>,
    now: DateTime<Utc>,
) -> ReviewedDocument {
    let record = record.cloned().unwrap_or_default();
    ReviewedDocument {
        document: document.clone(),
        due_for_review: record.is_due(now),
        review_count: record.review_count,
        last_reviewed: record.last_reviewed,
        next_review_date: record.next_review_date,
    }
}

pub fn join_all<'a>(
    documents: impl IntoIterator<Item = &'a Document>,
    records: &BTreeMap<String, ReviewRecord>,
    now: DateTime<Utc>,
) -> Vec<ReviewedDocument> {
    documents
        .into_iter()
        .map(|doc| with_review(doc, records.get(&doc.id), now))
        .collect()
}
