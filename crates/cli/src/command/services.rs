use crate::command::domain::{CommandOutcome, HintKind};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use recall_protocol::ReviewedDocument;
use recall_scheduler::{interval_days, try_next_review_date};
use recall_store::{Library, ScanStats};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub count: usize,
    pub pruned_records: usize,
    pub stats: ScanStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub count: usize,
    /// Listed documents per folder, the root shown as "root"
    pub by_folder: BTreeMap<String, usize>,
    pub documents: Vec<ReviewedDocument>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub review_count: i64,
    pub interval_days: i64,
    pub from: DateTime<Utc>,
    pub next_review_date: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneResponse {
    pub removed: usize,
}

pub struct CatalogService<'a> {
    library: &'a Library,
}

impl<'a> CatalogService<'a> {
    pub fn new(library: &'a Library) -> Self {
        Self { library }
    }

    pub fn scan(&self, prune: bool) -> Result<CommandOutcome> {
        let report = if prune {
            self.library.scan_and_prune()
        } else {
            self.library.scan()
        }
        .with_context(|| format!("scan of {} failed", self.library.root().display()))?;

        let count = report.documents.len();
        let mut outcome = CommandOutcome::from_value(ScanResponse {
            count,
            pruned_records: report.pruned_records,
            stats: report.stats.clone(),
        })?;
        outcome.meta.documents = Some(count);
        if report.stats.skipped > 0 {
            outcome = outcome.with_hint(
                HintKind::Warn,
                format!(
                    "{} entries could not be read and were skipped; see the log for details.",
                    report.stats.skipped
                ),
            );
        }
        Ok(outcome)
    }

    pub fn list(
        &self,
        folder: Option<String>,
        due_only: bool,
        now: DateTime<Utc>,
    ) -> Result<CommandOutcome> {
        let mut documents = match (&folder, due_only) {
            (Some(folder), _) => self.library.list_documents_in_folder(folder, now)?,
            (None, true) => self.library.list_due_documents(now),
            (None, false) => self.library.list_documents(now),
        };
        if due_only {
            documents.retain(|doc| doc.due_for_review);
        }

        let mut by_folder = BTreeMap::new();
        for doc in &documents {
            *by_folder
                .entry(doc.document.folder_label().to_string())
                .or_insert(0) += 1;
        }

        let mut outcome = CommandOutcome::from_value(ListResponse {
            folder,
            count: documents.len(),
            by_folder,
            documents,
        })?;
        outcome.meta.documents = Some(self.library.document_count());
        if outcome.meta.documents == Some(0) {
            outcome = outcome.with_hint(
                HintKind::Action,
                "Catalog is empty; run `recall scan` after adding Markdown files.",
            );
        }
        Ok(outcome)
    }

    pub fn tree(&self) -> Result<CommandOutcome> {
        CommandOutcome::from_value(self.library.folder_tree())
    }

    pub fn show(&self, id: &str, now: DateTime<Utc>) -> Result<CommandOutcome> {
        CommandOutcome::from_value(self.library.document_with_content(id, now)?)
    }
}

pub struct ReviewService<'a> {
    library: &'a Library,
}

impl<'a> ReviewService<'a> {
    pub fn new(library: &'a Library) -> Self {
        Self { library }
    }

    pub fn review(&self, id: &str, now: DateTime<Utc>) -> Result<CommandOutcome> {
        CommandOutcome::from_value(self.library.mark_reviewed(id, now)?)
    }

    pub fn prune(&self) -> Result<CommandOutcome> {
        let removed = self.library.prune_orphaned_records()?;
        CommandOutcome::from_value(PruneResponse { removed })
    }
}

pub fn schedule(count: i64, at: Option<DateTime<Utc>>) -> Result<CommandOutcome> {
    let from = at.unwrap_or_else(Utc::now);
    let next_review_date = try_next_review_date(count, from)?;
    CommandOutcome::from_value(ScheduleResponse {
        review_count: count,
        interval_days: interval_days(u32::try_from(count).unwrap_or(u32::MAX)),
        from,
        next_review_date,
    })
}
