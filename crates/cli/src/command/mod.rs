pub mod domain;
mod services;

pub use domain::{
    classify_error, CommandAction, CommandResponse, CommandStatus, Hint, HintKind, ResponseMeta,
};

use crate::config::AppConfig;
use anyhow::{Context, Result};
use chrono::Utc;
use domain::CommandOutcome;
use recall_store::Library;
use services::{CatalogService, ReviewService};

pub struct CommandHandler {
    config: AppConfig,
}

impl CommandHandler {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, action: CommandAction) -> Result<CommandResponse> {
        let mut outcome = self.route(action)?;

        outcome.meta.markdown_dir = Some(self.config.markdown_dir.display().to_string());
        outcome.meta.db_file = Some(self.config.db_file.display().to_string());
        outcome.meta.duration_ms = outcome
            .meta
            .duration_ms
            .or_else(|| Some(outcome.started.elapsed().as_millis() as u64));

        Ok(CommandResponse {
            status: CommandStatus::Ok,
            message: None,
            hints: outcome.hints,
            data: outcome.data,
            meta: outcome.meta,
        })
    }

    fn route(&self, action: CommandAction) -> Result<CommandOutcome> {
        let now = Utc::now();

        let library = if action.needs_library() {
            Some(self.open_library()?)
        } else {
            None
        };

        match (action, library.as_ref()) {
            (CommandAction::ConfigRead, _) => CommandOutcome::from_value(&self.config),
            (CommandAction::Schedule { count, at }, _) => services::schedule(count, at),
            (CommandAction::Scan { prune }, Some(lib)) => CatalogService::new(lib).scan(prune),
            (CommandAction::List { folder, due_only }, Some(lib)) => {
                CatalogService::new(lib).list(folder, due_only, now)
            }
            (CommandAction::Tree, Some(lib)) => CatalogService::new(lib).tree(),
            (CommandAction::Show { id }, Some(lib)) => CatalogService::new(lib).show(&id, now),
            (CommandAction::Review { id }, Some(lib)) => ReviewService::new(lib).review(&id, now),
            (CommandAction::Prune, Some(lib)) => ReviewService::new(lib).prune(),
            (action, None) => anyhow::bail!("{action:?} requires an open library"),
        }
    }

    fn open_library(&self) -> Result<Library> {
        Library::open(self.config.library_config()).with_context(|| {
            format!(
                "Failed to open library state {}",
                self.config.db_file.display()
            )
        })
    }
}

pub fn execute(action: CommandAction, config: AppConfig) -> Result<CommandResponse> {
    CommandHandler::new(config).execute(action)
}
