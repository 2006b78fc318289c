use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    Scan {
        prune: bool,
    },
    List {
        folder: Option<String>,
        due_only: bool,
    },
    Tree,
    Show {
        id: String,
    },
    Review {
        id: String,
    },
    /// Preview of the schedule for `count` previous reviews; touches no state.
    Schedule {
        count: i64,
        at: Option<DateTime<Utc>>,
    },
    Prune,
    ConfigRead,
}

impl CommandAction {
    /// Whether the action needs the persisted library.
    pub fn needs_library(&self) -> bool {
        !matches!(self, Self::Schedule { .. } | Self::ConfigRead)
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }

    pub fn from_error(err: &anyhow::Error, started: Instant) -> Self {
        let message = format!("{err:#}");
        Self {
            status: CommandStatus::Error,
            hints: classify_error(&message),
            message: Some(message),
            data: Value::Null,
            meta: ResponseMeta {
                duration_ms: Some(started.elapsed().as_millis() as u64),
                ..ResponseMeta::default()
            },
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Clone)]
pub struct Hint {
    #[serde(rename = "type")]
    pub kind: HintKind,
    pub text: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    Info,
    Action,
    Warn,
}

#[derive(Debug, Serialize, Default, Clone)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<usize>,
}

pub struct CommandOutcome {
    pub data: Value,
    pub hints: Vec<Hint>,
    pub meta: ResponseMeta,
    pub started: Instant,
}

impl CommandOutcome {
    pub fn from_value<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(value)?,
            hints: Vec::new(),
            meta: ResponseMeta::default(),
            started: Instant::now(),
        })
    }

    pub fn with_hint(mut self, kind: HintKind, text: impl Into<String>) -> Self {
        self.hints.push(Hint {
            kind,
            text: text.into(),
        });
        self
    }
}

pub fn classify_error(message: &str) -> Vec<Hint> {
    let mut hints = Vec::new();

    if message.contains("Document not found") {
        hints.push(Hint {
            kind: HintKind::Action,
            text: "Unknown document id; run `recall scan` and pick an id from `recall list`."
                .to_string(),
        });
    }

    if message.contains("File missing or moved") {
        hints.push(Hint {
            kind: HintKind::Action,
            text: "The file changed on disk since the last scan; run `recall scan` to refresh the catalog."
                .to_string(),
        });
    }

    if message.contains("scan is already in progress") {
        hints.push(Hint {
            kind: HintKind::Info,
            text: "Wait for the running scan to finish, then retry.".to_string(),
        });
    }

    if message.contains("Invalid review count") || message.contains("Invalid input") {
        hints.push(Hint {
            kind: HintKind::Warn,
            text: "Review counts must be >= 0 and folder paths relative to the Markdown root."
                .to_string(),
        });
    }

    if message.contains("State file error") {
        hints.push(Hint {
            kind: HintKind::Action,
            text: "State file is unreadable; fix or remove the file passed via --db / RECALL_DB_FILE."
                .to_string(),
        });
    }

    if message.contains("Filesystem error") {
        hints.push(Hint {
            kind: HintKind::Warn,
            text: "Filesystem access failed; check permissions on the Markdown root.".to_string(),
        });
    }

    hints
}
