use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use recall_cli::command::{self, CommandAction, CommandResponse};
use recall_cli::config::{AppConfig, DEFAULT_DB_FILE, DEFAULT_MARKDOWN_DIR, DEFAULT_PORT};
use recall_cli::server;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "recall")]
#[command(about = "Spaced-repetition review of a Markdown library", long_about = None)]
#[command(version)]
struct Cli {
    /// Root directory scanned for Markdown files
    #[arg(long, global = true, env = "RECALL_MARKDOWN_DIR", default_value = DEFAULT_MARKDOWN_DIR)]
    root: PathBuf,

    /// JSON state file holding the catalog and review records
    #[arg(long, global = true, env = "RECALL_DB_FILE", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rescan the Markdown root and rebuild the catalog
    Scan {
        /// Also drop review records of documents that no longer exist
        #[arg(long)]
        prune: bool,
    },

    /// List documents with their review state
    List {
        /// Only documents directly inside this folder ("" for the root)
        #[arg(long)]
        folder: Option<String>,

        /// Only documents due for review now
        #[arg(long)]
        due: bool,
    },

    /// Print the folder tree
    Tree,

    /// Show one document with its Markdown content
    Show { id: String },

    /// Mark a document as reviewed now
    Review { id: String },

    /// Preview the next review date after `count` previous reviews
    Schedule {
        #[arg(allow_negative_numbers = true)]
        count: i64,

        /// Reference time (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Drop review records of documents missing from the catalog
    Prune,

    /// Print the resolved configuration
    Config,

    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "RECALL_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    let config = AppConfig::new(cli.root, cli.db);
    let action = match cli.command {
        Commands::Serve { port } => {
            return match server::serve(config, port).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    log::error!("{err:#}");
                    ExitCode::FAILURE
                }
            };
        }
        Commands::Scan { prune } => CommandAction::Scan { prune },
        Commands::List { folder, due } => CommandAction::List {
            folder,
            due_only: due,
        },
        Commands::Tree => CommandAction::Tree,
        Commands::Show { id } => CommandAction::Show { id },
        Commands::Review { id } => CommandAction::Review { id },
        Commands::Schedule { count, at } => CommandAction::Schedule { count, at },
        Commands::Prune => CommandAction::Prune,
        Commands::Config => CommandAction::ConfigRead,
    };

    let started = Instant::now();
    let response = command::execute(action, config)
        .unwrap_or_else(|err| CommandResponse::from_error(&err, started));

    match print_response(&response) {
        Ok(()) if !response.is_error() => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("Failed to print response: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_response(response: &CommandResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
