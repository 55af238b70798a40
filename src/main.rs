//! taskwise CLI: next-task suggestions and Document AI processor lookup.
//!
//! Usage:
//!   taskwise suggest --input request.json
//!   echo '{"tasks":[{"title":"Pay rent"}]}' | taskwise suggest
//!   taskwise processors list --project my-gcp-project
//!   taskwise processors get invoice

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use taskwise::config::{Config, RuntimeConfig};
use taskwise::processors::{ProcessorKind, REGISTRY};
use taskwise::suggestions::{SuggestionGateway, SuggestionRequest};

#[derive(Parser)]
#[command(name = "taskwise")]
#[command(about = "Task suggestions and document processor lookup", long_about = None)]
struct Cli {
    /// Print single-line JSON instead of pretty output
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the AI engine which task to do next
    Suggest {
        /// Request JSON file; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Extra context appended to the request
        #[arg(short, long)]
        context: Option<String>,
    },
    /// Inspect the Document AI processor registry
    Processors {
        #[command(subcommand)]
        command: ProcessorCommands,
    },
}

#[derive(Subcommand)]
enum ProcessorCommands {
    /// List every processor
    List {
        /// GCP project used to build full resource names
        #[arg(long)]
        project: Option<String>,
    },
    /// Show one processor by key (ocr, layout, form, invoice, expense, bankStatement)
    Get {
        key: String,
        #[arg(long)]
        project: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Subscriber first so config warnings are visible; RUST_LOG may come from .env
    Config::load_env_file();
    let runtime = RuntimeConfig::load_from_env();
    tracing_subscriber::fmt()
        .with_env_filter(runtime.log_level.as_str())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    match cli.command {
        Commands::Suggest { input, context } => {
            suggest(&config, input, context, cli.compact).await
        }
        Commands::Processors { command } => processors(&config, command, cli.compact),
    }
}

async fn suggest(
    config: &Config,
    input: Option<PathBuf>,
    context: Option<String>,
    compact: bool,
) -> Result<()> {
    let raw = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };

    let mut request: SuggestionRequest = if raw.trim().is_empty() {
        SuggestionRequest::default()
    } else {
        serde_json::from_str(&raw).context("Request is not valid suggestion JSON")?
    };
    if context.is_some() {
        request.context = context;
    }

    let gateway = SuggestionGateway::from_config(config);
    info!(
        "Requesting suggestion via {} for {} task(s)",
        gateway.engine_name(),
        request.tasks.len()
    );

    let response = gateway.suggest_next_task(&request).await;
    print_json(&response, compact)
}

fn processors(config: &Config, command: ProcessorCommands, compact: bool) -> Result<()> {
    let default_project = config.document_ai.project_id.clone();
    match command {
        ProcessorCommands::List { project } => {
            let project = project.or(default_project);
            let entries: Vec<_> = ProcessorKind::ALL
                .into_iter()
                .map(|kind| REGISTRY.describe(kind, project.as_deref()))
                .collect();
            print_json(&entries, compact)
        }
        ProcessorCommands::Get { key, project } => {
            let project = project.or(default_project);
            let kind: ProcessorKind = key.parse()?;
            print_json(&REGISTRY.describe(kind, project.as_deref()), compact)
        }
    }
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", out);
    Ok(())
}
