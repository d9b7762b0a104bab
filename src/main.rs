//! Sitesmith CLI entry point.
//!
//! Provides `generate`, `list`, `show`, `export`, and `delete` subcommands
//! over the local idea store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use sitesmith::config::{load_default_config, runtime_paths};
use sitesmith::credentials::load_default_credentials;
use sitesmith::export::{export_file_name, render_landing_page};
use sitesmith::generation::SiteGenerator;
use sitesmith::service::WebsiteIdeaService;
use sitesmith::store::{IdeaStore, WebsiteIdea};

/// Sitesmith: generate landing pages from one-line ideas.
#[derive(Parser)]
#[command(name = "sitesmith", version, about)]
struct Cli {
    /// Also write JSON logs to `~/.sitesmith/logs/`.
    #[arg(long, global = true)]
    log_to_file: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Generate and store a landing page for an idea.
    Generate {
        /// The website idea (10–200 characters).
        idea: String,
        /// Owner identifier.
        #[arg(long)]
        user: Option<String>,
        /// Print the stored record as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List stored ideas, newest first.
    List {
        /// Print records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show one stored idea.
    Show {
        /// Idea id.
        id: String,
        /// Print the record as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Write an idea's landing page to a standalone HTML file.
    Export {
        /// Idea id.
        id: String,
        /// Output path. Defaults to a name derived from the idea.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete a stored idea.
    Delete {
        /// Idea id.
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = runtime_paths()?;
    let _logging_guard = if cli.log_to_file {
        Some(sitesmith::logging::init_production(&paths.logs_dir)?)
    } else {
        sitesmith::logging::init_cli();
        None
    };

    let config = load_default_config().context("failed to load configuration")?;
    let credentials = load_default_credentials()
        .with_context(|| format!("failed to load {}", paths.env_file.display()))?;

    let database = config.database_path(&paths);
    let store = IdeaStore::open(&database)
        .await
        .with_context(|| format!("failed to open {}", database.display()))?;
    let generator = SiteGenerator::from_config(&config.inference, &credentials)?;
    debug!(?generator, "generator ready");
    let service = WebsiteIdeaService::new(generator, store);

    match cli.command {
        Command::Generate { idea, user, json } => handle_generate(&service, &idea, user, json).await,
        Command::List { json } => handle_list(&service, json).await,
        Command::Show { id, json } => handle_show(&service, &id, json).await,
        Command::Export { id, out } => handle_export(&service, &id, out).await,
        Command::Delete { id } => {
            service.delete(&id).await?;
            println!("deleted {id}");
            Ok(())
        }
    }
}

async fn handle_generate(
    service: &WebsiteIdeaService,
    idea: &str,
    user: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let created = service.create(idea, user).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&created.record)?);
        return Ok(());
    }
    print_summary(&created.record);
    if let Some(reason) = created.fallback {
        println!("note: fallback page used ({reason})");
    }
    Ok(())
}

async fn handle_list(service: &WebsiteIdeaService, json: bool) -> anyhow::Result<()> {
    let ideas = service.list().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ideas)?);
        return Ok(());
    }
    if ideas.is_empty() {
        println!("no website ideas yet");
    }
    for idea in &ideas {
        println!(
            "{}  {}  {}",
            idea.id,
            idea.created_at.format("%Y-%m-%d %H:%M"),
            idea.idea
        );
    }
    Ok(())
}

async fn handle_show(service: &WebsiteIdeaService, id: &str, json: bool) -> anyhow::Result<()> {
    let idea = service.get(id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&idea)?);
    } else {
        print_summary(&idea);
    }
    Ok(())
}

async fn handle_export(
    service: &WebsiteIdeaService,
    id: &str,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let idea = service.get(id).await?;
    let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(&idea.idea)));
    std::fs::write(&path, render_landing_page(&idea))
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn print_summary(idea: &WebsiteIdea) {
    println!("id:      {}", idea.id);
    println!("idea:    {}", idea.idea);
    println!("user:    {}", idea.user_id);
    println!("status:  {}", idea.status.as_str());
    println!("created: {}", idea.created_at.to_rfc3339());
    for section in &idea.sections {
        println!(
            "  [{}] {}: {} ({} bytes)",
            section.order,
            section.name,
            section.description,
            section.content.len()
        );
    }
}
