mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mnema::config::MnemaConfig;
use mnema::memory::types::{ConnectionKind, MemoryKind};

#[derive(Parser)]
#[command(
    name = "mnema",
    version,
    about = "Persistent semantic memory and knowledge graph for AI chat clients"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a single memory
    Add {
        content: String,
        #[arg(long, default_value = "fact")]
        kind: MemoryKind,
        /// Provenance note (defaults to "manual")
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        confidence: Option<f64>,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long)]
        workspace: Option<String>,
        #[arg(long)]
        thread: Option<String>,
    },
    /// Search memories by embedding similarity
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        min_similarity: Option<f32>,
    },
    /// Show memories related to an id, ranked by combined strength
    Related { id: String },
    /// Connect two memories with a typed, weighted edge
    Connect {
        source: String,
        target: String,
        #[arg(long, default_value = "related_to")]
        kind: ConnectionKind,
        #[arg(long, default_value_t = 0.5)]
        strength: f64,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove the directed connection source -> target
    Disconnect { source: String, target: String },
    /// Replace a memory's tags
    Tag { id: String, tags: Vec<String> },
    /// Permanently remove a memory and its embedding
    Forget { id: String },
    /// Extract memories from conversation text (file or stdin)
    Extract {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Display memory statistics
    Stats,
    /// Export all memories as JSON to stdout
    Export,
    /// Import memories from a JSON export
    Import { file: PathBuf },
    /// Regenerate all embeddings with the current model
    ReEmbed,
    /// Delete all memories
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load config (for log level)
    let config = MnemaConfig::load()?;

    // Initialize tracing with the configured log level, writing to stderr so
    // stdout stays clean for command output (export in particular).
    let filter = EnvFilter::try_new(&config.app.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Add {
            content,
            kind,
            source,
            confidence,
            tags,
            workspace,
            thread,
        } => {
            cli::add::add(
                &config,
                &content,
                kind,
                source.as_deref(),
                confidence,
                tags,
                workspace,
                thread,
            )
            .await?;
        }
        Command::Search {
            query,
            limit,
            min_similarity,
        } => {
            cli::search::search(&config, &query, limit, min_similarity).await?;
        }
        Command::Related { id } => {
            cli::related::related(&config, &id).await?;
        }
        Command::Connect {
            source,
            target,
            kind,
            strength,
            description,
        } => {
            cli::connect::connect(&config, &source, &target, kind, strength, description)?;
        }
        Command::Disconnect { source, target } => {
            cli::connect::disconnect(&config, &source, &target)?;
        }
        Command::Tag { id, tags } => {
            cli::tag::tag(&config, &id, tags).await?;
        }
        Command::Forget { id } => {
            cli::forget::forget(&config, &id).await?;
        }
        Command::Extract { file } => {
            cli::extract::extract(&config, file.as_deref()).await?;
        }
        Command::Stats => {
            cli::stats::stats(&config)?;
        }
        Command::Export => {
            cli::export::export(&config)?;
        }
        Command::Import { file } => {
            cli::import::import(&config, &file).await?;
        }
        Command::ReEmbed => {
            cli::re_embed::re_embed(&config).await?;
        }
        Command::Reset => {
            cli::reset::reset(&config)?;
        }
    }

    Ok(())
}
