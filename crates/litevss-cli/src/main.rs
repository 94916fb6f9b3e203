//! litevss CLI
//!
//! Command-line interface for the litevss vector store.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "litevss")]
#[command(author, version, about = "Embedded vector similarity store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    store: StoreArgs,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by every command.
#[derive(Args, Clone)]
pub struct StoreArgs {
    /// Database path, or ":memory:"
    #[arg(short, long, global = true, env = "LITEVSS_DB", default_value = ".litevss/vss.db")]
    pub database: String,

    /// Document table
    #[arg(short, long, global = true, env = "LITEVSS_TABLE", default_value = "documents")]
    pub table: String,

    /// Load sqlite-vec from this shared library instead of the bundled copy
    #[arg(long, global = true)]
    pub extension: Option<PathBuf>,

    /// Embedding model
    #[arg(short, long, global = true, default_value = litevss_embeddings::DEFAULT_MODEL)]
    pub model: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed and store documents
    Add {
        /// Texts to store
        texts: Vec<String>,

        /// Read one document per line from this file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// JSON object attached to every added document
        #[arg(long)]
        metadata: Option<String>,
    },

    /// Search for similar documents
    Search {
        /// Search query
        query: String,

        /// Number of results
        #[arg(short, default_value = "4")]
        k: usize,
    },

    /// Show store statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "litevss=debug,litevss_core=debug,litevss_embeddings=debug"
    } else {
        "litevss=info,litevss_core=info,litevss_embeddings=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Add {
            texts,
            file,
            metadata,
        } => {
            commands::add::run(&cli.store, texts, file, metadata).await?;
        }
        Commands::Search { query, k } => {
            commands::search::run(&cli.store, query, k).await?;
        }
        Commands::Stats => {
            commands::stats::run(&cli.store).await?;
        }
    }

    Ok(())
}
