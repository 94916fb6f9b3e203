//! Add command implementation.

use crate::StoreArgs;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use litevss_core::{Metadata, VectorStore};
use std::path::PathBuf;

/// Run the add command.
pub async fn run(
    args: &StoreArgs,
    mut texts: Vec<String>,
    file: Option<PathBuf>,
    metadata: Option<String>,
) -> Result<()> {
    if let Some(file) = file {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        texts.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    if texts.is_empty() {
        bail!("nothing to add: pass texts or --file");
    }

    let metadatas = match metadata {
        Some(json) => {
            let metadata: Metadata =
                serde_json::from_str(&json).context("--metadata must be a JSON object")?;
            Some(vec![metadata; texts.len()])
        }
        None => None,
    };

    println!("{} Loading embedding model...", "→".blue());
    let store = super::open_store(args)?;

    let ids = VectorStore::add_texts(&store, &texts, metadatas.as_deref()).await?;

    println!("{} Added {} documents", "✓".green(), ids.len());
    if let (Some(first), Some(last)) = (ids.first(), ids.last()) {
        println!("  Row ids: {}..={}", first, last);
    }
    println!("  Table: {}", store.table());
    println!("  Database: {}", args.database);

    Ok(())
}
