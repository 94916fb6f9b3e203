//! Search command implementation.

use crate::StoreArgs;
use anyhow::Result;
use colored::Colorize;
use litevss_core::{Location, VectorStore};

/// Run the search command.
pub async fn run(args: &StoreArgs, query: String, k: usize) -> Result<()> {
    // Check if database exists
    if let Location::File(path) = Location::parse(&args.database) {
        if !path.exists() {
            eprintln!("{} Database not found: {}", "✗".red(), path.display());
            eprintln!("Run 'litevss add' first to store documents.");
            return Ok(());
        }
    }

    println!("{} Searching for: {}", "→".blue(), query.yellow());
    println!();

    let store = super::open_store(args)?;
    let results = VectorStore::similarity_search_with_score(&store, &query, k).await?;

    if results.is_empty() {
        println!("{} No results found.", "→".yellow());
        return Ok(());
    }

    println!("{} Found {} results:", "✓".green(), results.len());
    println!();

    for (i, (doc, score)) in results.iter().enumerate() {
        println!(
            "{} {}",
            format!("[{}]", i + 1).blue(),
            format!("score: {:.4}", score).green()
        );

        if let Some(ref metadata) = doc.metadata {
            println!(
                "    {} {}",
                "→".dimmed(),
                serde_json::to_string(metadata)?.cyan()
            );
        }

        // Text preview (first 5 lines)
        let line_count = doc.page_content.lines().count();
        for line in doc.page_content.lines().take(5) {
            println!("    {}", line.dimmed());
        }
        if line_count > 5 {
            println!("    {} ({} more lines)", "...".dimmed(), line_count - 5);
        }
        println!();
    }

    Ok(())
}
