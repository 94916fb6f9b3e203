//! Stats command implementation.

use crate::StoreArgs;
use anyhow::Result;
use colored::Colorize;
use litevss_core::storage::connection;
use litevss_core::Location;

/// Run the stats command.
pub async fn run(args: &StoreArgs) -> Result<()> {
    let location = Location::parse(&args.database);

    // Check if database exists
    if let Some(path) = location.path() {
        if !path.exists() {
            eprintln!("{} Database not found: {}", "✗".red(), path.display());
            eprintln!("Run 'litevss add' first to store documents.");
            return Ok(());
        }
    }

    println!("{} Store Statistics", "→".blue());
    println!();

    let store = super::open_store(args)?;
    let document_count = store.count()?;
    let version = {
        let conn = store.connection();
        let guard = conn
            .lock()
            .map_err(|_| anyhow::anyhow!("connection lock poisoned"))?;
        connection::extension_version(&guard)?
    };

    println!("  Database: {}", location);
    println!("  Table: {} (index {})", store.table(), store.table().vector_table());
    println!("  Documents: {}", document_count.to_string().green());
    println!("  Dimensions: {}", store.dimensionality());
    println!("  sqlite-vec: {}", version);

    if let Some(path) = location.path() {
        let file_size = std::fs::metadata(path)?.len();
        let size_mb = file_size as f64 / (1024.0 * 1024.0);
        println!("  Database size: {:.2} MB", size_mb);
    }

    Ok(())
}
