pub mod add;
pub mod search;
pub mod stats;

use crate::StoreArgs;
use anyhow::{Context, Result};
use litevss_core::{ExtensionSource, Location, SqliteVss, StoreConfig};
use litevss_embeddings::EmbeddingGenerator;
use std::sync::Arc;

/// Build the store configuration from command-line options.
pub fn store_config(args: &StoreArgs) -> StoreConfig {
    let extension = match &args.extension {
        Some(path) => ExtensionSource::Dynamic {
            path: path.clone(),
            entry_point: None,
        },
        None => ExtensionSource::Bundled,
    };
    StoreConfig {
        location: Location::parse(&args.database),
        table: args.table.clone(),
        extension,
    }
}

/// Load the embedding model and open the store.
pub fn open_store(args: &StoreArgs) -> Result<SqliteVss> {
    let config = store_config(args);
    if let Some(path) = config.location.path() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    tracing::debug!(model = %args.model, "loading embedding model");
    let embedder = EmbeddingGenerator::with_model(&args.model)?;
    let store = SqliteVss::open(&config, Arc::new(embedder))
        .with_context(|| format!("opening {} (table {})", config.location, config.table))?;
    Ok(store)
}
