//! Store configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Marker accepted by [`Location::parse`] for an in-memory database.
pub const MEMORY_MARKER: &str = ":memory:";

/// Table used when the caller does not pick one.
pub const DEFAULT_TABLE: &str = "documents";

/// Where the backing SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Ephemeral database, gone when the connection closes
    Memory,
    /// Database file, created if missing
    File(PathBuf),
}

impl Location {
    /// Parse a location string; `:memory:` selects an in-memory database.
    pub fn parse(s: &str) -> Self {
        if s == MEMORY_MARKER {
            Location::Memory
        } else {
            Location::File(PathBuf::from(s))
        }
    }

    /// Path of the database file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Location::Memory => None,
            Location::File(path) => Some(path),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Memory => f.write_str(MEMORY_MARKER),
            Location::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// How the sqlite-vec extension gets into the connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExtensionSource {
    /// Statically linked `sqlite-vec`, registered as an auto-extension
    #[default]
    Bundled,
    /// Shared library loaded at runtime
    Dynamic {
        path: PathBuf,
        entry_point: Option<String>,
    },
}

/// Configuration for opening a [`SqliteVss`](crate::storage::SqliteVss).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub location: Location,
    pub table: String,
    #[serde(default)]
    pub extension: ExtensionSource,
}

impl StoreConfig {
    /// File-backed store using the default table.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            table: DEFAULT_TABLE.to_string(),
            extension: ExtensionSource::default(),
        }
    }

    /// In-memory store using the default table.
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            table: DEFAULT_TABLE.to_string(),
            extension: ExtensionSource::default(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_extension(mut self, extension: ExtensionSource) -> Self {
        self.extension = extension;
        self
    }

    /// Check the parts that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        if let Location::File(path) = &self.location {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("database path is empty".to_string()));
            }
        }
        if let ExtensionSource::Dynamic { path, .. } = &self.extension {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("extension path is empty".to_string()));
            }
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(Location::parse(":memory:"), Location::Memory);
        assert_eq!(
            Location::parse("data/vss.db"),
            Location::File(PathBuf::from("data/vss.db"))
        );
        assert_eq!(Location::parse(":memory:").to_string(), ":memory:");
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::new("vss.db").with_table("notes");
        assert_eq!(config.table, "notes");
        assert_eq!(config.extension, ExtensionSource::Bundled);
        assert_eq!(config.location.path(), Some(Path::new("vss.db")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        assert!(matches!(StoreConfig::new("").validate(), Err(Error::Config(_))));

        let config = StoreConfig::in_memory().with_extension(ExtensionSource::Dynamic {
            path: PathBuf::new(),
            entry_point: None,
        });
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: StoreConfig = serde_json::from_value(serde_json::json!({
            "location": { "file": "/tmp/vss.db" },
            "table": "notes"
        }))
        .unwrap();
        assert_eq!(config.location, Location::File(PathBuf::from("/tmp/vss.db")));
        assert_eq!(config.extension, ExtensionSource::Bundled);
    }
}
