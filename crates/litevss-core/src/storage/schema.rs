//! Document table, vector index and synchronization trigger.

use crate::error::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::fmt;

const MAX_IDENTIFIER_LEN: usize = 64;

/// A table name that passed the identifier allow-list.
///
/// Only values of this type are ever interpolated into SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validate a caller-supplied table name.
    ///
    /// Accepts ASCII letters, digits and `_`, not starting with a digit or
    /// with the `sqlite_` prefix SQLite reserves for itself.
    pub fn new(name: &str) -> Result<Self> {
        let reject = |reason| Err(Error::InvalidIdentifier(name.to_string(), reason));

        if name.is_empty() {
            return reject("must not be empty");
        }
        if name.len() > MAX_IDENTIFIER_LEN {
            return reject("longer than 64 bytes");
        }
        if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return reject("only ASCII letters, digits and '_' are allowed");
        }
        if name.as_bytes()[0].is_ascii_digit() {
            return reject("must not start with a digit");
        }
        if name.to_ascii_lowercase().starts_with("sqlite_") {
            return reject("the sqlite_ prefix is reserved");
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the paired `vec0` table.
    pub fn vector_table(&self) -> String {
        format!("vss_{}", self.0)
    }

    /// Name of the trigger mirroring inserts into the vector table.
    pub fn trigger_name(&self) -> String {
        format!("{}_vss_sync", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Create the document table, its vector index and the sync trigger if absent.
///
/// All three statements run in one transaction; on failure nothing is kept.
/// An index created earlier with another width is a
/// [`Error::DimensionMismatch`] against the width it was created with.
pub fn ensure_schema(
    conn: &mut Connection,
    table: &TableName,
    dimensionality: usize,
) -> Result<()> {
    if dimensionality == 0 {
        return Err(Error::Schema(
            "vector index needs a dimensionality of at least 1".to_string(),
        ));
    }

    if let Some(existing) = index_dimensionality(conn, table)? {
        if existing != dimensionality {
            return Err(Error::DimensionMismatch {
                expected: existing,
                actual: dimensionality,
            });
        }
    }

    let vector_table = table.vector_table();
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            text            TEXT,
            metadata        BLOB,
            text_embedding  BLOB
        );

        CREATE VIRTUAL TABLE IF NOT EXISTS {vector_table} USING vec0(
            text_embedding float[{dimensionality}]
        );

        CREATE TRIGGER IF NOT EXISTS {trigger}
        AFTER INSERT ON {table}
        BEGIN
            INSERT INTO {vector_table}(rowid, text_embedding)
            VALUES (new.rowid, new.text_embedding);
        END;
        "#,
        trigger = table.trigger_name(),
    );

    let tx = conn
        .transaction()
        .map_err(|e| Error::Schema(format!("cannot begin schema transaction: {e}")))?;
    tx.execute_batch(&ddl)
        .map_err(|e| Error::Schema(format!("creating schema for {table}: {e}")))?;
    tx.commit()
        .map_err(|e| Error::Schema(format!("committing schema for {table}: {e}")))?;

    tracing::debug!(%table, %vector_table, dimensionality, "schema ready");
    Ok(())
}

/// Width of the table's existing vector index, read from its DDL.
pub fn index_dimensionality(conn: &Connection, table: &TableName) -> Result<Option<usize>> {
    let sql: Option<String> = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE name = ?1",
            params![table.vector_table()],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::StorageRead)?
        .flatten();
    let Some(sql) = sql else {
        return Ok(None);
    };

    let width = sql
        .split_once("float[")
        .and_then(|(_, rest)| rest.split_once(']'))
        .and_then(|(digits, _)| digits.trim().parse().ok())
        .ok_or_else(|| {
            Error::Schema(format!(
                "{} is not a float vector index",
                table.vector_table()
            ))
        })?;
    Ok(Some(width))
}

/// Whether a table, virtual table or trigger with this name exists.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE name = ?1)",
        params![name],
        |row| row.get(0),
    )
    .map_err(Error::StorageRead)
}
