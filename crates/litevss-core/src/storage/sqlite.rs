//! SQLite + sqlite-vec store implementation.

use crate::config::StoreConfig;
use crate::document::{metadata_from_json, metadata_to_json, Document, Metadata, StoredRecord};
use crate::embedding::{probe_dimensionality, vector_from_json, vector_to_json, Embedder};
use crate::error::{Error, Result};
use crate::storage::connection;
use crate::storage::schema::{ensure_schema, TableName};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// A connection that several stores over the same database may share.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Document store backed by a SQLite table and a paired `vec0` index.
pub struct SqliteVss {
    pub(crate) conn: SharedConnection,
    pub(crate) table: TableName,
    pub(crate) dimensionality: usize,
    pub(crate) embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for SqliteVss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteVss")
            .field("table", &self.table)
            .field("dimensionality", &self.dimensionality)
            .finish_non_exhaustive()
    }
}

impl SqliteVss {
    /// Open the configured database and prepare the table.
    pub fn open(config: &StoreConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        config.validate()?;
        let table = TableName::new(&config.table)?;
        let conn = connection::open(&config.location, &config.extension)?;
        Self::init(Arc::new(Mutex::new(conn)), table, embedder)
    }

    /// Build a store on a connection that already has sqlite-vec loaded.
    pub fn with_connection(
        conn: Connection,
        table: &str,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        Self::with_shared_connection(Arc::new(Mutex::new(conn)), table, embedder)
    }

    /// Build a store on a connection shared with other stores.
    pub fn with_shared_connection(
        conn: SharedConnection,
        table: &str,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let table = TableName::new(table)?;
        Self::init(conn, table, embedder)
    }

    /// Open a store and add `texts` to it.
    pub fn from_texts<S: AsRef<str>>(
        config: &StoreConfig,
        embedder: Arc<dyn Embedder>,
        texts: &[S],
        metadatas: Option<&[Metadata]>,
    ) -> Result<Self> {
        let store = Self::open(config, embedder)?;
        store.add_texts(texts, metadatas)?;
        Ok(store)
    }

    fn init(conn: SharedConnection, table: TableName, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let dimensionality = probe_dimensionality(embedder.as_ref())?;
        {
            let mut guard = conn.lock().map_err(|_| Error::LockPoisoned)?;
            ensure_schema(&mut guard, &table, dimensionality)?;
        }
        Ok(Self {
            conn,
            table,
            dimensionality,
            embedder,
        })
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Width of every vector stored in this table.
    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// The underlying connection, for sharing with another store.
    pub fn connection(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    pub(crate) fn check_dimensionality(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensionality {
            return Err(Error::DimensionMismatch {
                expected: self.dimensionality,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Embed and insert `texts`, returning the assigned row ids in order.
    ///
    /// The batch is embedded with a single call and inserted in one
    /// transaction; if anything fails, no row is added.
    pub fn add_texts<S: AsRef<str>>(
        &self,
        texts: &[S],
        metadatas: Option<&[Metadata]>,
    ) -> Result<Vec<i64>> {
        if let Some(metadatas) = metadatas {
            if metadatas.len() != texts.len() {
                return Err(Error::InvalidInput(format!(
                    "{} metadata entries for {} texts",
                    metadatas.len(),
                    texts.len()
                )));
            }
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = texts.iter().map(AsRef::as_ref).collect();
        let embeddings = self.embedder.embed_documents(&texts)?;
        if embeddings.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "embedder returned {} vectors for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        // Serialize everything before touching the database.
        let mut rows = Vec::with_capacity(texts.len());
        for (i, (text, embedding)) in texts.iter().zip(&embeddings).enumerate() {
            self.check_dimensionality(embedding)?;
            let metadata = metadata_to_json(metadatas.map(|m| &m[i]))?;
            rows.push((*text, metadata, vector_to_json(embedding)?));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(Error::StorageWrite)?;
        let mut row_ids = Vec::with_capacity(rows.len());
        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO {}(text, metadata, text_embedding) VALUES (?1, ?2, ?3)",
                    self.table
                ))
                .map_err(Error::StorageWrite)?;
            for (text, metadata, embedding) in &rows {
                let row_id = stmt
                    .insert(params![text, metadata, embedding])
                    .map_err(Error::StorageWrite)?;
                row_ids.push(row_id);
            }
        }
        tx.commit().map_err(Error::StorageWrite)?;

        tracing::debug!(table = %self.table, count = row_ids.len(), "added texts");
        Ok(row_ids)
    }

    /// Number of documents in the table.
    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
                row.get(0)
            })
            .map_err(Error::StorageRead)?;
        Ok(count as usize)
    }

    /// Fetch a stored row, including its embedding.
    pub fn get(&self, row_id: i64) -> Result<Option<StoredRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT text, metadata, text_embedding FROM {} WHERE rowid = ?1",
                    self.table
                ),
                params![row_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(Error::StorageRead)?;

        row.map(|(text, metadata, embedding)| {
            Ok(StoredRecord {
                row_id,
                document: Document {
                    page_content: text,
                    metadata: metadata_from_json(metadata.as_deref())?,
                },
                embedding: vector_from_json(&embedding)?,
            })
        })
        .transpose()
    }
}
