//! Storage layer.
//!
//! A document table in SQLite paired with a sqlite-vec `vec0` index. Inserts
//! reach the index through a trigger; searches run k-NN on the index and join
//! back to the document table.

pub mod connection;
pub mod schema;
mod search;
mod sqlite;
mod traits;

pub use schema::{ensure_schema, index_dimensionality, table_exists, TableName};
pub use search::{euclidean_score, MAX_KNN_K};
pub use sqlite::{SharedConnection, SqliteVss};
pub use traits::VectorStore;
