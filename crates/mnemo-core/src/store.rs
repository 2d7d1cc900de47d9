//! Vector store trait.
//!
//! Implementations (Postgres/pgvector remote store, SQLite local
//! fallback) live in mnemo-infra.

use chrono::{DateTime, Utc};

use mnemo_types::collection::CollectionName;
use mnemo_types::error::MemoryError;
use mnemo_types::record::{MemoryRecord, SimilarityResult};

/// Trait for vector-indexed record storage with similarity search.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// `min_similarity` is part of the search signature because the two
/// backends apply it at different points: the remote store filters the
/// native top-k after ranking, the local store filters before
/// truncating to `limit`.
pub trait VectorStore: Send + Sync {
    /// Persist a record with its embedding.
    ///
    /// Returns the timestamp the store assigned to the record; the
    /// remote store stamps rows server-side so recency ordering does
    /// not depend on caller clocks.
    fn insert(
        &self,
        collection: &CollectionName,
        record: &MemoryRecord,
    ) -> impl std::future::Future<Output = Result<DateTime<Utc>, MemoryError>> + Send;

    /// Search for records similar to the query embedding.
    ///
    /// Returns at most `limit` results, best first, each scoring at
    /// least `min_similarity`.
    fn search(
        &self,
        collection: &CollectionName,
        query_embedding: &[f32],
        limit: usize,
        min_similarity: f32,
    ) -> impl std::future::Future<Output = Result<Vec<SimilarityResult>, MemoryError>> + Send;

    /// Fetch every record in a collection, newest first.
    fn fetch_all(
        &self,
        collection: &CollectionName,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryRecord>, MemoryError>> + Send;

    /// Keep only the `keep` newest records, deleting the rest.
    /// Returns the number of records removed.
    fn prune(
        &self,
        collection: &CollectionName,
        keep: usize,
    ) -> impl std::future::Future<Output = Result<u64, MemoryError>> + Send;

    /// Short backend label for logging (e.g., "sqlite", "pgvector").
    fn backend(&self) -> &'static str;
}
