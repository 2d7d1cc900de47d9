//! BoxVectorStore -- object-safe dynamic dispatch wrapper for VectorStore.
//!
//! Same blanket-impl pattern as `BoxEmbedder`: an object-safe `Dyn`
//! trait with boxed futures, blanket-implemented for every
//! `VectorStore`, wrapped behind a delegating struct.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use mnemo_types::collection::CollectionName;
use mnemo_types::error::MemoryError;
use mnemo_types::record::{MemoryRecord, SimilarityResult};

use crate::store::VectorStore;

/// Object-safe version of [`VectorStore`] with boxed futures.
pub trait VectorStoreDyn: Send + Sync {
    fn insert_boxed<'a>(
        &'a self,
        collection: &'a CollectionName,
        record: &'a MemoryRecord,
    ) -> Pin<Box<dyn Future<Output = Result<DateTime<Utc>, MemoryError>> + Send + 'a>>;

    fn search_boxed<'a>(
        &'a self,
        collection: &'a CollectionName,
        query_embedding: &'a [f32],
        limit: usize,
        min_similarity: f32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SimilarityResult>, MemoryError>> + Send + 'a>>;

    fn fetch_all_boxed<'a>(
        &'a self,
        collection: &'a CollectionName,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MemoryRecord>, MemoryError>> + Send + 'a>>;

    fn prune_boxed<'a>(
        &'a self,
        collection: &'a CollectionName,
        keep: usize,
    ) -> Pin<Box<dyn Future<Output = Result<u64, MemoryError>> + Send + 'a>>;

    fn backend_dyn(&self) -> &'static str;
}

impl<T: VectorStore> VectorStoreDyn for T {
    fn insert_boxed<'a>(
        &'a self,
        collection: &'a CollectionName,
        record: &'a MemoryRecord,
    ) -> Pin<Box<dyn Future<Output = Result<DateTime<Utc>, MemoryError>> + Send + 'a>> {
        Box::pin(self.insert(collection, record))
    }

    fn search_boxed<'a>(
        &'a self,
        collection: &'a CollectionName,
        query_embedding: &'a [f32],
        limit: usize,
        min_similarity: f32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SimilarityResult>, MemoryError>> + Send + 'a>>
    {
        Box::pin(self.search(collection, query_embedding, limit, min_similarity))
    }

    fn fetch_all_boxed<'a>(
        &'a self,
        collection: &'a CollectionName,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MemoryRecord>, MemoryError>> + Send + 'a>> {
        Box::pin(self.fetch_all(collection))
    }

    fn prune_boxed<'a>(
        &'a self,
        collection: &'a CollectionName,
        keep: usize,
    ) -> Pin<Box<dyn Future<Output = Result<u64, MemoryError>> + Send + 'a>> {
        Box::pin(self.prune(collection, keep))
    }

    fn backend_dyn(&self) -> &'static str {
        self.backend()
    }
}

/// Type-erased vector store for runtime backend selection.
pub struct BoxVectorStore {
    inner: Box<dyn VectorStoreDyn + Send + Sync>,
}

impl BoxVectorStore {
    /// Wrap a concrete `VectorStore` in a type-erased box.
    pub fn new<T: VectorStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }

    /// Persist a record with its embedding. Returns the timestamp the
    /// store assigned.
    pub async fn insert(
        &self,
        collection: &CollectionName,
        record: &MemoryRecord,
    ) -> Result<DateTime<Utc>, MemoryError> {
        self.inner.insert_boxed(collection, record).await
    }

    /// Search for records similar to the query embedding.
    pub async fn search(
        &self,
        collection: &CollectionName,
        query_embedding: &[f32],
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<SimilarityResult>, MemoryError> {
        self.inner
            .search_boxed(collection, query_embedding, limit, min_similarity)
            .await
    }

    /// Fetch every record in a collection, newest first.
    pub async fn fetch_all(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<MemoryRecord>, MemoryError> {
        self.inner.fetch_all_boxed(collection).await
    }

    /// Keep only the `keep` newest records, deleting the rest.
    pub async fn prune(
        &self,
        collection: &CollectionName,
        keep: usize,
    ) -> Result<u64, MemoryError> {
        self.inner.prune_boxed(collection, keep).await
    }

    /// Short backend label for logging.
    pub fn backend(&self) -> &'static str {
        self.inner.backend_dyn()
    }
}
