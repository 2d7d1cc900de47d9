//! MemoryGateway -- the single entry point for storing and searching
//! memories.
//!
//! The gateway is wired to exactly one embedder and one store at
//! construction time. There is no runtime failover: an offline gateway
//! never reaches the network, and a live gateway surfaces dependency
//! failures instead of silently degrading to local data.

use serde_json::json;
use tracing::{debug, warn};

use mnemo_types::collection::CollectionName;
use mnemo_types::config::MemoryConfig;
use mnemo_types::error::MemoryError;
use mnemo_types::record::{MemoryRecord, Metadata, SimilarityResult, StoreReceipt};

use crate::{BoxEmbedder, BoxVectorStore};

/// Orchestrates embedding and storage behind one coherent API.
pub struct MemoryGateway {
    embedder: BoxEmbedder,
    store: BoxVectorStore,
    config: MemoryConfig,
}

impl MemoryGateway {
    pub fn new(embedder: BoxEmbedder, store: BoxVectorStore, config: MemoryConfig) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    /// The collection used when the caller names none.
    pub fn default_collection(&self) -> &CollectionName {
        &self.config.collection
    }

    /// Embed a single text. Rejects empty input before touching the
    /// provider.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        if text.trim().is_empty() {
            return Err(MemoryError::InvalidInput("text is empty".to_string()));
        }
        self.embed_one(text).await
    }

    /// Embed and persist a memory, returning a receipt.
    pub async fn store(
        &self,
        content: &str,
        metadata: Metadata,
        collection: Option<&CollectionName>,
    ) -> Result<StoreReceipt, MemoryError> {
        if content.trim().is_empty() {
            return Err(MemoryError::InvalidInput("content is empty".to_string()));
        }
        let collection = collection.unwrap_or(&self.config.collection);
        let embedding = self.embed_one(content).await?;
        let record = MemoryRecord::new(content, embedding, metadata);
        let created_at = self.store.insert(collection, &record).await?;
        debug!(
            backend = self.store.backend(),
            %collection,
            id = %record.id,
            "stored memory"
        );
        Ok(StoreReceipt {
            id: record.id,
            collection: collection.to_string(),
            created_at,
        })
    }

    /// Search for memories similar to `query`.
    ///
    /// Returns at most `top_k` results with similarity of at least
    /// `min_similarity`, best first.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        min_similarity: f32,
        collection: Option<&CollectionName>,
    ) -> Result<Vec<SimilarityResult>, MemoryError> {
        if query.trim().is_empty() {
            return Err(MemoryError::InvalidInput("query is empty".to_string()));
        }
        if top_k == 0 {
            return Err(MemoryError::InvalidInput(
                "top_k must be at least 1".to_string(),
            ));
        }
        if !(-1.0..=1.0).contains(&min_similarity) {
            return Err(MemoryError::InvalidInput(format!(
                "min_similarity {min_similarity} is outside [-1.0, 1.0]"
            )));
        }

        let collection = collection.unwrap_or(&self.config.collection);
        let query_embedding = self.embed_one(query).await?;
        let results = self
            .store
            .search(collection, &query_embedding, top_k, min_similarity)
            .await?;
        debug!(
            backend = self.store.backend(),
            %collection,
            top_k,
            min_similarity,
            result_count = results.len(),
            "search complete"
        );

        if self.config.journal_queries {
            self.journal_query(collection, query, query_embedding, top_k, min_similarity, &results)
                .await;
        }

        Ok(results)
    }

    /// Fetch every record in a collection, newest first.
    pub async fn records(
        &self,
        collection: Option<&CollectionName>,
    ) -> Result<Vec<MemoryRecord>, MemoryError> {
        let collection = collection.unwrap_or(&self.config.collection);
        self.store.fetch_all(collection).await
    }

    /// Keep only the `keep` newest records, deleting the rest.
    pub async fn prune(
        &self,
        keep: usize,
        collection: Option<&CollectionName>,
    ) -> Result<u64, MemoryError> {
        let collection = collection.unwrap_or(&self.config.collection);
        let removed = self.store.prune(collection, keep).await?;
        debug!(
            backend = self.store.backend(),
            %collection,
            keep,
            removed,
            "pruned collection"
        );
        Ok(removed)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let mut vectors = self.embedder.embed(&[text.to_string()]).await?;
        let vector = vectors.pop().ok_or_else(|| {
            MemoryError::ProviderUnavailable("provider returned no embedding".to_string())
        })?;
        let expected = self.embedder.dimension();
        if vector.len() != expected {
            return Err(MemoryError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        Ok(vector)
    }

    /// Record the query itself as a memory. Best effort: a journaling
    /// failure is logged, never surfaced to the searcher.
    async fn journal_query(
        &self,
        collection: &CollectionName,
        query: &str,
        query_embedding: Vec<f32>,
        top_k: usize,
        min_similarity: f32,
        results: &[SimilarityResult],
    ) {
        let mut metadata = Metadata::new();
        metadata.insert("kind".to_string(), json!("search_query"));
        metadata.insert("top_k".to_string(), json!(top_k));
        metadata.insert("min_similarity".to_string(), json!(min_similarity));
        metadata.insert("result_count".to_string(), json!(results.len()));

        let record = MemoryRecord::new(query, query_embedding, metadata);
        if let Err(err) = self.store.insert(collection, &record).await {
            warn!(%collection, error = %err, "failed to journal search query");
        }
    }
}
