//! SQLite-backed local fallback store.
//!
//! Embeddings and metadata are stored as JSON text; similarity is
//! computed in process over the full collection. That keeps the local
//! path dependency-free at the database level and is fine at fallback
//! scale (thousands of rows, not millions).
//!
//! Only a fixed set of collections exists locally: the migration
//! creates their tables up front, and `SUPPORTED_COLLECTIONS` is the
//! allow-list the store checks before touching SQL.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use mnemo_core::similarity::cosine_similarity;
use mnemo_core::store::VectorStore;
use mnemo_types::collection::CollectionName;
use mnemo_types::error::MemoryError;
use mnemo_types::record::{MemoryRecord, Metadata, SimilarityResult};

use super::pool::DatabasePool;

/// Collections provisioned by the local migration.
pub const SUPPORTED_COLLECTIONS: [&str; 4] =
    ["memories", "embeddings", "ocr_logs", "translations"];

/// Local fallback [`VectorStore`] over SQLite.
#[derive(Clone)]
pub struct SqliteVectorStore {
    pool: DatabasePool,
}

#[derive(FromRow)]
struct LocalRow {
    id: String,
    content: String,
    embedding: String,
    metadata: String,
    created_at: String,
}

impl LocalRow {
    fn into_record(self) -> Result<MemoryRecord, MemoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| MemoryError::Persistence(format!("corrupt id: {e}")))?;
        let embedding: Vec<f32> = serde_json::from_str(&self.embedding)
            .map_err(|e| MemoryError::Persistence(format!("corrupt embedding: {e}")))?;
        let metadata: Metadata = serde_json::from_str(&self.metadata)
            .map_err(|e| MemoryError::Persistence(format!("corrupt metadata: {e}")))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| MemoryError::Persistence(format!("corrupt timestamp: {e}")))?
            .with_timezone(&Utc);
        Ok(MemoryRecord {
            id,
            content: self.content,
            embedding,
            metadata,
            created_at,
        })
    }
}

impl SqliteVectorStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Resolve a collection to its local table name, or reject it.
    ///
    /// Schema qualifiers are meaningless in the single-file local
    /// database, so only the last segment is matched against the
    /// allow-list: `archive.memories` lands in `memories`.
    fn table(collection: &CollectionName) -> Result<&str, MemoryError> {
        let table = collection.table();
        if SUPPORTED_COLLECTIONS.contains(&table) {
            Ok(table)
        } else {
            Err(MemoryError::UnsupportedCollection(
                collection.as_str().to_string(),
            ))
        }
    }

    async fn rows_in_order(&self, table: &str) -> Result<Vec<LocalRow>, MemoryError> {
        let sql = format!(
            "SELECT id, content, embedding, metadata, created_at FROM {table} ORDER BY seq ASC"
        );
        sqlx::query_as::<_, LocalRow>(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| MemoryError::Persistence(e.to_string()))
    }
}

impl VectorStore for SqliteVectorStore {
    // The local store keeps the caller's timestamp: recency ordering
    // goes through `seq`, never through the clock.
    async fn insert(
        &self,
        collection: &CollectionName,
        record: &MemoryRecord,
    ) -> Result<DateTime<Utc>, MemoryError> {
        let table = Self::table(collection)?;
        let embedding = serde_json::to_string(&record.embedding)
            .map_err(|e| MemoryError::Persistence(e.to_string()))?;
        let metadata = serde_json::to_string(&record.metadata)
            .map_err(|e| MemoryError::Persistence(e.to_string()))?;
        let sql = format!(
            "INSERT INTO {table} (id, content, embedding, metadata, created_at) VALUES (?, ?, ?, ?, ?)"
        );
        sqlx::query(&sql)
            .bind(record.id.to_string())
            .bind(&record.content)
            .bind(embedding)
            .bind(metadata)
            .bind(record.created_at.to_rfc3339())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| MemoryError::Persistence(e.to_string()))?;
        Ok(record.created_at)
    }

    async fn search(
        &self,
        collection: &CollectionName,
        query_embedding: &[f32],
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<SimilarityResult>, MemoryError> {
        let table = Self::table(collection)?;

        // Score everything, apply the threshold, then truncate. Rows
        // arrive in insertion order and the sort is stable, so equal
        // scores keep the earlier record first.
        let mut results = Vec::new();
        for row in self.rows_in_order(table).await? {
            let record = row.into_record()?;
            let similarity = cosine_similarity(query_embedding, &record.embedding)?;
            if similarity >= min_similarity {
                results.push(SimilarityResult { record, similarity });
            }
        }
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
        Ok(results)
    }

    async fn fetch_all(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<MemoryRecord>, MemoryError> {
        let table = Self::table(collection)?;
        let sql = format!(
            "SELECT id, content, embedding, metadata, created_at FROM {table} ORDER BY seq DESC"
        );
        sqlx::query_as::<_, LocalRow>(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| MemoryError::Persistence(e.to_string()))?
            .into_iter()
            .map(LocalRow::into_record)
            .collect()
    }

    async fn prune(&self, collection: &CollectionName, keep: usize) -> Result<u64, MemoryError> {
        let table = Self::table(collection)?;
        let sql = format!(
            "DELETE FROM {table} WHERE seq NOT IN (SELECT seq FROM {table} ORDER BY seq DESC LIMIT ?)"
        );
        let result = sqlx::query(&sql)
            .bind(keep as i64)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| MemoryError::Persistence(e.to_string()))?;
        Ok(result.rows_affected())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, SqliteVectorStore) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(&dir.path().join("test.db")).await.unwrap();
        (dir, SqliteVectorStore::new(pool))
    }

    fn record(content: &str, embedding: Vec<f32>) -> MemoryRecord {
        MemoryRecord::new(content, embedding, Metadata::new())
    }

    fn memories() -> CollectionName {
        CollectionName::new("memories").unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_fetch_roundtrip() {
        let (_dir, store) = store().await;
        let collection = memories();
        let mut meta = Metadata::new();
        meta.insert("lang".to_string(), serde_json::json!("mi"));
        let original = MemoryRecord::new("kia ora", vec![0.1, 0.2, 0.3], meta);
        store.insert(&collection, &original).await.unwrap();

        let fetched = store.fetch_all(&collection).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, original.id);
        assert_eq!(fetched[0].content, "kia ora");
        assert_eq!(fetched[0].embedding, vec![0.1, 0.2, 0.3]);
        assert_eq!(fetched[0].metadata["lang"], "mi");
    }

    #[tokio::test]
    async fn test_unsupported_collection_rejected() {
        let (_dir, store) = store().await;
        let collection = CollectionName::new("somewhere_else").unwrap();
        let err = store
            .insert(&collection, &record("x", vec![1.0]))
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::UnsupportedCollection(_)));
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let (_dir, store) = store().await;
        let collection = memories();
        store
            .insert(&collection, &record("east", vec![0.0, 1.0]))
            .await
            .unwrap();
        store
            .insert(&collection, &record("north", vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .insert(&collection, &record("north-east", vec![0.7, 0.7]))
            .await
            .unwrap();

        let results = store
            .search(&collection, &[1.0, 0.1], 10, -1.0)
            .await
            .unwrap();
        let contents: Vec<&str> = results.iter().map(|r| r.record.content.as_str()).collect();
        assert_eq!(contents, vec!["north", "north-east", "east"]);
    }

    #[tokio::test]
    async fn test_threshold_applies_before_truncation() {
        let (_dir, store) = store().await;
        let collection = memories();
        // Two poor matches inserted first, one good match last.
        store
            .insert(&collection, &record("bad1", vec![0.0, 1.0]))
            .await
            .unwrap();
        store
            .insert(&collection, &record("bad2", vec![0.1, 1.0]))
            .await
            .unwrap();
        store
            .insert(&collection, &record("good", vec![1.0, 0.0]))
            .await
            .unwrap();

        // With limit 2 and a high threshold, the good match must
        // survive even though two other rows precede it.
        let results = store
            .search(&collection, &[1.0, 0.0], 2, 0.9)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.content, "good");
    }

    #[tokio::test]
    async fn test_equal_scores_keep_insertion_order() {
        let (_dir, store) = store().await;
        let collection = memories();
        store
            .insert(&collection, &record("first", vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .insert(&collection, &record("second", vec![1.0, 0.0]))
            .await
            .unwrap();

        let results = store
            .search(&collection, &[1.0, 0.0], 10, 0.0)
            .await
            .unwrap();
        assert_eq!(results[0].record.content, "first");
        assert_eq!(results[1].record.content, "second");
    }

    #[tokio::test]
    async fn test_dimension_mismatch_surfaces_from_search() {
        let (_dir, store) = store().await;
        let collection = memories();
        store
            .insert(&collection, &record("a", vec![1.0, 0.0, 0.0]))
            .await
            .unwrap();
        let err = store
            .search(&collection, &[1.0, 0.0], 10, 0.0)
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_qualified_name_resolves_to_local_table() {
        let (_dir, store) = store().await;
        let qualified = CollectionName::new("archive.memories").unwrap();
        store
            .insert(&qualified, &record("filed away", vec![1.0]))
            .await
            .unwrap();

        // The qualifier is dropped locally, so the plain name sees it.
        let fetched = store.fetch_all(&memories()).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].content, "filed away");
    }

    #[tokio::test]
    async fn test_prune_keeps_newest() {
        let (_dir, store) = store().await;
        let collection = memories();
        for i in 0..5 {
            store
                .insert(&collection, &record(&format!("note {i}"), vec![1.0]))
                .await
                .unwrap();
        }

        let removed = store.prune(&collection, 2).await.unwrap();
        assert_eq!(removed, 3);

        // fetch_all returns newest first.
        let remaining = store.fetch_all(&collection).await.unwrap();
        let contents: Vec<&str> = remaining.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["note 4", "note 3"]);
    }

    #[tokio::test]
    async fn test_prune_with_keep_larger_than_count() {
        let (_dir, store) = store().await;
        let collection = memories();
        store.insert(&collection, &record("only", vec![1.0])).await.unwrap();
        assert_eq!(store.prune(&collection, 10).await.unwrap(), 0);
        assert_eq!(store.fetch_all(&collection).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let (_dir, store) = store().await;
        let memories = memories();
        let translations = CollectionName::new("translations").unwrap();
        store
            .insert(&memories, &record("in memories", vec![1.0]))
            .await
            .unwrap();
        store
            .insert(&translations, &record("in translations", vec![1.0]))
            .await
            .unwrap();

        let from_translations = store.fetch_all(&translations).await.unwrap();
        assert_eq!(from_translations.len(), 1);
        assert_eq!(from_translations[0].content, "in translations");
    }
}
