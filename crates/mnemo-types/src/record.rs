//! Stored memory records and search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Arbitrary JSON metadata attached to a record.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A single stored memory entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    pub id: Uuid,
    pub content: String,
    /// The embedding vector. Not serialized on the API surface; callers
    /// get content, metadata, and scores, never raw vectors.
    #[serde(skip)]
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Build a new record with a time-ordered id and the current timestamp.
    pub fn new(content: impl Into<String>, embedding: Vec<f32>, metadata: Metadata) -> Self {
        Self {
            id: Uuid::now_v7(),
            content: content.into(),
            embedding,
            metadata,
            created_at: Utc::now(),
        }
    }
}

/// A record paired with its similarity score for a query.
///
/// Scores are cosine similarity in `[-1.0, 1.0]`; with non-negative
/// embeddings (the offline digest provider) they fall in `[0.0, 1.0]`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarityResult {
    #[serde(flatten)]
    pub record: MemoryRecord,
    pub similarity: f32,
}

/// Acknowledgement returned by a successful store operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreReceipt {
    pub id: Uuid,
    pub collection: String,
    pub created_at: DateTime<Utc>,
}
