//! Memory subsystem configuration.

use serde::{Deserialize, Serialize};

use crate::collection::CollectionName;

/// Which backend the gateway is wired to.
///
/// Selected once at construction; there is no runtime failover between
/// the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreMode {
    /// Deterministic digest embeddings + local SQLite store.
    Offline,
    /// Remote embedding provider + Postgres/pgvector store.
    Live,
}

/// Retry behavior for dependency calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts, including the first. Must be at least 1.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles on each further attempt.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

/// Top-level configuration for the memory gateway.
///
/// Every field has a default so a missing or partial config file still
/// yields a working offline deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_mode")]
    pub mode: StoreMode,
    /// Default collection for store/search when the caller names none.
    #[serde(default = "default_collection")]
    pub collection: CollectionName,
    /// Embedding dimension in offline mode.
    #[serde(default = "default_offline_dimension")]
    pub offline_dimension: usize,
    /// Embedding dimension in live mode.
    #[serde(default = "default_live_dimension")]
    pub live_dimension: usize,
    /// Remote embedding model identifier (live mode only).
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// When true, every search also journals its query text as a record.
    #[serde(default)]
    pub journal_queries: bool,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl MemoryConfig {
    /// The embedding dimension implied by the configured mode.
    pub fn dimension(&self) -> usize {
        match self.mode {
            StoreMode::Offline => self.offline_dimension,
            StoreMode::Live => self.live_dimension,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            collection: default_collection(),
            offline_dimension: default_offline_dimension(),
            live_dimension: default_live_dimension(),
            embedding_model: default_embedding_model(),
            journal_queries: false,
            retry: RetrySettings::default(),
        }
    }
}

fn default_mode() -> StoreMode {
    StoreMode::Offline
}

fn default_collection() -> CollectionName {
    // "memories" always passes the identifier check.
    CollectionName::new("memories").unwrap_or_else(|_| unreachable!())
}

fn default_offline_dimension() -> usize {
    32
}

fn default_live_dimension() -> usize {
    1536
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
