//! Gateway builder.
//!
//! Wires a [`MemoryGateway`] from configuration. The backend is chosen
//! exactly once here: an offline gateway gets the digest embedder and
//! the SQLite store, a live gateway gets the OpenAI embedder and the
//! pgvector store. There is no fallback from one to the other at
//! runtime.

use tracing::info;

use mnemo_core::gateway::MemoryGateway;
use mnemo_core::retry::RetryPolicy;
use mnemo_core::{BoxEmbedder, BoxVectorStore};
use mnemo_types::config::{MemoryConfig, StoreMode};
use mnemo_types::error::MemoryError;

use crate::config::{data_dir, local_database_path, openai_api_key, remote_database_url};
use crate::embed::{DigestEmbedder, OpenAiEmbedder};
use crate::postgres::PgVectorStore;
use crate::sqlite::{DatabasePool, SqliteVectorStore};

/// Build a gateway for the configured mode.
///
/// Offline mode opens (and migrates) the local SQLite database. Live
/// mode requires `MNEMO_DATABASE_URL` (or `DATABASE_URL`); the OpenAI
/// key is read from `OPENAI_API_KEY` but its absence only surfaces on
/// the first embedding call.
pub async fn build_gateway(config: MemoryConfig) -> Result<MemoryGateway, MemoryError> {
    let retry = RetryPolicy::new(&config.retry);

    let (embedder, store) = match config.mode {
        StoreMode::Offline => {
            tokio::fs::create_dir_all(data_dir())
                .await
                .map_err(|e| MemoryError::Persistence(e.to_string()))?;
            let pool = DatabasePool::open(&local_database_path())
                .await
                .map_err(|e| MemoryError::Persistence(e.to_string()))?;
            info!(mode = "offline", dimension = config.offline_dimension, "memory gateway ready");
            (
                BoxEmbedder::new(DigestEmbedder::new(config.offline_dimension)),
                BoxVectorStore::new(SqliteVectorStore::new(pool)),
            )
        }
        StoreMode::Live => {
            let database_url = remote_database_url().ok_or_else(|| {
                MemoryError::InvalidInput(
                    "live mode requires MNEMO_DATABASE_URL or DATABASE_URL".to_string(),
                )
            })?;
            let embedder = OpenAiEmbedder::new(
                openai_api_key(),
                config.embedding_model.clone(),
                config.live_dimension,
                retry.clone(),
            )?;
            let store = PgVectorStore::new(&database_url, config.live_dimension, retry)?;
            info!(mode = "live", model = %config.embedding_model, "memory gateway ready");
            (BoxEmbedder::new(embedder), BoxVectorStore::new(store))
        }
    };

    Ok(MemoryGateway::new(embedder, store, config))
}
