//! Infrastructure adapters for Mnemo.
//!
//! Concrete implementations of the mnemo-core traits: the deterministic
//! digest embedder and the OpenAI embeddings client, the SQLite local
//! fallback store and the Postgres/pgvector remote store, plus the
//! config loader and the gateway builder that wires a deployment
//! together.

pub mod builder;
pub mod config;
pub mod embed;
pub mod postgres;
pub mod sqlite;
