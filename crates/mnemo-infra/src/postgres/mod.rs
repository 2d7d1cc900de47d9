//! Postgres/pgvector remote store.

pub mod store;

pub use store::PgVectorStore;
