//! SQLite local fallback store.

pub mod pool;
pub mod store;

pub use pool::DatabasePool;
pub use store::SqliteVectorStore;
