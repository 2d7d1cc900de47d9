//! Core logic for Mnemo.
//!
//! Defines the `Embedder` and `VectorStore` traits that the infrastructure
//! layer implements, the type-erased `BoxEmbedder`/`BoxVectorStore` wrappers,
//! cosine similarity, the retry layer, and the `MemoryGateway` that ties
//! them together. No I/O lives here; implementations live in mnemo-infra.

pub mod embedder;
pub mod gateway;
pub mod retry;
pub mod similarity;
pub mod store;

mod box_embedder;
mod box_store;

pub use box_embedder::BoxEmbedder;
pub use box_store::BoxVectorStore;
