//! Embedding providers.
//!
//! `DigestEmbedder` produces deterministic offline vectors from SHA-256
//! digests; `OpenAiEmbedder` calls the OpenAI embeddings API.

pub mod digest;
pub mod openai;

pub use digest::DigestEmbedder;
pub use openai::OpenAiEmbedder;
