//! Shared domain types for Mnemo.
//!
//! This crate contains the core domain types used across the memory
//! subsystem: `MemoryRecord`, `SimilarityResult`, the validated
//! `CollectionName` identifier, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod collection;
pub mod config;
pub mod error;
pub mod record;
