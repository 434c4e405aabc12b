//! Melodeon media catalog.
//!
//! The metadata core of a desktop media player: a persistent, thread-safe
//! SQLite catalog of media files with upsert-by-path semantics, distinct
//! field enumeration and parameterized search, plus the directory scanner
//! that feeds it and an asynchronous rebuild operation.

pub mod config;
pub mod media_store;
pub mod rebuild;
pub mod scanner;

// Re-export commonly used types for convenience
pub use media_store::{
    MatchMode, MediaField, MediaRecord, MediaStore, SqliteMediaStore, StoreError,
};
pub use rebuild::{spawn_rebuild, RebuildOutcome};
