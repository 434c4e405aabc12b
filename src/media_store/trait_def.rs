//! MediaStore trait definition.
//!
//! Abstracts the catalog operations behind a seam so callers (the scanner,
//! the rebuild task, the CLI) never depend on the SQLite backend directly.

use super::models::{MatchMode, MediaField, MediaRecord};
use super::store::StoreError;

/// A thread-safe media catalog.
///
/// Every operation is safe to call concurrently from any number of threads
/// and completes as an indivisible unit with respect to every other call.
/// Calls never suspend; they complete synchronously or fail. Re-entering the
/// store from within a callback invoked under one of these operations would
/// deadlock and is forbidden by contract.
pub trait MediaStore: Send + Sync {
    /// Insert or replace records keyed by path, in one transaction.
    ///
    /// Rows that fail to bind are logged and skipped; the transaction still
    /// commits with the rest of the batch. Returns the number of rows
    /// actually written, which may be less than the batch length.
    fn upsert_batch(&self, records: &[MediaRecord]) -> Result<usize, StoreError>;

    /// Exact point lookup by file path. `None` means "not catalogued" and
    /// is a normal outcome, not an error.
    fn get_by_path(&self, path: &str) -> Result<Option<MediaRecord>, StoreError>;

    /// Every record, ordered `track ASC, id ASC`. Empty store gives an
    /// empty vector.
    fn all_media(&self) -> Result<Vec<MediaRecord>, StoreError>;

    /// Distinct non-empty values of one field, in underlying row order.
    /// Empty and null values are never returned. Signals
    /// [`StoreError::EmptyResult`] when no row has a value for the field.
    fn distinct_values(&self, field: MediaField) -> Result<Vec<String>, StoreError>;

    /// Search one field, ordered `track ASC, id ASC` and deduplicated by
    /// path. `limit = None` means unbounded. Signals
    /// [`StoreError::EmptyResult`] when nothing matches.
    fn search(
        &self,
        field: MediaField,
        mode: MatchMode,
        term: &str,
        limit: Option<usize>,
    ) -> Result<Vec<MediaRecord>, StoreError>;
}
