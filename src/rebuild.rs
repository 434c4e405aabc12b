//! Asynchronous catalog rebuild.
//!
//! Rebuilding is an explicit operation with a completion signal, not a side
//! effect of configuration changes: callers hand over the store and the
//! media roots, the scan and upsert run on a blocking worker, and the
//! returned receiver resolves once with the outcome.

use crate::media_store::MediaStore;
use crate::scanner;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};

/// What a finished rebuild did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildOutcome {
    /// Media files found under the scanned roots.
    pub discovered: usize,
    /// Records that made it into the catalog transaction.
    pub written: usize,
}

/// Scan `roots` and upsert everything found, off the caller's thread.
///
/// The receiver yields the outcome exactly once; a transaction failure
/// surfaces as `written == 0` for the round, matching what interactive
/// callers display. Dropping the receiver detaches the rebuild without
/// cancelling it.
pub fn spawn_rebuild(
    store: Arc<dyn MediaStore>,
    roots: Vec<PathBuf>,
) -> oneshot::Receiver<RebuildOutcome> {
    let (done_tx, done_rx) = oneshot::channel();

    tokio::task::spawn_blocking(move || {
        info!("Rebuilding catalog from {} root(s)", roots.len());

        let mut records = Vec::new();
        for root in &roots {
            records.extend(scanner::scan_directory(root));
        }
        let discovered = records.len();

        let written = match store.upsert_batch(&records) {
            Ok(written) => written,
            Err(e) => {
                error!("Catalog rebuild failed to commit: {}", e);
                0
            }
        };

        info!(
            "Catalog rebuild complete: {} discovered, {} written",
            discovered, written
        );
        let _ = done_tx.send(RebuildOutcome {
            discovered,
            written,
        });
    });

    done_rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_store::SqliteMediaStore;
    use std::fs;

    #[tokio::test]
    async fn rebuild_scans_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.mp3"), b"x").unwrap();
        fs::write(dir.path().join("two.flac"), b"y").unwrap();
        fs::write(dir.path().join("skip.txt"), b"z").unwrap();

        let store: Arc<dyn MediaStore> = Arc::new(SqliteMediaStore::open_in_memory().unwrap());
        let outcome = spawn_rebuild(store.clone(), vec![dir.path().to_path_buf()])
            .await
            .unwrap();

        assert_eq!(outcome.discovered, 2);
        assert_eq!(outcome.written, 2);
        assert_eq!(store.all_media().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rebuild_of_nothing_completes() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn MediaStore> = Arc::new(SqliteMediaStore::open_in_memory().unwrap());
        let outcome = spawn_rebuild(store, vec![dir.path().to_path_buf()])
            .await
            .unwrap();
        assert_eq!(outcome, RebuildOutcome { discovered: 0, written: 0 });
    }
}
