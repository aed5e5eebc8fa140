//! Debounced persistence of one puzzle's progress.

use chrono::{DateTime, Utc};
use pixnum_engine::{KeyValueStore, ProgressCodec, StoreError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::debounce::Debouncer;

/// Writes a puzzle's painted grid and selection through the progress codec,
/// coalescing bursts of paint events into a single write.
pub struct ProgressWriter {
    image_id: Arc<str>,
    store: Arc<dyn KeyValueStore>,
    debouncer: Debouncer,
    saved_at: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl ProgressWriter {
    pub fn new(image_id: &str, store: Arc<dyn KeyValueStore>, delay: Duration) -> Self {
        Self {
            image_id: Arc::from(image_id),
            store,
            debouncer: Debouncer::new(delay),
            saved_at: Arc::new(Mutex::new(None)),
        }
    }

    /// Schedule a write of `painted` and `selected`, replacing any pending one.
    ///
    /// Failures of the deferred write are logged; the next write retries.
    pub fn schedule(&self, painted: Vec<u8>, selected: u8) {
        let image_id = self.image_id.clone();
        let store = self.store.clone();
        let saved_at = self.saved_at.clone();

        self.debouncer.schedule(move || {
            if let Err(e) = write(&*store, &image_id, &painted, selected, &saved_at) {
                tracing::warn!(image_id = %image_id, error = %e, "Failed to save progress");
            }
        });
    }

    /// Write immediately, dropping any pending write.
    pub fn flush(&self, painted: &[u8], selected: u8) -> Result<(), StoreError> {
        self.debouncer.run_now(|| {
            write(
                &*self.store,
                &self.image_id,
                painted,
                selected,
                &self.saved_at,
            )
        })
    }

    /// Drop any pending write. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        self.debouncer.cancel()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Time of the last successful write in this session
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        *self.saved_at.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn write(
    store: &dyn KeyValueStore,
    image_id: &str,
    painted: &[u8],
    selected: u8,
    saved_at: &Mutex<Option<DateTime<Utc>>>,
) -> Result<(), StoreError> {
    ProgressCodec::new(store).save(image_id, painted, selected)?;
    *saved_at.lock().unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
    tracing::debug!(image_id, cells = painted.len(), selected, "Progress saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixnum_engine::MemoryStore;
    use pretty_assertions::assert_eq;
    use tokio::time::sleep;

    fn setup() -> (Arc<MemoryStore>, ProgressWriter) {
        let store = Arc::new(MemoryStore::new());
        let writer = ProgressWriter::new("heart", store.clone(), Duration::from_millis(500));
        (store, writer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_writes_last_state_after_quiet_interval() {
        let (store, writer) = setup();

        writer.schedule(vec![4, 0, 0], 4);
        sleep(Duration::from_millis(200)).await;
        writer.schedule(vec![4, 4, 0], 4);
        sleep(Duration::from_millis(200)).await;
        assert!(store.is_empty());
        assert!(writer.saved_at().is_none());

        sleep(Duration::from_millis(400)).await;
        assert_eq!(store.get("painted_v1_heart").unwrap(), Some(vec![4, 4, 0]));
        assert_eq!(store.get("selected_v1_heart").unwrap(), Some(b"4".to_vec()));
        assert!(writer.saved_at().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_supersedes_pending_write() {
        let (store, writer) = setup();

        writer.schedule(vec![4, 0, 0], 4);
        writer.flush(&[4, 4, 9], 9).unwrap();
        assert!(!writer.is_pending());
        assert_eq!(store.get("painted_v1_heart").unwrap(), Some(vec![4, 4, 9]));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(store.get("painted_v1_heart").unwrap(), Some(vec![4, 4, 9]));
        assert_eq!(store.get("selected_v1_heart").unwrap(), Some(b"9".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_write() {
        let (store, writer) = setup();

        writer.schedule(vec![4], 4);
        assert!(writer.cancel());
        sleep(Duration::from_secs(1)).await;
        assert!(store.is_empty());
    }
}
