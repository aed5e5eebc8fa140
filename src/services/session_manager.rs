//! Open puzzle sessions.
//!
//! A session is created by [`SessionManager::open`]: the puzzle image is
//! decoded and quantized on the blocking pool, then installed in the
//! session map together with any restored progress. Only then do paint
//! requests see it. Each session sits behind its own async mutex, so
//! requests against one puzzle are applied strictly in order.

use pixnum_engine::{
    ColorProgress, KeyValueStore, PaintState, Palette, ProgressCodec, QuantizeOptions, Quantizer,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::image_loader::load_puzzle_image;
use super::progress_writer::ProgressWriter;
use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;

/// One open puzzle
pub struct Session {
    puzzle_id: String,
    title: String,
    state: PaintState,
    selected: u8,
    writer: ProgressWriter,
}

impl Session {
    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> &PaintState {
        &self.state
    }

    pub fn selected(&self) -> u8 {
        self.selected
    }

    pub fn writer(&self) -> &ProgressWriter {
        &self.writer
    }

    fn schedule_save(&self) {
        self.writer
            .schedule(self.state.painted().to_vec(), self.selected);
    }

    fn flush(&self) -> Result<(), ApiError> {
        self.writer.flush(self.state.painted(), self.selected)?;
        Ok(())
    }
}

/// Result of a paint or brush request
#[derive(Debug, Clone, PartialEq)]
pub struct PaintOutcome {
    /// `paint_if_matches` result, or whether the brush painted any cell
    pub painted: bool,
    /// Cells that changed from unpainted to painted
    pub newly_painted: usize,
    /// Selection after the request, possibly auto-advanced
    pub selected: u8,
    /// Set when the request completed the selected color and moved on
    pub advanced_to: Option<u8>,
    pub color_progress: ColorProgress,
    pub overall: ColorProgress,
    pub complete: bool,
}

type SharedSession = Arc<Mutex<Session>>;

/// Owns every open session
pub struct SessionManager {
    config: Arc<AppConfig>,
    assets: Arc<AssetLoader>,
    palette: Arc<Palette>,
    options: QuantizeOptions,
    store: Arc<dyn KeyValueStore>,
    sessions: RwLock<HashMap<String, SharedSession>>,
}

impl SessionManager {
    pub fn new(
        config: Arc<AppConfig>,
        assets: Arc<AssetLoader>,
        palette: Arc<Palette>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let options = config.quantize_options();
        Self {
            config,
            assets,
            palette,
            options,
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Open a puzzle, or return the already open session.
    pub async fn open(&self, puzzle_id: &str) -> Result<SharedSession, ApiError> {
        if let Some(session) = self.sessions.read().await.get(puzzle_id) {
            return Ok(session.clone());
        }

        let puzzle = self
            .config
            .get_puzzle(puzzle_id)
            .ok_or_else(|| ApiError::UnknownPuzzle(puzzle_id.to_string()))?;
        let title = puzzle.title_or(puzzle_id).to_string();

        let assets = self.assets.clone();
        let image = puzzle.image.clone();
        let quantizer = Quantizer::new((*self.palette).clone()).options(self.options);
        let started = std::time::Instant::now();

        let target = tokio::task::spawn_blocking(move || {
            let buffer = load_puzzle_image(&assets, &image)?;
            quantizer.convert(&buffer)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Conversion task failed: {e}")))?
        .map_err(|e| {
            tracing::warn!(puzzle_id, error = %e, "Failed to load puzzle");
            ApiError::LoadFailed(e.to_string())
        })?;

        let mut state = PaintState::from_target(target);
        let saved = ProgressCodec::new(&*self.store).restore(puzzle_id, state.painted().len())?;
        if let Some(painted) = saved.painted {
            state.apply_painted(painted);
        }
        let selected = saved
            .selected
            .filter(|&i| self.palette.contains(i))
            .or_else(|| self.palette.indices().first().copied())
            .unwrap_or_default();

        tracing::info!(
            puzzle_id,
            width = state.width(),
            height = state.height(),
            paintable = state.overall_progress().total,
            painted = state.overall_progress().painted,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Opened puzzle"
        );

        let session = Session {
            puzzle_id: puzzle_id.to_string(),
            title,
            state,
            selected,
            writer: ProgressWriter::new(puzzle_id, self.store.clone(), self.config.save_debounce()),
        };

        // A concurrent open may have won the race; keep the installed session.
        let mut sessions = self.sessions.write().await;
        Ok(sessions
            .entry(puzzle_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(session)))
            .clone())
    }

    /// Look up an open session.
    pub async fn get(&self, puzzle_id: &str) -> Result<SharedSession, ApiError> {
        if let Some(session) = self.sessions.read().await.get(puzzle_id) {
            return Ok(session.clone());
        }
        if self.config.get_puzzle(puzzle_id).is_none() {
            return Err(ApiError::UnknownPuzzle(puzzle_id.to_string()));
        }
        Err(ApiError::PuzzleNotOpen(puzzle_id.to_string()))
    }

    /// Ids of every open session, sorted
    pub async fn open_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Paint one cell if `selected` (or the session's selection) matches.
    pub async fn paint(
        &self,
        puzzle_id: &str,
        x: i64,
        y: i64,
        selected: Option<u8>,
    ) -> Result<PaintOutcome, ApiError> {
        let session = self.get(puzzle_id).await?;
        let mut session = session.lock().await;
        let selected = self.resolve_selection(&mut session, selected)?;

        let before = session.state.progress_for(selected).painted;
        let painted = session.state.paint_if_matches(x, y, selected);
        let newly_painted = session.state.progress_for(selected).painted - before;

        Ok(self.finish_paint(&mut session, painted, newly_painted))
    }

    /// Paint the square of `radius` around `(x, y)`.
    pub async fn brush(
        &self,
        puzzle_id: &str,
        x: i64,
        y: i64,
        radius: i64,
        selected: Option<u8>,
    ) -> Result<PaintOutcome, ApiError> {
        let session = self.get(puzzle_id).await?;
        let mut session = session.lock().await;
        let selected = self.resolve_selection(&mut session, selected)?;

        let newly_painted = session.state.paint_brush(x, y, radius, selected);

        Ok(self.finish_paint(&mut session, newly_painted > 0, newly_painted))
    }

    /// Select a palette color.
    pub async fn select(&self, puzzle_id: &str, index: u8) -> Result<u8, ApiError> {
        let session = self.get(puzzle_id).await?;
        let mut session = session.lock().await;
        self.resolve_selection(&mut session, Some(index))
    }

    /// Select the next color with cells left to paint.
    ///
    /// Returns `None` and keeps the selection when every color is done.
    pub async fn advance(&self, puzzle_id: &str) -> Result<Option<u8>, ApiError> {
        let session = self.get(puzzle_id).await?;
        let mut session = session.lock().await;

        let next = session.state.next_incomplete(&self.palette, session.selected);
        if let Some(next) = next {
            if next != session.selected {
                session.selected = next;
                session.schedule_save();
            }
        }
        tracing::debug!(puzzle_id, next = ?next, "Advance requested");
        Ok(next)
    }

    /// Progress of one palette color.
    pub async fn progress_for(&self, puzzle_id: &str, index: u8) -> Result<ColorProgress, ApiError> {
        if !self.palette.contains(index) {
            return Err(ApiError::InvalidIndex(index));
        }
        let session = self.get(puzzle_id).await?;
        let session = session.lock().await;
        Ok(session.state.progress_for(index))
    }

    /// Clear the painted grid and the stored progress of a puzzle.
    ///
    /// Works whether or not the puzzle is open.
    pub async fn reset(&self, puzzle_id: &str) -> Result<(), ApiError> {
        if self.config.get_puzzle(puzzle_id).is_none() {
            return Err(ApiError::UnknownPuzzle(puzzle_id.to_string()));
        }

        let open = self.sessions.read().await.get(puzzle_id).cloned();
        match open {
            Some(session) => {
                let mut session = session.lock().await;
                session.writer.cancel();
                session.state.reset_painted();
                ProgressCodec::new(&*self.store).clear(puzzle_id)?;
            }
            None => ProgressCodec::new(&*self.store).clear(puzzle_id)?,
        }

        tracing::info!(puzzle_id, "Reset puzzle progress");
        Ok(())
    }

    /// Clear stored progress of every configured puzzle and every open grid.
    pub async fn reset_all(&self) -> Result<usize, ApiError> {
        let sessions: Vec<SharedSession> = self.sessions.read().await.values().cloned().collect();
        for session in sessions {
            let mut session = session.lock().await;
            session.writer.cancel();
            session.state.reset_painted();
        }

        let count = ProgressCodec::new(&*self.store).reset_all(self.config.puzzle_ids())?;
        Ok(count)
    }

    /// Close a session, writing its progress immediately.
    ///
    /// Returns `false` if the puzzle was not open. If the write fails the
    /// session stays open with its progress intact.
    pub async fn close(&self, puzzle_id: &str) -> Result<bool, ApiError> {
        let Some(shared) = self.sessions.read().await.get(puzzle_id).cloned() else {
            return Ok(false);
        };

        // Held until the entry is gone, so no open can restore older progress.
        let session = shared.lock().await;
        session.flush()?;

        let mut sessions = self.sessions.write().await;
        let removed = sessions
            .get(puzzle_id)
            .is_some_and(|current| Arc::ptr_eq(current, &shared));
        if removed {
            sessions.remove(puzzle_id);
        }
        drop(sessions);
        drop(session);

        if removed {
            tracing::info!(puzzle_id, "Closed puzzle");
        }
        Ok(removed)
    }

    /// Flush every open session. Sessions stay open.
    pub async fn flush_all(&self) -> usize {
        let sessions: Vec<SharedSession> = self.sessions.read().await.values().cloned().collect();
        let mut flushed = 0;
        for session in sessions {
            let session = session.lock().await;
            match session.flush() {
                Ok(()) => flushed += 1,
                Err(e) => {
                    tracing::error!(puzzle_id = %session.puzzle_id, error = %e, "Failed to flush progress")
                }
            }
        }
        flushed
    }

    /// Use `requested` as the selection if given, validating it against the
    /// palette, and schedule a save when the selection changes.
    fn resolve_selection(&self, session: &mut Session, requested: Option<u8>) -> Result<u8, ApiError> {
        let Some(index) = requested else {
            return Ok(session.selected);
        };
        if !self.palette.contains(index) {
            return Err(ApiError::InvalidIndex(index));
        }
        if index != session.selected {
            session.selected = index;
            session.schedule_save();
        }
        Ok(index)
    }

    fn finish_paint(&self, session: &mut Session, painted: bool, newly_painted: usize) -> PaintOutcome {
        let painted_with = session.selected;
        let mut advanced_to = None;

        if newly_painted > 0 {
            if self.config.auto_advance && session.state.is_color_complete(painted_with) {
                if let Some(next) = session.state.next_incomplete(&self.palette, painted_with) {
                    if next != painted_with {
                        session.selected = next;
                        advanced_to = Some(next);
                    }
                }
            }
            session.schedule_save();
        }

        if session.state.is_complete() && newly_painted > 0 {
            tracing::info!(puzzle_id = %session.puzzle_id, "Puzzle complete");
        }

        PaintOutcome {
            painted,
            newly_painted,
            selected: session.selected,
            advanced_to,
            color_progress: session.state.progress_for(painted_with),
            overall: session.state.overall_progress(),
            complete: session.state.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PuzzleConfig;
    use pixnum_engine::{MemoryStore, StoreError};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    // Quantized embedded heart.png with the classic palette:
    // red (4) 79 cells, white (5) 3 cells, black (9) 32 cells.
    const HEART_RED: usize = 79;
    const HEART_PAINTABLE: usize = 114;

    /// Memory store whose writes can be switched to fail
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            self.inner.set(key, value)
        }

        fn delete(&self, key: &str) -> Result<(), StoreError> {
            self.inner.delete(key)
        }
    }

    fn manager_with(config: AppConfig, store: Arc<dyn KeyValueStore>) -> SessionManager {
        let palette = Arc::new(config.palette_or_default());
        SessionManager::new(
            Arc::new(config),
            Arc::new(AssetLoader::new(None, None)),
            palette,
            store,
        )
    }

    fn manager() -> (SessionManager, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (manager_with(AppConfig::default(), store.clone()), store)
    }

    #[tokio::test]
    async fn test_open_quantizes_and_selects_first_color() {
        let (manager, _) = manager();
        let session = manager.open("heart").await.unwrap();
        let session = session.lock().await;

        assert_eq!(session.title(), "Heart");
        assert_eq!((session.state().width(), session.state().height()), (16, 16));
        assert_eq!(session.selected(), 1);
        assert_eq!(
            session.state().overall_progress(),
            ColorProgress::new(HEART_PAINTABLE, 0)
        );
        assert_eq!(session.state().progress_for(4).total, HEART_RED);
    }

    #[tokio::test]
    async fn test_open_twice_shares_session() {
        let (manager, _) = manager();
        let a = manager.open("heart").await.unwrap();
        let b = manager.open("heart").await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(manager.open_ids().await, vec!["heart"]);
    }

    #[tokio::test]
    async fn test_open_errors() {
        let mut config = AppConfig::default();
        config.puzzles.insert(
            "broken".into(),
            PuzzleConfig {
                title: None,
                image: PathBuf::from("missing.png"),
            },
        );
        let manager = manager_with(config, Arc::new(MemoryStore::new()));

        assert!(matches!(
            manager.open("dragon").await,
            Err(ApiError::UnknownPuzzle(_))
        ));
        assert!(matches!(
            manager.open("broken").await,
            Err(ApiError::LoadFailed(_))
        ));
        assert!(manager.open_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_requests_before_open() {
        let (manager, _) = manager();
        assert!(matches!(
            manager.paint("heart", 0, 0, None).await,
            Err(ApiError::PuzzleNotOpen(_))
        ));
        assert!(matches!(
            manager.paint("dragon", 0, 0, None).await,
            Err(ApiError::UnknownPuzzle(_))
        ));
    }

    #[tokio::test]
    async fn test_paint_rules() {
        let (manager, _) = manager();
        manager.open("heart").await.unwrap();

        // (3, 2) is black outline, (4, 3) is red, (0, 0) is background
        let wrong = manager.paint("heart", 3, 2, Some(4)).await.unwrap();
        assert!(!wrong.painted);
        assert_eq!(wrong.newly_painted, 0);

        let outside = manager.paint("heart", 0, 0, Some(4)).await.unwrap();
        assert!(!outside.painted);

        let ok = manager.paint("heart", 4, 3, Some(4)).await.unwrap();
        assert!(ok.painted);
        assert_eq!(ok.newly_painted, 1);
        assert_eq!(ok.selected, 4);
        assert_eq!(ok.color_progress, ColorProgress::new(HEART_RED, 1));

        let again = manager.paint("heart", 4, 3, None).await.unwrap();
        assert!(again.painted);
        assert_eq!(again.newly_painted, 0);
    }

    #[tokio::test]
    async fn test_invalid_selection() {
        let (manager, _) = manager();
        manager.open("heart").await.unwrap();
        assert!(matches!(
            manager.paint("heart", 4, 3, Some(7)).await,
            Err(ApiError::InvalidIndex(7))
        ));
        assert!(matches!(
            manager.select("heart", 0).await,
            Err(ApiError::InvalidIndex(0))
        ));
        assert!(matches!(
            manager.progress_for("heart", 42).await,
            Err(ApiError::InvalidIndex(42))
        ));
    }

    #[tokio::test]
    async fn test_brush_completes_color_and_auto_advances() {
        let (manager, _) = manager();
        manager.open("heart").await.unwrap();

        let outcome = manager.brush("heart", 8, 8, 16, Some(5)).await.unwrap();
        assert_eq!(outcome.newly_painted, 3);
        // classic order is 1, 2, 3, 4, 5, 9; 1-3 have no cells here
        assert_eq!(outcome.advanced_to, Some(9));
        assert_eq!(outcome.selected, 9);
        assert_eq!(outcome.color_progress, ColorProgress::new(3, 3));
    }

    #[tokio::test]
    async fn test_auto_advance_disabled() {
        let config = AppConfig {
            auto_advance: false,
            ..Default::default()
        };
        let manager = manager_with(config, Arc::new(MemoryStore::new()));
        manager.open("heart").await.unwrap();

        let outcome = manager.brush("heart", 8, 8, 16, Some(5)).await.unwrap();
        assert_eq!(outcome.advanced_to, None);
        assert_eq!(outcome.selected, 5);
    }

    #[tokio::test]
    async fn test_advance_and_completion() {
        let (manager, _) = manager();
        manager.open("heart").await.unwrap();

        assert_eq!(manager.advance("heart").await.unwrap(), Some(4));
        for index in [4, 5, 9] {
            manager.brush("heart", 0, 0, 16, Some(index)).await.unwrap();
        }
        assert_eq!(manager.advance("heart").await.unwrap(), None);

        let session = manager.get("heart").await.unwrap();
        assert!(session.lock().await.state().is_complete());
    }

    #[tokio::test]
    async fn test_close_flushes_and_reopen_restores() {
        let (manager, store) = manager();
        manager.open("heart").await.unwrap();
        manager.brush("heart", 8, 8, 16, Some(4)).await.unwrap();
        assert!(manager.close("heart").await.unwrap());
        assert!(!manager.close("heart").await.unwrap());

        let saved = store.get("painted_v1_heart").unwrap().unwrap();
        assert_eq!(saved.iter().filter(|&&c| c == 4).count(), HEART_RED);

        let session = manager.open("heart").await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.state().progress_for(4), ColorProgress::new(HEART_RED, HEART_RED));
        // Red was complete, so the selection had moved on to white
        assert_eq!(session.selected(), 5);
    }

    #[tokio::test]
    async fn test_failed_close_keeps_session_open() {
        let store = Arc::new(FlakyStore::default());
        let manager = manager_with(AppConfig::default(), store.clone());
        manager.open("heart").await.unwrap();
        manager.brush("heart", 8, 8, 16, Some(4)).await.unwrap();

        store.failing.store(true, Ordering::SeqCst);
        assert!(matches!(
            manager.close("heart").await,
            Err(ApiError::Store(_))
        ));
        assert_eq!(manager.open_ids().await, vec!["heart".to_string()]);
        let session = manager.get("heart").await.unwrap();
        assert_eq!(
            session.lock().await.state().progress_for(4),
            ColorProgress::new(HEART_RED, HEART_RED)
        );

        store.failing.store(false, Ordering::SeqCst);
        assert!(manager.close("heart").await.unwrap());
        assert!(manager.open_ids().await.is_empty());

        let session = manager.open("heart").await.unwrap();
        assert_eq!(session.lock().await.state().progress_for(4).painted, HEART_RED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paint_is_saved_after_debounce() {
        let config = AppConfig {
            save_debounce_ms: 200,
            ..Default::default()
        };
        let store = Arc::new(MemoryStore::new());
        let manager = manager_with(config, store.clone());
        manager.open("heart").await.unwrap();

        manager.paint("heart", 4, 3, Some(4)).await.unwrap();
        assert!(store.get("painted_v1_heart").unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(250)).await;
        let saved = store.get("painted_v1_heart").unwrap().unwrap();
        assert_eq!(saved[3 * 16 + 4], 4);
        assert_eq!(store.get("selected_v1_heart").unwrap(), Some(b"4".to_vec()));
    }

    #[tokio::test]
    async fn test_restore_ignores_mismatched_blob() {
        let store = Arc::new(MemoryStore::new());
        store.set("painted_v1_heart", &[4, 4, 4]).unwrap();
        store.set("selected_v1_heart", b"9").unwrap();
        let manager = manager_with(AppConfig::default(), store);

        let session = manager.open("heart").await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.state().overall_progress().painted, 0);
        assert_eq!(session.selected(), 9);
    }

    #[tokio::test]
    async fn test_reset_and_reset_all() {
        let (manager, store) = manager();
        manager.open("heart").await.unwrap();
        manager.brush("heart", 8, 8, 16, Some(9)).await.unwrap();
        manager.close("heart").await.unwrap();
        assert!(store.get("painted_v1_heart").unwrap().is_some());

        manager.reset("heart").await.unwrap();
        assert!(store.is_empty());

        manager.open("heart").await.unwrap();
        manager.brush("heart", 8, 8, 16, Some(9)).await.unwrap();
        manager.flush_all().await;
        assert_eq!(manager.reset_all().await.unwrap(), 1);
        assert!(store.is_empty());

        let session = manager.get("heart").await.unwrap();
        assert_eq!(session.lock().await.state().overall_progress().painted, 0);
    }
}
