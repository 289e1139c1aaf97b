//! One open document: store, controller and background saving
//!
//! Every call that changes the committed set hands a fresh snapshot to the
//! [`WriteBehind`] saver; nothing on this path waits for storage.

use crate::controller::{GestureMode, GestureOutcome, InteractionController, TapOutcome};
use crate::projection::{PageProjection, ProjectionCache};
use crate::store::{AnnotationStore, EraseOutcome, TextNotePatch};
use doc_model::{AnnotationId, AnnotatorConfig, Color, HistoryEntry, PageNumber, Point, TextNote};
use std::sync::Arc;
use storage::{AnnotationRepository, DocumentKey, KeyValueBackend, WriteBehind, WriteStats};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to start the annotation writer")]
    Writer(#[source] std::io::Error),
}

pub struct DocumentSession {
    key: DocumentKey,
    store: AnnotationStore,
    controller: InteractionController,
    projection: ProjectionCache,
    writer: WriteBehind,
    saved_version: u64,
}

impl DocumentSession {
    /// Load the document's annotations and start its saver
    ///
    /// Unreadable or corrupt records open as an empty document.
    pub fn open<B>(
        repository: Arc<AnnotationRepository<B>>,
        key: DocumentKey,
        config: AnnotatorConfig,
    ) -> Result<Self, SessionError>
    where
        B: KeyValueBackend + 'static,
    {
        let set = repository.load(&key);
        log::info!("opened {key} with {} annotation(s)", set.len());

        let writer = WriteBehind::spawn(repository).map_err(SessionError::Writer)?;
        let store = AnnotationStore::with_set(set, config);
        let saved_version = store.version();

        Ok(Self {
            key,
            store,
            controller: InteractionController::default(),
            projection: ProjectionCache::new(),
            writer,
            saved_version,
        })
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn page(&self) -> PageNumber {
        self.controller.page()
    }

    pub fn set_page(&mut self, page: PageNumber) {
        self.controller.set_page(&mut self.store, page);
    }

    /// Mode used by taps; drags pass their mode explicitly
    pub fn set_mode(&mut self, mode: GestureMode) {
        self.controller.set_mode(mode);
    }

    pub fn gesture_begin(&mut self, point: Point, mode: GestureMode, color: Color) {
        self.controller.on_gesture_begin(&mut self.store, point, mode, color);
        self.persist_if_changed();
    }

    pub fn gesture_update(&mut self, point: Point) {
        self.controller.on_gesture_update(&mut self.store, point);
        self.persist_if_changed();
    }

    pub fn gesture_end(&mut self) -> GestureOutcome {
        let outcome = self.controller.on_gesture_end(&mut self.store);
        self.persist_if_changed();
        outcome
    }

    pub fn tap(&mut self, point: Point) -> TapOutcome {
        let outcome = self.controller.on_tap(&mut self.store, point);
        self.persist_if_changed();
        outcome
    }

    pub fn edit_request(&mut self, id: &AnnotationId) -> Option<TextNote> {
        self.controller.on_edit_request(&mut self.store, id)
    }

    pub fn confirm_text(&mut self, content: &str) -> Option<TextNote> {
        let note = self.controller.confirm_text(&mut self.store, content);
        self.persist_if_changed();
        note
    }

    pub fn delete_request(&mut self, id: &AnnotationId) -> Option<TextNote> {
        let note = self.controller.on_delete_request(&mut self.store, id);
        self.persist_if_changed();
        note
    }

    pub fn update_note(&mut self, id: &AnnotationId, patch: TextNotePatch) -> Option<TextNote> {
        let note = self.store.update_text_note(id, patch);
        self.persist_if_changed();
        note
    }

    /// Erase on the current page without going through a gesture
    pub fn erase_at(&mut self, points: &[Point]) -> EraseOutcome {
        let outcome = self.store.erase_at(points, self.controller.page());
        self.persist_if_changed();
        outcome
    }

    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.store.undo();
        self.persist_if_changed();
        entry
    }

    pub fn clear(&mut self) {
        self.controller.cancel(&mut self.store);
        self.store.clear();
        self.persist_if_changed();
    }

    pub fn cancel(&mut self) {
        self.controller.cancel(&mut self.store);
    }

    /// Projection of the current page, rebuilt only after changes
    pub fn projection(&mut self) -> &PageProjection {
        self.projection.get(&self.store, self.controller.page())
    }

    /// Block until every submitted snapshot has been written
    pub fn flush(&self) -> WriteStats {
        self.writer.flush();
        self.writer.stats()
    }

    pub fn write_stats(&self) -> WriteStats {
        self.writer.stats()
    }

    fn persist_if_changed(&mut self) {
        let version = self.store.version();
        if version == self.saved_version {
            return;
        }
        self.writer.submit(self.key.clone(), self.store.set().clone());
        self.saved_version = version;
    }
}
