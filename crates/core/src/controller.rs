//! Gesture interpretation
//!
//! Turns abstract begin/update/end/tap events into store operations according
//! to the active mode. The controller holds only gesture bookkeeping (current
//! page, in-progress draft, pending text entry); all annotation state lives in
//! the [`AnnotationStore`] passed into each call.

use crate::hit_test::{note_at, resize_handle_at};
use crate::store::{AnnotationStore, DraftId, EraseOutcome, TextNotePatch};
use doc_model::{AnnotationId, Color, PageNumber, Point, Rect, Stroke, TextNote, DEFAULT_PAGE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureMode {
    #[default]
    Draw,
    Text,
    Erase,
    Select,
}

/// Result of finishing a drag
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// No gesture was in progress, or a select drag started on empty space
    Idle,
    StrokeCommitted(Stroke),
    /// The stroke had too few points
    StrokeDiscarded,
    /// A text box was placed and now waits for [`InteractionController::confirm_text`]
    AwaitingText(DraftId),
    /// The dragged box was too small
    TextBoxDiscarded,
    Erased(EraseOutcome),
    NoteMoved(TextNote),
    NoteResized(TextNote),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    Nothing,
    Erased(EraseOutcome),
    /// The tapped note is now pending an edit
    EditRequested(TextNote),
}

#[derive(Debug, Clone, PartialEq)]
enum ActiveGesture {
    Drawing(DraftId),
    Sizing { draft: DraftId, anchor: Point },
    Erasing(EraseOutcome),
    Moving { note: AnnotationId, grab_dx: f32, grab_dy: f32 },
    Resizing { note: AnnotationId },
}

#[derive(Debug, Clone, PartialEq)]
enum PendingText {
    NewBox(DraftId),
    Existing(AnnotationId),
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    page: PageNumber,
    mode: GestureMode,
    color: Color,
    active: Option<ActiveGesture>,
    pending: Option<PendingText>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE)
    }
}

impl InteractionController {
    pub fn new(page: PageNumber) -> Self {
        Self {
            page: page.max(DEFAULT_PAGE),
            mode: GestureMode::default(),
            color: Color::default(),
            active: None,
            pending: None,
        }
    }

    pub fn page(&self) -> PageNumber {
        self.page
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_mode(&mut self, mode: GestureMode) {
        self.mode = mode;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn is_gesture_active(&self) -> bool {
        self.active.is_some()
    }

    /// Whether a new box or an existing note waits for text
    pub fn is_awaiting_text(&self) -> bool {
        self.pending.is_some()
    }

    /// The existing note currently being edited, if any
    pub fn editing(&self) -> Option<&AnnotationId> {
        match &self.pending {
            Some(PendingText::Existing(id)) => Some(id),
            _ => None,
        }
    }

    pub fn on_gesture_begin(
        &mut self,
        store: &mut AnnotationStore,
        point: Point,
        mode: GestureMode,
        color: Color,
    ) {
        if self.active.is_some() {
            log::debug!("gesture began while another was active, cancelling the old one");
            self.cancel_gesture(store);
        }
        self.mode = mode;
        self.color = color;

        let page = self.page;
        self.active = match mode {
            GestureMode::Draw => {
                Some(ActiveGesture::Drawing(store.begin_stroke(point, color, page)))
            }
            GestureMode::Text => {
                // A new box replaces one still waiting for text
                self.discard_pending(store);
                let draft = store.place_text_box(Rect::from_corners(point, point), page);
                Some(ActiveGesture::Sizing { draft, anchor: point })
            }
            GestureMode::Erase => Some(ActiveGesture::Erasing(store.erase_at(&[point], page))),
            GestureMode::Select => grab_note(store, page, point),
        };
    }

    pub fn on_gesture_update(&mut self, store: &mut AnnotationStore, point: Point) {
        let page = self.page;
        let Some(active) = self.active.as_mut() else {
            return;
        };

        match active {
            ActiveGesture::Drawing(draft) => store.extend_stroke(*draft, point),
            ActiveGesture::Sizing { draft, anchor } => {
                store.resize_text_box(*draft, Rect::from_corners(*anchor, point));
            }
            ActiveGesture::Erasing(outcome) => outcome.merge(store.erase_at(&[point], page)),
            ActiveGesture::Moving { note, grab_dx, grab_dy } => {
                let patch = TextNotePatch::position(point.x - *grab_dx, point.y - *grab_dy);
                store.update_text_note(note, patch);
            }
            ActiveGesture::Resizing { note } => {
                if let Some(origin) = store.set().note(note).map(|n| n.bounds.origin()) {
                    let patch = TextNotePatch::size(point.x - origin.x, point.y - origin.y);
                    store.update_text_note(note, patch);
                }
            }
        }
    }

    pub fn on_gesture_end(&mut self, store: &mut AnnotationStore) -> GestureOutcome {
        let Some(active) = self.active.take() else {
            return GestureOutcome::Idle;
        };

        match active {
            ActiveGesture::Drawing(draft) => match store.commit_stroke(draft) {
                Some(stroke) => GestureOutcome::StrokeCommitted(stroke),
                None => GestureOutcome::StrokeDiscarded,
            },
            ActiveGesture::Sizing { draft, .. } => {
                if store.finish_text_box(draft) {
                    self.pending = Some(PendingText::NewBox(draft));
                    GestureOutcome::AwaitingText(draft)
                } else {
                    GestureOutcome::TextBoxDiscarded
                }
            }
            ActiveGesture::Erasing(outcome) => GestureOutcome::Erased(outcome),
            ActiveGesture::Moving { note, .. } => store
                .set()
                .note(&note)
                .cloned()
                .map_or(GestureOutcome::Idle, GestureOutcome::NoteMoved),
            ActiveGesture::Resizing { note } => store
                .set()
                .note(&note)
                .cloned()
                .map_or(GestureOutcome::Idle, GestureOutcome::NoteResized),
        }
    }

    /// Single-point interaction: erase in erase mode, open a note for editing otherwise
    pub fn on_tap(&mut self, store: &mut AnnotationStore, point: Point) -> TapOutcome {
        match self.mode {
            GestureMode::Erase => {
                let outcome = store.erase_at(&[point], self.page);
                if outcome.is_empty() {
                    TapOutcome::Nothing
                } else {
                    TapOutcome::Erased(outcome)
                }
            }
            GestureMode::Select | GestureMode::Text => {
                let threshold = store.config().hit_threshold;
                let Some(note) = note_at(store.set(), self.page, point, threshold).cloned() else {
                    return TapOutcome::Nothing;
                };
                self.discard_pending(store);
                self.pending = Some(PendingText::Existing(note.id.clone()));
                TapOutcome::EditRequested(note)
            }
            GestureMode::Draw => TapOutcome::Nothing,
        }
    }

    /// Open an existing note for editing; unknown ids yield `None`
    pub fn on_edit_request(
        &mut self,
        store: &mut AnnotationStore,
        id: &AnnotationId,
    ) -> Option<TextNote> {
        let note = store.set().note(id).cloned()?;
        self.discard_pending(store);
        self.pending = Some(PendingText::Existing(note.id.clone()));
        Some(note)
    }

    /// Supply text for the pending box or note
    ///
    /// A new box commits only with non-blank text. For an existing note blank
    /// text leaves the note unchanged; deleting is a separate request.
    pub fn confirm_text(&mut self, store: &mut AnnotationStore, content: &str) -> Option<TextNote> {
        match self.pending.take()? {
            PendingText::NewBox(draft) => store.commit_text_note(draft, content, self.color, None),
            PendingText::Existing(id) => {
                if content.trim().is_empty() {
                    store.set().note(&id).cloned()
                } else {
                    store.update_text_note(&id, TextNotePatch::content(content))
                }
            }
        }
    }

    pub fn on_delete_request(
        &mut self,
        store: &mut AnnotationStore,
        id: &AnnotationId,
    ) -> Option<TextNote> {
        if self.editing() == Some(id) {
            self.pending = None;
        }
        let holds_note = matches!(
            &self.active,
            Some(ActiveGesture::Moving { note, .. } | ActiveGesture::Resizing { note })
                if note == id
        );
        if holds_note {
            self.active = None;
        }
        store.delete_text_note(id)
    }

    /// Abandon the in-progress gesture and any pending text entry
    ///
    /// Erase, move and resize apply as they go, so only drafts are rolled back.
    pub fn cancel(&mut self, store: &mut AnnotationStore) {
        self.cancel_gesture(store);
        self.discard_pending(store);
    }

    /// Switch pages, cancelling whatever was in progress on the old one
    pub fn set_page(&mut self, store: &mut AnnotationStore, page: PageNumber) {
        let page = page.max(DEFAULT_PAGE);
        if page != self.page {
            self.cancel(store);
            self.page = page;
        }
    }

    fn cancel_gesture(&mut self, store: &mut AnnotationStore) {
        match self.active.take() {
            Some(ActiveGesture::Drawing(draft)) => store.discard_stroke(draft),
            Some(ActiveGesture::Sizing { draft, .. }) => store.discard_text_box(draft),
            _ => {}
        }
    }

    fn discard_pending(&mut self, store: &mut AnnotationStore) {
        if let Some(PendingText::NewBox(draft)) = self.pending.take() {
            store.discard_text_box(draft);
        }
    }
}

/// Start a move or resize of the note under `point`
fn grab_note(store: &AnnotationStore, page: PageNumber, point: Point) -> Option<ActiveGesture> {
    let config = store.config();
    let note = note_at(store.set(), page, point, config.hit_threshold)?;

    if resize_handle_at(note, point, config.resize_handle_size) {
        Some(ActiveGesture::Resizing { note: note.id.clone() })
    } else {
        Some(ActiveGesture::Moving {
            note: note.id.clone(),
            grab_dx: point.x - note.bounds.x,
            grab_dy: point.y - note.bounds.y,
        })
    }
}
