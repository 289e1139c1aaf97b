//! Inkleaf Core Library
//!
//! Annotation editing for an open PDF document: the in-memory store with its
//! drafts and undo history, hit-testing, gesture interpretation and the
//! per-page render projection. Persistence goes through the `storage` crate.

pub mod controller;
pub mod hit_test;
pub mod projection;
pub mod session;
pub mod store;

pub use controller::{GestureMode, GestureOutcome, InteractionController, TapOutcome};
pub use hit_test::{
    hits_at, note_at, rect_contains_point, resize_handle_at, stroke_contains_point, HitTarget,
};
pub use projection::{DraftView, NoteView, PageProjection, ProjectionCache, StrokeView};
pub use session::{DocumentSession, SessionError};
pub use store::{
    AnnotationStore, DraftId, EraseOutcome, StrokeDraft, TextBoxDraft, TextBoxPhase, TextNotePatch,
};
