//! Annotation store
//!
//! Owns the canonical [`AnnotationSet`] of the open document. Gestures build
//! drafts that only become part of the set when committed; every committed
//! change bumps [`AnnotationStore::version`] so callers know when to persist
//! and re-render.

use crate::hit_test::{hits_at, HitTarget};
use doc_model::{
    AnnotationId, AnnotationSet, AnnotatorConfig, Color, HistoryEntry, HistoryKind, PageNumber,
    Point, Rect, Stroke, TextNote,
};
use std::collections::HashMap;

/// Handle to an uncommitted stroke or text box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DraftId(u64);

/// In-progress freehand stroke
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDraft {
    pub points: Vec<Point>,
    pub color: Color,
    pub page: PageNumber,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBoxPhase {
    /// The box is still being dragged out
    Sizing,
    /// The box is placed and waits for its text
    PendingContent,
}

/// In-progress text box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBoxDraft {
    pub rect: Rect,
    pub page: PageNumber,
    pub phase: TextBoxPhase,
}

/// Partial update of a text note; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextNotePatch {
    pub content: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub font_size: Option<f32>,
}

impl TextNotePatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    pub fn position(x: f32, y: f32) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    pub fn size(width: f32, height: f32) -> Self {
        Self { width: Some(width), height: Some(height), ..Self::default() }
    }
}

/// Ids removed by one erase call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraseOutcome {
    pub strokes: Vec<AnnotationId>,
    pub notes: Vec<AnnotationId>,
}

impl EraseOutcome {
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len() + self.notes.len()
    }

    /// Fold another outcome into this one
    pub fn merge(&mut self, other: EraseOutcome) {
        self.strokes.extend(other.strokes);
        self.notes.extend(other.notes);
    }
}

#[derive(Debug, Default)]
pub struct AnnotationStore {
    set: AnnotationSet,
    config: AnnotatorConfig,
    stroke_drafts: HashMap<DraftId, StrokeDraft>,
    text_drafts: HashMap<DraftId, TextBoxDraft>,
    next_draft: u64,
    version: u64,
    revision: u64,
}

impl AnnotationStore {
    pub fn new(config: AnnotatorConfig) -> Self {
        Self::with_set(AnnotationSet::new(), config)
    }

    /// Start from a previously loaded set
    pub fn with_set(set: AnnotationSet, config: AnnotatorConfig) -> Self {
        Self { set, config, ..Self::default() }
    }

    pub fn set(&self) -> &AnnotationSet {
        &self.set
    }

    pub fn into_set(self) -> AnnotationSet {
        self.set
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Counter bumped by every change to the committed set
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Counter bumped by every visible change, drafts included
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_drafts(&self) -> bool {
        !self.stroke_drafts.is_empty() || !self.text_drafts.is_empty()
    }

    pub fn draft_stroke(&self, draft: DraftId) -> Option<&StrokeDraft> {
        self.stroke_drafts.get(&draft)
    }

    pub fn draft_text_box(&self, draft: DraftId) -> Option<&TextBoxDraft> {
        self.text_drafts.get(&draft)
    }

    /// Drafts on `page`, oldest first
    pub fn stroke_drafts_on(&self, page: PageNumber) -> Vec<&StrokeDraft> {
        let mut drafts: Vec<(&DraftId, &StrokeDraft)> =
            self.stroke_drafts.iter().filter(|(_, draft)| draft.page == page).collect();
        drafts.sort_by_key(|(id, _)| **id);
        drafts.into_iter().map(|(_, draft)| draft).collect()
    }

    pub fn text_drafts_on(&self, page: PageNumber) -> Vec<&TextBoxDraft> {
        let mut drafts: Vec<(&DraftId, &TextBoxDraft)> =
            self.text_drafts.iter().filter(|(_, draft)| draft.page == page).collect();
        drafts.sort_by_key(|(id, _)| **id);
        drafts.into_iter().map(|(_, draft)| draft).collect()
    }

    /// Start a stroke draft; a non-finite first point starts it empty
    pub fn begin_stroke(&mut self, point: Point, color: Color, page: PageNumber) -> DraftId {
        let id = self.new_draft_id();
        let points = if point.is_finite() {
            vec![point]
        } else {
            log::debug!("dropping non-finite stroke point {point:?}");
            Vec::new()
        };
        let draft = StrokeDraft { points, color, page, width: self.config.default_stroke_width };
        self.stroke_drafts.insert(id, draft);
        self.touch_drafts();
        id
    }

    /// Append a point; repeated or non-finite points and unknown drafts are ignored
    pub fn extend_stroke(&mut self, draft: DraftId, point: Point) {
        let Some(stroke) = self.stroke_drafts.get_mut(&draft) else {
            return;
        };
        if !point.is_finite() {
            log::debug!("dropping non-finite stroke point {point:?}");
            return;
        }
        if stroke.points.last() == Some(&point) {
            return;
        }
        stroke.points.push(point);
        self.touch_drafts();
    }

    /// Turn a draft into a committed stroke with its own history entry
    ///
    /// Drafts with too few points are discarded and yield `None`.
    pub fn commit_stroke(&mut self, draft: DraftId) -> Option<Stroke> {
        let stroke = self.stroke_drafts.remove(&draft)?;
        self.touch_drafts();

        let min_points = self.config.min_stroke_points.max(2);
        if stroke.points.len() < min_points {
            log::debug!("discarding stroke draft with {} point(s)", stroke.points.len());
            return None;
        }

        let stroke = Stroke {
            id: AnnotationId::generate(),
            points: stroke.points,
            color: stroke.color,
            page: stroke.page,
            width: stroke.width,
        };
        let committed = self.set.add_stroke(stroke).clone();
        self.touch();
        Some(committed)
    }

    pub fn discard_stroke(&mut self, draft: DraftId) {
        if self.stroke_drafts.remove(&draft).is_some() {
            self.touch_drafts();
        }
    }

    /// Start sizing a text box; `rect` may have a negative extent
    ///
    /// A non-finite `rect` places an empty box that can never be committed.
    pub fn place_text_box(&mut self, rect: Rect, page: PageNumber) -> DraftId {
        let id = self.new_draft_id();
        let rect = if rect.is_finite() {
            rect
        } else {
            log::debug!("placing empty text box instead of {rect:?}");
            Rect::default()
        };
        self.text_drafts.insert(id, TextBoxDraft { rect, page, phase: TextBoxPhase::Sizing });
        self.touch_drafts();
        id
    }

    /// Update the box while it is being dragged out
    pub fn resize_text_box(&mut self, draft: DraftId, rect: Rect) {
        let Some(text_box) = self.text_drafts.get_mut(&draft) else {
            return;
        };
        if !rect.is_finite() {
            log::debug!("ignoring non-finite text box size {rect:?}");
            return;
        }
        if text_box.phase == TextBoxPhase::Sizing {
            text_box.rect = rect;
            self.touch_drafts();
        }
    }

    /// End sizing; boxes too small to tap are discarded and yield `false`
    pub fn finish_text_box(&mut self, draft: DraftId) -> bool {
        let Some(text_box) = self.text_drafts.get_mut(&draft) else {
            return false;
        };

        let rect = text_box.rect.normalized();
        if !self.config.accepts_box(rect.width, rect.height) {
            log::debug!("discarding {}x{} text box", rect.width, rect.height);
            self.text_drafts.remove(&draft);
            self.touch_drafts();
            return false;
        }

        text_box.rect = rect;
        text_box.phase = TextBoxPhase::PendingContent;
        self.touch_drafts();
        true
    }

    /// Commit the draft box with its text
    ///
    /// Returns `None` without touching the set when the box is too small or the
    /// text is blank. The draft is consumed either way.
    pub fn commit_text_note(
        &mut self,
        draft: DraftId,
        content: &str,
        color: Color,
        font_size: Option<f32>,
    ) -> Option<TextNote> {
        let text_box = self.text_drafts.remove(&draft)?;
        self.touch_drafts();

        let bounds = text_box.rect.normalized();
        if !self.config.accepts_box(bounds.width, bounds.height) {
            log::debug!("rejecting note for {}x{} box", bounds.width, bounds.height);
            return None;
        }
        if content.trim().is_empty() {
            log::debug!("rejecting note without text");
            return None;
        }

        let note = TextNote {
            id: AnnotationId::generate(),
            content: content.to_owned(),
            bounds,
            color,
            page: text_box.page,
            font_size: finite("font_size", font_size).unwrap_or(self.config.default_font_size),
        };
        let committed = self.set.add_note(note).clone();
        self.touch();
        Some(committed)
    }

    pub fn discard_text_box(&mut self, draft: DraftId) {
        if self.text_drafts.remove(&draft).is_some() {
            self.touch_drafts();
        }
    }

    /// Apply a partial update; size changes are clamped to the minimum note size
    ///
    /// A height change without an explicit font size rescales the font when
    /// `font_height_ratio` is configured. Non-finite fields are ignored.
    /// Unknown ids yield `None`.
    pub fn update_text_note(
        &mut self,
        id: &AnnotationId,
        patch: TextNotePatch,
    ) -> Option<TextNote> {
        let config = &self.config;
        let note = self.set.note_mut(id)?;
        let before = note.clone();
        let font_size = finite("font_size", patch.font_size);

        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(x) = finite("x", patch.x) {
            note.bounds.x = x;
        }
        if let Some(y) = finite("y", patch.y) {
            note.bounds.y = y;
        }
        if let Some(width) = finite("width", patch.width) {
            note.bounds.width = width.max(config.min_note_width);
        }
        if let Some(height) = finite("height", patch.height) {
            note.bounds.height = height.max(config.min_note_height);
            if let (None, Some(ratio)) = (font_size, config.font_height_ratio) {
                note.font_size = note.bounds.height * ratio;
            }
        }
        if let Some(font_size) = font_size {
            note.font_size = font_size;
        }

        let updated = note.clone();
        if updated != before {
            self.touch();
        }
        Some(updated)
    }

    pub fn delete_text_note(&mut self, id: &AnnotationId) -> Option<TextNote> {
        let removed = self.set.remove_note(id)?;
        self.touch();
        Some(removed)
    }

    /// Remove every stroke and note on `page` touched by any of `points`
    pub fn erase_at(&mut self, points: &[Point], page: PageNumber) -> EraseOutcome {
        let mut outcome = EraseOutcome::default();
        for hit in hits_at(&self.set, page, points, self.config.hit_threshold) {
            match hit {
                HitTarget::Stroke(id) => {
                    if self.set.remove_stroke(&id).is_some() {
                        outcome.strokes.push(id);
                    }
                }
                HitTarget::Note(id) => {
                    if self.set.remove_note(&id).is_some() {
                        outcome.notes.push(id);
                    }
                }
            }
        }

        if !outcome.is_empty() {
            log::debug!("erased {} annotation(s) on page {page}", outcome.len());
            self.touch();
        }
        outcome
    }

    /// Remove the most recently created annotation that still exists
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.set.pop_history()?;
        match entry.kind {
            HistoryKind::Stroke => {
                self.set.remove_stroke(&entry.target);
            }
            HistoryKind::Text => {
                self.set.remove_note(&entry.target);
            }
        }
        self.touch();
        Some(entry)
    }

    /// Remove all annotations and drafts
    pub fn clear(&mut self) {
        let had_drafts = self.has_drafts();
        self.stroke_drafts.clear();
        self.text_drafts.clear();
        if had_drafts {
            self.touch_drafts();
        }
        if !self.set.is_empty() {
            self.set.clear();
            self.touch();
        }
    }

    fn new_draft_id(&mut self) -> DraftId {
        self.next_draft += 1;
        DraftId(self.next_draft)
    }

    fn touch(&mut self) {
        self.version += 1;
        self.revision += 1;
    }

    fn touch_drafts(&mut self) {
        self.revision += 1;
    }
}

/// `value` unless it is NaN or infinite
fn finite(field: &str, value: Option<f32>) -> Option<f32> {
    match value {
        Some(value) if !value.is_finite() => {
            log::debug!("ignoring non-finite {field} {value}");
            None
        }
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AnnotationStore {
        AnnotationStore::new(AnnotatorConfig::default())
    }

    fn draw(
        store: &mut AnnotationStore,
        page: PageNumber,
        points: &[(f32, f32)],
    ) -> Option<Stroke> {
        let (first, rest) = points.split_first()?;
        let draft = store.begin_stroke(Point::new(first.0, first.1), Color::RED, page);
        for &(x, y) in rest {
            store.extend_stroke(draft, Point::new(x, y));
        }
        store.commit_stroke(draft)
    }

    fn write_note(
        store: &mut AnnotationStore,
        rect: Rect,
        page: PageNumber,
        text: &str,
    ) -> Option<TextNote> {
        let draft = store.place_text_box(rect, page);
        store.commit_text_note(draft, text, Color::BLACK, None)
    }

    #[test]
    fn draw_then_undo_leaves_nothing() {
        let mut store = store();
        let stroke =
            draw(&mut store, 1, &[(10.0, 10.0), (20.0, 20.0)]).expect("stroke should commit");

        assert_eq!(stroke.points, vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)]);
        assert_eq!(store.set().strokes().len(), 1);
        assert_eq!(store.set().history().len(), 1);

        store.undo();
        assert!(store.set().strokes().is_empty());
        assert!(store.set().history().is_empty());
    }

    #[test]
    fn non_finite_points_never_reach_the_set() {
        let mut store = store();
        for row in 0..3 {
            let y = row as f32 * 40.0;
            assert!(draw(&mut store, 1, &[(0.0, y), (50.0, y)]).is_some());
        }

        assert!(draw(&mut store, 1, &[(f32::NAN, 400.0), (10.0, 400.0)]).is_none());
        let stroke = draw(&mut store, 1, &[(0.0, 500.0), (f32::INFINITY, 500.0), (20.0, 500.0)])
            .expect("finite samples should still commit");
        assert_eq!(stroke.points, vec![Point::new(0.0, 500.0), Point::new(20.0, 500.0)]);

        assert_eq!(store.set().strokes().len(), 4);
        assert!(store.set().strokes().iter().flat_map(|s| &s.points).all(Point::is_finite));
    }

    #[test]
    fn non_finite_text_geometry_is_ignored() {
        let mut store = store();
        assert!(write_note(&mut store, Rect::new(f32::NAN, 0.0, 100.0, 40.0), 1, "x").is_none());

        let draft = store.place_text_box(Rect::new(0.0, 0.0, 10.0, 10.0), 1);
        store.resize_text_box(draft, Rect::new(0.0, 0.0, f32::INFINITY, 40.0));
        store.resize_text_box(draft, Rect::new(0.0, 0.0, 100.0, 40.0));
        assert!(store.finish_text_box(draft));
        let note = store
            .commit_text_note(draft, "kept", Color::BLACK, Some(f32::NAN))
            .expect("note should commit");
        assert_eq!(note.font_size, store.config().default_font_size);

        let version = store.version();
        let patch = TextNotePatch {
            x: Some(f32::NAN),
            height: Some(f32::NEG_INFINITY),
            font_size: Some(f32::INFINITY),
            ..TextNotePatch::default()
        };
        let unchanged = store.update_text_note(&note.id, patch).expect("note should exist");
        assert_eq!(unchanged, note);
        assert_eq!(store.version(), version);
    }

    #[test]
    fn undo_removes_only_latest_creation() {
        let mut store = store();
        let first = draw(&mut store, 1, &[(0.0, 0.0), (5.0, 5.0)]).unwrap();
        let note = write_note(&mut store, Rect::new(0.0, 0.0, 80.0, 40.0), 1, "hi").unwrap();

        let entry = store.undo().expect("history should not be empty");
        assert_eq!(entry, HistoryEntry::text(note.id));
        assert_eq!(store.set().strokes(), &[first]);
        assert!(store.set().notes().is_empty());
        assert_eq!(store.set().history().len(), 1);
    }

    #[test]
    fn undo_on_empty_history_is_noop() {
        let mut store = store();
        assert_eq!(store.undo(), None);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn degenerate_strokes_are_discarded() {
        let mut store = store();
        assert!(draw(&mut store, 1, &[(10.0, 10.0)]).is_none());
        // A tap repeats the same point, which does not count as a second sample
        assert!(draw(&mut store, 1, &[(10.0, 10.0), (10.0, 10.0)]).is_none());

        assert!(store.set().is_empty());
        assert!(!store.has_drafts());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn extending_unknown_draft_is_ignored() {
        let mut store = store();
        let draft = store.begin_stroke(Point::new(0.0, 0.0), Color::RED, 1);
        store.discard_stroke(draft);
        store.extend_stroke(draft, Point::new(1.0, 1.0));
        assert_eq!(store.commit_stroke(draft), None);
    }

    #[test]
    fn tiny_text_box_is_rejected() {
        let mut store = store();
        let note = write_note(&mut store, Rect::new(0.0, 0.0, 3.0, 3.0), 1, "hello");

        assert!(note.is_none());
        assert!(store.set().notes().is_empty());
        assert!(!store.has_drafts());
    }

    #[test]
    fn blank_text_is_rejected() {
        let mut store = store();
        assert!(write_note(&mut store, Rect::new(0.0, 0.0, 80.0, 40.0), 1, "   ").is_none());
        assert!(store.set().notes().is_empty());
    }

    #[test]
    fn text_box_dragged_up_left_is_normalized() {
        let mut store = store();
        let draft = store.place_text_box(Rect::new(100.0, 100.0, 0.0, 0.0), 2);
        store.resize_text_box(draft, Rect::new(100.0, 100.0, -60.0, -30.0));
        assert!(store.finish_text_box(draft));
        let phase = store.draft_text_box(draft).map(|b| b.phase);
        assert_eq!(phase, Some(TextBoxPhase::PendingContent));

        // Sizing is over, further drags do nothing
        store.resize_text_box(draft, Rect::new(0.0, 0.0, 5.0, 5.0));

        let note = store.commit_text_note(draft, "note", Color::BLUE, Some(12.0)).unwrap();
        assert_eq!(note.bounds, Rect::new(40.0, 70.0, 60.0, 30.0));
        assert_eq!(note.font_size, 12.0);
        assert_eq!(note.page, 2);
    }

    #[test]
    fn finishing_too_small_box_discards_it() {
        let mut store = store();
        let draft = store.place_text_box(Rect::new(0.0, 0.0, 8.0, 40.0), 1);
        assert!(!store.finish_text_box(draft));
        assert!(store.draft_text_box(draft).is_none());
    }

    #[test]
    fn resize_clamps_to_minimum_and_rescales_font() {
        let mut store = store();
        let note = write_note(&mut store, Rect::new(0.0, 0.0, 120.0, 60.0), 1, "text").unwrap();

        let updated = store.update_text_note(&note.id, TextNotePatch::size(10.0, 5.0)).unwrap();
        assert_eq!(updated.bounds.width, 50.0);
        assert_eq!(updated.bounds.height, 20.0);
        assert!((updated.font_size - 8.0).abs() < 1e-4);

        let patch =
            TextNotePatch { height: Some(100.0), font_size: Some(30.0), ..Default::default() };
        let updated = store.update_text_note(&note.id, patch).unwrap();
        assert_eq!(updated.font_size, 30.0);
    }

    #[test]
    fn move_and_edit_keep_identity() {
        let mut store = store();
        let note = write_note(&mut store, Rect::new(0.0, 0.0, 120.0, 60.0), 1, "draft").unwrap();
        let version = store.version();

        store.update_text_note(&note.id, TextNotePatch::position(30.0, 40.0));
        let edited = store.update_text_note(&note.id, TextNotePatch::content("final")).unwrap();

        assert_eq!(edited.id, note.id);
        assert_eq!(edited.bounds.origin(), Point::new(30.0, 40.0));
        assert_eq!(edited.content, "final");
        assert_eq!(store.version(), version + 2);
        assert_eq!(store.set().history().len(), 1);
    }

    #[test]
    fn noop_patch_does_not_bump_version() {
        let mut store = store();
        let note = write_note(&mut store, Rect::new(0.0, 0.0, 120.0, 60.0), 1, "same").unwrap();
        let version = store.version();

        store.update_text_note(&note.id, TextNotePatch::content("same"));
        assert_eq!(store.version(), version);
        assert!(store.update_text_note(&"missing".into(), TextNotePatch::content("x")).is_none());
    }

    #[test]
    fn erase_removes_touched_note_only() {
        let mut store = store();
        let note =
            write_note(&mut store, Rect::new(100.0, 100.0, 50.0, 20.0), 1, "target").unwrap();

        let missed = store.erase_at(&[Point::new(500.0, 500.0)], 1);
        assert!(missed.is_empty());
        assert_eq!(store.set().notes().len(), 1);

        let hit = store.erase_at(&[Point::new(105.0, 105.0)], 1);
        assert_eq!(hit.notes, vec![note.id]);
        assert!(store.set().notes().is_empty());
    }

    #[test]
    fn erase_is_bulk_and_page_scoped() {
        let mut store = store();
        draw(&mut store, 1, &[(0.0, 0.0), (100.0, 0.0)]).unwrap();
        draw(&mut store, 1, &[(0.0, 50.0), (100.0, 50.0)]).unwrap();
        let other_page = draw(&mut store, 2, &[(0.0, 0.0), (100.0, 0.0)]).unwrap();

        let outcome = store.erase_at(&[Point::new(50.0, 2.0), Point::new(50.0, 48.0)], 1);
        assert_eq!(outcome.strokes.len(), 2);
        assert_eq!(store.set().strokes(), &[other_page]);
    }

    #[test]
    fn erase_prunes_history_so_undo_targets_previous_item() {
        let mut store = store();
        let kept = draw(&mut store, 1, &[(0.0, 0.0), (10.0, 0.0)]).unwrap();
        draw(&mut store, 1, &[(0.0, 300.0), (10.0, 300.0)]).unwrap();

        store.erase_at(&[Point::new(5.0, 300.0)], 1);
        assert_eq!(store.set().history(), &[HistoryEntry::stroke(kept.id.clone())]);

        store.undo();
        assert!(store.set().strokes().is_empty());
        assert!(store.set().history().is_empty());
    }

    #[test]
    fn delete_removes_note_and_history() {
        let mut store = store();
        let note = write_note(&mut store, Rect::new(0.0, 0.0, 80.0, 40.0), 1, "bye").unwrap();

        assert_eq!(store.delete_text_note(&note.id).map(|n| n.id), Some(note.id.clone()));
        assert!(store.set().history().is_empty());
        assert!(store.delete_text_note(&note.id).is_none());
    }

    #[test]
    fn drafts_bump_revision_but_not_version() {
        let mut store = store();
        let draft = store.begin_stroke(Point::new(0.0, 0.0), Color::RED, 1);
        store.extend_stroke(draft, Point::new(1.0, 1.0));

        assert_eq!(store.version(), 0);
        assert!(store.revision() >= 2);
        assert_eq!(store.stroke_drafts_on(1).len(), 1);
        assert!(store.stroke_drafts_on(2).is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut store = store();
        draw(&mut store, 1, &[(0.0, 0.0), (10.0, 0.0)]).unwrap();
        store.place_text_box(Rect::new(0.0, 0.0, 40.0, 40.0), 1);

        store.clear();
        assert!(store.set().is_empty());
        assert!(!store.has_drafts());
    }
}
