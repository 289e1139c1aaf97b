//! Annotation data model
//!
//! Strokes and text notes for one document, plus the creation history used for
//! undo. Everything a document carries lives in a single [`AnnotationSet`] that
//! is loaded and saved as one unit.

use crate::color::Color;
use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// 1-based page number
pub type PageNumber = u32;

/// Page assumed for records that predate per-page annotations
pub const DEFAULT_PAGE: PageNumber = 1;

/// Unique identifier for a stroke or note
///
/// Stable across the entity's lifetime and persisted verbatim. Fresh ids are
/// UUID v4 strings; ids read from older records are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnnotationId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for AnnotationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A committed freehand line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: AnnotationId,
    pub points: Vec<Point>,
    pub color: Color,
    pub page: PageNumber,
    pub width: f32,
}

/// A positioned, resizable text box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNote {
    pub id: AnnotationId,
    pub content: String,
    pub bounds: Rect,
    pub color: Color,
    pub page: PageNumber,
    pub font_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryKind {
    Stroke,
    Text,
}

/// One creation, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub target: AnnotationId,
}

impl HistoryEntry {
    pub fn stroke(target: AnnotationId) -> Self {
        Self { kind: HistoryKind::Stroke, target }
    }

    pub fn text(target: AnnotationId) -> Self {
        Self { kind: HistoryKind::Text, target }
    }
}

/// All annotations of one document
///
/// Every stroke or note added through [`AnnotationSet::add_stroke`] or
/// [`AnnotationSet::add_note`] has exactly one history entry, and removing an
/// entity removes its entry too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    strokes: Vec<Stroke>,
    notes: Vec<TextNote>,
    history: Vec<HistoryEntry>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a set from decoded parts
    ///
    /// Later duplicates of an id are dropped and history entries without a live
    /// target, or of the wrong kind, are pruned.
    pub fn from_parts(
        strokes: Vec<Stroke>,
        notes: Vec<TextNote>,
        history: Vec<HistoryEntry>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut set = AnnotationSet::default();

        for stroke in strokes {
            if seen.insert(stroke.id.clone()) {
                set.strokes.push(stroke);
            } else {
                log::warn!("dropping stroke with duplicate id {}", stroke.id);
            }
        }
        for note in notes {
            if seen.insert(note.id.clone()) {
                set.notes.push(note);
            } else {
                log::warn!("dropping note with duplicate id {}", note.id);
            }
        }

        let mut recorded = HashSet::new();
        for entry in history {
            let live = match entry.kind {
                HistoryKind::Stroke => set.stroke(&entry.target).is_some(),
                HistoryKind::Text => set.note(&entry.target).is_some(),
            };
            if live && recorded.insert(entry.target.clone()) {
                set.history.push(entry);
            } else {
                log::debug!("pruning stale history entry for {}", entry.target);
            }
        }

        set
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn notes(&self) -> &[TextNote] {
        &self.notes
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn strokes_on(&self, page: PageNumber) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().filter(move |stroke| stroke.page == page)
    }

    pub fn notes_on(&self, page: PageNumber) -> impl Iterator<Item = &TextNote> {
        self.notes.iter().filter(move |note| note.page == page)
    }

    pub fn stroke(&self, id: &AnnotationId) -> Option<&Stroke> {
        self.strokes.iter().find(|stroke| &stroke.id == id)
    }

    pub fn note(&self, id: &AnnotationId) -> Option<&TextNote> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn note_mut(&mut self, id: &AnnotationId) -> Option<&mut TextNote> {
        self.notes.iter_mut().find(|note| &note.id == id)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.stroke(id).is_some() || self.note(id).is_some()
    }

    /// Append a stroke and its history entry
    pub fn add_stroke(&mut self, stroke: Stroke) -> &Stroke {
        self.history.push(HistoryEntry::stroke(stroke.id.clone()));
        self.strokes.push(stroke);
        &self.strokes[self.strokes.len() - 1]
    }

    /// Append a note and its history entry
    pub fn add_note(&mut self, note: TextNote) -> &TextNote {
        self.history.push(HistoryEntry::text(note.id.clone()));
        self.notes.push(note);
        &self.notes[self.notes.len() - 1]
    }

    pub fn remove_stroke(&mut self, id: &AnnotationId) -> Option<Stroke> {
        let index = self.strokes.iter().position(|stroke| &stroke.id == id)?;
        self.forget(id);
        Some(self.strokes.remove(index))
    }

    pub fn remove_note(&mut self, id: &AnnotationId) -> Option<TextNote> {
        let index = self.notes.iter().position(|note| &note.id == id)?;
        self.forget(id);
        Some(self.notes.remove(index))
    }

    /// Pop the most recent history entry without touching its target
    pub fn pop_history(&mut self) -> Option<HistoryEntry> {
        self.history.pop()
    }

    /// Drop history entries whose target no longer exists
    pub fn prune_history(&mut self) -> usize {
        let before = self.history.len();
        let strokes = &self.strokes;
        let notes = &self.notes;
        self.history.retain(|entry| match entry.kind {
            HistoryKind::Stroke => strokes.iter().any(|stroke| stroke.id == entry.target),
            HistoryKind::Text => notes.iter().any(|note| note.id == entry.target),
        });
        before - self.history.len()
    }

    /// Sorted page numbers that carry at least one annotation
    pub fn pages(&self) -> Vec<PageNumber> {
        let mut pages: Vec<PageNumber> = self
            .strokes
            .iter()
            .map(|stroke| stroke.page)
            .chain(self.notes.iter().map(|note| note.page))
            .collect();
        pages.sort_unstable();
        pages.dedup();
        pages
    }

    /// Number of strokes plus notes
    pub fn len(&self) -> usize {
        self.strokes.len() + self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.notes.is_empty() && self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.notes.clear();
        self.history.clear();
    }

    /// Structural equality ignoring stroke and note order
    ///
    /// History order is significant since it drives undo.
    pub fn same_content(&self, other: &AnnotationSet) -> bool {
        self.strokes.len() == other.strokes.len()
            && self.notes.len() == other.notes.len()
            && self.history == other.history
            && self.strokes.iter().all(|stroke| other.stroke(&stroke.id) == Some(stroke))
            && self.notes.iter().all(|note| other.note(&note.id) == Some(note))
    }

    fn forget(&mut self, id: &AnnotationId) {
        self.history.retain(|entry| &entry.target != id);
    }
}
