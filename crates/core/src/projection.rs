//! Read-only per-page view of the store for renderers

use crate::store::AnnotationStore;
use doc_model::{AnnotationId, Color, PageNumber, Point, Rect};
use serde::Serialize;
use storage::path_codec;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeView {
    pub id: AnnotationId,
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f32,
}

impl StrokeView {
    /// Path string in `M x,y L x,y` form
    pub fn path_data(&self) -> String {
        path_codec::encode(&self.points)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteView {
    pub id: AnnotationId,
    pub bounds: Rect,
    pub label: String,
    pub color: Color,
    pub font_size: f32,
}

/// Uncommitted geometry drawn on top of the committed annotations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftView {
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageProjection {
    pub page: PageNumber,
    pub version: u64,
    pub strokes: Vec<StrokeView>,
    pub notes: Vec<NoteView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub draft_strokes: Vec<DraftView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub draft_boxes: Vec<Rect>,
}

impl PageProjection {
    pub fn build(store: &AnnotationStore, page: PageNumber) -> Self {
        let set = store.set();

        let strokes = set
            .strokes_on(page)
            .map(|stroke| StrokeView {
                id: stroke.id.clone(),
                points: stroke.points.clone(),
                color: stroke.color,
                width: stroke.width,
            })
            .collect();

        let notes = set
            .notes_on(page)
            .map(|note| NoteView {
                id: note.id.clone(),
                bounds: note.bounds,
                label: note.content.clone(),
                color: note.color,
                font_size: note.font_size,
            })
            .collect();

        let draft_strokes = store
            .stroke_drafts_on(page)
            .into_iter()
            .map(|draft| DraftView {
                points: draft.points.clone(),
                color: draft.color,
                width: draft.width,
            })
            .collect();

        let draft_boxes =
            store.text_drafts_on(page).into_iter().map(|draft| draft.rect.normalized()).collect();

        Self { page, version: store.version(), strokes, notes, draft_strokes, draft_boxes }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
            && self.notes.is_empty()
            && self.draft_strokes.is_empty()
            && self.draft_boxes.is_empty()
    }
}

/// Keeps the last projection and rebuilds it only when the store or page changed
#[derive(Debug, Default)]
pub struct ProjectionCache {
    cached: Option<(u64, PageProjection)>,
    rebuilds: u64,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, store: &AnnotationStore, page: PageNumber) -> &PageProjection {
        let revision = store.revision();
        let fresh = matches!(
            &self.cached,
            Some((cached_revision, projection))
                if *cached_revision == revision && projection.page == page
        );
        if !fresh {
            self.cached = None;
            self.rebuilds += 1;
        }

        let (_, projection) =
            self.cached.get_or_insert_with(|| (revision, PageProjection::build(store, page)));
        projection
    }

    /// Number of times a projection has been built
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
