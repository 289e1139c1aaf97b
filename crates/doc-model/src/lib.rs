//! Data model shared by the annotation engine, persistence and the CLI.
//!
//! Geometry primitives, strokes and text notes, the per-document
//! [`AnnotationSet`], annotator tunables and the document library tree.

pub mod annotation;
pub mod color;
pub mod config;
pub mod geometry;
pub mod library;

pub use annotation::{
    AnnotationId, AnnotationSet, HistoryEntry, HistoryKind, PageNumber, Stroke, TextNote,
    DEFAULT_PAGE,
};
pub use color::{Color, ColorParseError};
pub use config::AnnotatorConfig;
pub use geometry::{bounding_rect, distance, distance_to_segment, Point, Rect};
pub use library::{
    apply_library_action, FileEntry, FileId, FileKind, Folder, FolderId, LibraryAction,
    LibraryError, LibraryOutcome, LibraryTree, SortOrder,
};
