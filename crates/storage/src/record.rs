//! On-disk annotation record.
//!
//! The record keeps the field names older clients wrote (`texts`, `fontSize`,
//! `"type": "path"`) so existing files keep loading. Fields added over time are
//! optional and fall back to defaults when absent. An entry that fails to
//! decode is skipped on its own instead of failing the whole record.

use crate::path_codec;
use doc_model::{
    AnnotatorConfig, AnnotationId, AnnotationSet, Color, HistoryEntry, HistoryKind, PageNumber,
    Point, Rect, Stroke, TextNote, DEFAULT_PAGE,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Version written by this crate; records without a version are legacy (0)
pub const RECORD_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default)]
    pub version: u32,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub strokes: Vec<StrokeRecord>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub texts: Vec<TextRecord>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub history: Vec<HistoryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    /// Legacy encoding, see [`path_codec`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_page")]
    pub page: PageNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_page")]
    pub page: PageNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "type")]
    pub kind: HistoryRecordKind,
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRecordKind {
    #[serde(rename = "path", alias = "stroke")]
    Path,
    #[serde(rename = "text")]
    Text,
}

/// Values substituted for fields older records leave out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordDefaults {
    pub font_size: f32,
    pub stroke_width: f32,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self::from(&AnnotatorConfig::default())
    }
}

impl From<&AnnotatorConfig> for RecordDefaults {
    fn from(config: &AnnotatorConfig) -> Self {
        Self { font_size: config.default_font_size, stroke_width: config.default_stroke_width }
    }
}

impl AnnotationRecord {
    pub fn from_set(set: &AnnotationSet) -> Self {
        let strokes = set
            .strokes()
            .iter()
            .map(|stroke| StrokeRecord {
                id: stroke.id.to_string(),
                points: Some(stroke.points.clone()),
                path: None,
                color: stroke.color,
                page: stroke.page,
                width: Some(stroke.width),
            })
            .collect();

        let texts = set
            .notes()
            .iter()
            .map(|note| TextRecord {
                id: note.id.to_string(),
                text: note.content.clone(),
                x: note.bounds.x,
                y: note.bounds.y,
                width: note.bounds.width,
                height: note.bounds.height,
                color: note.color,
                page: note.page,
                font_size: Some(note.font_size),
            })
            .collect();

        let history = set
            .history()
            .iter()
            .map(|entry| HistoryRecord {
                kind: match entry.kind {
                    HistoryKind::Stroke => HistoryRecordKind::Path,
                    HistoryKind::Text => HistoryRecordKind::Text,
                },
                id: entry.target.to_string(),
            })
            .collect();

        Self { version: RECORD_VERSION, strokes, texts, history }
    }

    /// Convert into the in-memory model
    ///
    /// Strokes whose geometry cannot be decoded or has fewer than two points
    /// are dropped, as are duplicate ids and history entries without a target.
    pub fn into_set(self, defaults: RecordDefaults) -> AnnotationSet {
        let strokes = self
            .strokes
            .into_iter()
            .filter_map(|record| stroke_from_record(record, defaults))
            .collect();

        let notes = self
            .texts
            .into_iter()
            .map(|record| TextNote {
                id: AnnotationId::from(record.id),
                content: record.text,
                bounds: Rect::new(record.x, record.y, record.width, record.height).normalized(),
                color: record.color,
                page: record.page,
                font_size: record.font_size.unwrap_or(defaults.font_size),
            })
            .collect();

        let history = self
            .history
            .into_iter()
            .map(|record| HistoryEntry {
                kind: match record.kind {
                    HistoryRecordKind::Path => HistoryKind::Stroke,
                    HistoryRecordKind::Text => HistoryKind::Text,
                },
                target: AnnotationId::from(record.id),
            })
            .collect();

        AnnotationSet::from_parts(strokes, notes, history)
    }
}

fn stroke_from_record(record: StrokeRecord, defaults: RecordDefaults) -> Option<Stroke> {
    let points = match (record.points, record.path) {
        (Some(points), _) => points,
        (None, Some(path)) => match path_codec::decode(&path) {
            Ok(points) => points,
            Err(err) => {
                log::warn!("dropping stroke {}: {err}", record.id);
                return None;
            }
        },
        (None, None) => Vec::new(),
    };

    if points.len() < 2 {
        log::warn!("dropping stroke {} with {} point(s)", record.id, points.len());
        return None;
    }

    Some(Stroke {
        id: AnnotationId::from(record.id),
        points,
        color: record.color,
        page: record.page,
        width: record.width.unwrap_or(defaults.stroke_width),
    })
}

fn default_page() -> PageNumber {
    DEFAULT_PAGE
}

fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let decoded = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                log::warn!("skipping unreadable {}: {err}", std::any::type_name::<T>());
                None
            }
        })
        .collect();
    Ok(decoded)
}

/// Ids were numeric timestamps in some older records
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid annotation id: {other}"))),
    }
}
