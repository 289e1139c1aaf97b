use serde::{Deserialize, Serialize};

/// Tunables for hit-testing, gesture rejection and note sizing
///
/// Every field has a default, so partial config files stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Distance in pixels within which a touch counts as hitting an annotation
    pub hit_threshold: f32,
    /// Fewest distinct points a stroke needs to be kept, never less than 2
    pub min_stroke_points: usize,
    /// A new text box must be wider than this to be kept
    pub min_box_width: f32,
    /// A new text box must be taller than this to be kept
    pub min_box_height: f32,
    /// Resizing never shrinks a note below this width
    pub min_note_width: f32,
    /// Resizing never shrinks a note below this height
    pub min_note_height: f32,
    pub default_font_size: f32,
    /// When set, resizing a note's height rescales its font to `height * ratio`
    pub font_height_ratio: Option<f32>,
    pub default_stroke_width: f32,
    /// Side of the square grab area at a note's bottom-right corner
    pub resize_handle_size: f32,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            hit_threshold: 10.0,
            min_stroke_points: 2,
            min_box_width: 10.0,
            min_box_height: 10.0,
            min_note_width: 50.0,
            min_note_height: 20.0,
            default_font_size: 16.0,
            font_height_ratio: Some(0.4),
            default_stroke_width: 3.0,
            resize_handle_size: 24.0,
        }
    }
}

impl AnnotatorConfig {
    pub fn with_hit_threshold(mut self, threshold: f32) -> Self {
        self.hit_threshold = threshold;
        self
    }

    /// Whether a freshly drawn box is large enough to become a note
    pub fn accepts_box(&self, width: f32, height: f32) -> bool {
        width > self.min_box_width && height > self.min_box_height
    }
}
