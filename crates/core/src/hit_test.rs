//! Hit testing for erasing and selection
//!
//! Strokes are tested against every segment of their polyline, not only the
//! sampled vertices, so long straight segments between sparse samples still
//! register. Notes are tested against their box padded by the threshold.

use doc_model::{
    distance_to_segment, AnnotationId, AnnotationSet, PageNumber, Point, Rect, Stroke, TextNote,
};

/// An annotation hit by a touch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HitTarget {
    Stroke(AnnotationId),
    Note(AnnotationId),
}

impl HitTarget {
    pub fn id(&self) -> &AnnotationId {
        match self {
            HitTarget::Stroke(id) | HitTarget::Note(id) => id,
        }
    }
}

/// Whether `point` lies closer than `threshold` to the stroke's path
pub fn stroke_contains_point(stroke: &Stroke, point: Point, threshold: f32) -> bool {
    match stroke.points.as_slice() {
        [] => false,
        [only] => only.distance_to(&point) < threshold,
        points => points
            .windows(2)
            .any(|pair| distance_to_segment(point, pair[0], pair[1]) < threshold),
    }
}

/// Whether `point` lies inside `rect` padded by `threshold` on every side
pub fn rect_contains_point(rect: &Rect, point: Point, threshold: f32) -> bool {
    rect.normalized().expand(threshold).contains(point)
}

/// Every annotation on `page` hit by any of `points`, each reported once
///
/// Strokes come first, then notes, both in set order.
pub fn hits_at(
    set: &AnnotationSet,
    page: PageNumber,
    points: &[Point],
    threshold: f32,
) -> Vec<HitTarget> {
    let strokes = set
        .strokes_on(page)
        .filter(|stroke| {
            points.iter().any(|&point| stroke_contains_point(stroke, point, threshold))
        })
        .map(|stroke| HitTarget::Stroke(stroke.id.clone()));

    let notes = set
        .notes_on(page)
        .filter(|note| {
            points.iter().any(|&point| rect_contains_point(&note.bounds, point, threshold))
        })
        .map(|note| HitTarget::Note(note.id.clone()));

    strokes.chain(notes).collect()
}

/// Topmost note on `page` under `point`
///
/// Notes created later draw on top, so the last match wins.
pub fn note_at(
    set: &AnnotationSet,
    page: PageNumber,
    point: Point,
    threshold: f32,
) -> Option<&TextNote> {
    set.notes_on(page).filter(|note| rect_contains_point(&note.bounds, point, threshold)).last()
}

/// Whether `point` grabs the resize handle at the note's bottom-right corner
pub fn resize_handle_at(note: &TextNote, point: Point, handle_size: f32) -> bool {
    let corner = note.bounds.normalized().bottom_right();
    let half = handle_size / 2.0;
    Rect::new(corner.x - half, corner.y - half, handle_size, handle_size).contains(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::Color;

    fn stroke(id: &str, page: PageNumber, points: &[(f32, f32)]) -> Stroke {
        Stroke {
            id: id.into(),
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            color: Color::BLACK,
            page,
            width: 3.0,
        }
    }

    fn note(id: &str, page: PageNumber, bounds: Rect) -> TextNote {
        TextNote {
            id: id.into(),
            content: id.to_owned(),
            bounds,
            color: Color::BLACK,
            page,
            font_size: 16.0,
        }
    }

    #[test]
    fn long_segment_is_hit_between_sparse_vertices() {
        let line = stroke("s", 1, &[(0.0, 0.0), (200.0, 0.0)]);
        // 100px from either vertex, 4px off the segment
        assert!(stroke_contains_point(&line, Point::new(100.0, 4.0), 10.0));
        assert!(!stroke_contains_point(&line, Point::new(100.0, 12.0), 10.0));
    }

    #[test]
    fn stroke_threshold_is_exclusive() {
        let line = stroke("s", 1, &[(0.0, 0.0), (100.0, 0.0)]);
        assert!(!stroke_contains_point(&line, Point::new(50.0, 10.0), 10.0));
        assert!(stroke_contains_point(&line, Point::new(50.0, 9.99), 10.0));
    }

    #[test]
    fn single_point_stroke_uses_vertex_distance() {
        let dot = stroke("s", 1, &[(5.0, 5.0)]);
        assert!(stroke_contains_point(&dot, Point::new(8.0, 9.0), 10.0));
        assert!(!stroke_contains_point(&stroke("e", 1, &[]), Point::new(0.0, 0.0), 10.0));
    }

    #[test]
    fn rect_hit_includes_padding() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        assert!(rect_contains_point(&rect, Point::new(105.0, 105.0), 10.0));
        assert!(rect_contains_point(&rect, Point::new(92.0, 128.0), 10.0));
        assert!(!rect_contains_point(&rect, Point::new(500.0, 500.0), 10.0));
        // Unnormalized boxes cover the same area
        let flipped = Rect::new(150.0, 120.0, -50.0, -20.0);
        assert!(rect_contains_point(&flipped, Point::new(105.0, 105.0), 0.0));
    }

    #[test]
    fn hits_are_scoped_to_page_and_deduplicated() {
        let mut set = AnnotationSet::new();
        set.add_stroke(stroke("near", 1, &[(0.0, 0.0), (10.0, 0.0)]));
        set.add_stroke(stroke("other-page", 2, &[(0.0, 0.0), (10.0, 0.0)]));
        set.add_note(note("box", 1, Rect::new(0.0, 0.0, 60.0, 30.0)));

        let hits = hits_at(&set, 1, &[Point::new(1.0, 1.0), Point::new(2.0, 1.0)], 10.0);
        assert_eq!(hits, vec![HitTarget::Stroke("near".into()), HitTarget::Note("box".into())]);
    }

    #[test]
    fn note_at_prefers_most_recent() {
        let mut set = AnnotationSet::new();
        set.add_note(note("under", 1, Rect::new(0.0, 0.0, 100.0, 100.0)));
        set.add_note(note("over", 1, Rect::new(50.0, 50.0, 100.0, 100.0)));

        let id_at = |x, y| note_at(&set, 1, Point::new(x, y), 0.0).map(|n| n.id.as_str());
        assert_eq!(id_at(60.0, 60.0), Some("over"));
        assert_eq!(id_at(10.0, 10.0), Some("under"));
        assert!(note_at(&set, 2, Point::new(10.0, 10.0), 0.0).is_none());
    }

    #[test]
    fn resize_handle_sits_on_bottom_right_corner() {
        let n = note("n", 1, Rect::new(0.0, 0.0, 100.0, 40.0));
        assert!(resize_handle_at(&n, Point::new(98.0, 42.0), 24.0));
        assert!(!resize_handle_at(&n, Point::new(50.0, 20.0), 24.0));
    }
}
