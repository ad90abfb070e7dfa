//! Pure geometry over highlight rectangles.
//!
//! Overlap detection and merging are separate steps: nothing here merges on
//! its own, callers decide when two overlapping regions become one.

use serde::{Deserialize, Serialize};

use crate::models::{HighlightRegion, Rect};

/// A point in page or viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Build a [`Rect`] from its edges.
///
/// Callers guarantee `right >= left` and `bottom >= top`; nothing is clamped.
pub fn normalize(left: f64, top: f64, right: f64, bottom: f64) -> Rect {
    Rect {
        x1: left,
        y1: top,
        x2: right,
        y2: bottom,
        width: right - left,
        height: bottom - top,
    }
}

/// Rebuild `rect` from its edges, recomputing width and height.
///
/// Returns `None` when an edge is not finite or the edges are inverted, so
/// untrusted rectangles never reach [`overlaps`] or [`merge`].
pub fn checked_rect(rect: &Rect) -> Option<Rect> {
    let edges = [rect.x1, rect.y1, rect.x2, rect.y2];
    if edges.iter().any(|e| !e.is_finite()) || rect.x2 < rect.x1 || rect.y2 < rect.y1 {
        return None;
    }
    Some(normalize(rect.x1, rect.y1, rect.x2, rect.y2))
}

/// Separating-axis test. Rectangles that only touch on an edge overlap.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.x2 < b.x1 || a.x1 > b.x2 || a.y2 < b.y1 || a.y1 > b.y2)
}

/// Whether two highlights overlap. Highlights on different pages never do.
pub fn overlaps(a: &HighlightRegion, b: &HighlightRegion) -> bool {
    a.page_number == b.page_number && rects_overlap(&a.rect, &b.rect)
}

/// Smallest rectangle containing both `a` and `b`.
pub fn union(a: &Rect, b: &Rect) -> Rect {
    normalize(a.x1.min(b.x1), a.y1.min(b.y1), a.x2.max(b.x2), a.y2.max(b.y2))
}

/// Combine two highlights into one covering both.
///
/// Identity, page and colour come from `a`. The note is `a`'s unless it is
/// missing or empty, and the creation time is the earlier of the two.
pub fn merge(a: &HighlightRegion, b: &HighlightRegion) -> HighlightRegion {
    HighlightRegion {
        id: a.id,
        page_number: a.page_number,
        rect: union(&a.rect, &b.rect),
        text: format!("{} {}", a.text, b.text).trim().to_string(),
        color: a.color.clone(),
        note: a
            .note
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| b.note.clone()),
        created_at: a.created_at.min(b.created_at),
    }
}

/// Convert viewport coordinates to page coordinates for a page rendered with
/// its top-left corner at `page_origin` and zoomed by `scale`.
pub fn client_to_page(client: Point, page_origin: Point, scale: f64) -> Point {
    Point {
        x: (client.x - page_origin.x) / scale,
        y: (client.y - page_origin.y) / scale,
    }
}
