use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Default colour for new highlights.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffeb3b";

/// An axis-aligned rectangle in page coordinates.
///
/// Invariant: `x2 >= x1`, `y2 >= y1`, `width == x2 - x1`, `height == y2 - y1`.
/// Build one with [`crate::highlight::geometry::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Whether `other` lies fully inside this rectangle (edges inclusive).
    pub fn contains(&self, other: &Rect) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && self.x2 >= other.x2 && self.y2 >= other.y2
    }
}

/// A user-marked, page-anchored span of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRegion {
    pub id: Uuid,
    pub page_number: u32,
    pub rect: Rect,
    pub text: String,
    pub color: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A text selection on a page, before it becomes a highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSelection {
    pub page_number: u32,
    pub rect: Rect,
    pub text: String,
}

/// Input for creating a highlight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHighlightInput {
    #[serde(flatten)]
    pub selection: TextSelection,
    /// Defaults to [`DEFAULT_HIGHLIGHT_COLOR`].
    pub color: Option<String>,
    pub note: Option<String>,
}

/// Input for updating a highlight. Only colour and note can change.
///
/// An absent `note` leaves it as is; `"note": null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighlightUpdate {
    pub color: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<Option<String>>,
}

/// Wraps any value that is present in the input, `null` included.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
