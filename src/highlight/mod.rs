//! Page-anchored highlights and their in-memory bookkeeping.

pub mod geometry;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{HighlightRegion, HighlightUpdate, TextSelection, DEFAULT_HIGHLIGHT_COLOR};

pub use geometry::{checked_rect, merge, normalize, overlaps};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HighlightError {
    #[error("Highlight rectangle edges are inverted or not finite")]
    InvalidRect,
}

/// The highlights of one document, in creation order.
#[derive(Debug, Clone, Default)]
pub struct HighlightSet {
    regions: Vec<HighlightRegion>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_regions(regions: Vec<HighlightRegion>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[HighlightRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&HighlightRegion> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Turn a selection into a new highlight and return a copy of it.
    ///
    /// Width and height are recomputed from the selection's edges; inverted
    /// edges are rejected.
    pub fn add(
        &mut self,
        selection: TextSelection,
        color: Option<String>,
        note: Option<String>,
    ) -> Result<HighlightRegion, HighlightError> {
        let rect = checked_rect(&selection.rect).ok_or(HighlightError::InvalidRect)?;
        let region = HighlightRegion {
            id: Uuid::new_v4(),
            page_number: selection.page_number,
            rect,
            text: selection.text,
            color: color.unwrap_or_else(|| DEFAULT_HIGHLIGHT_COLOR.to_string()),
            note,
            created_at: Utc::now(),
        };
        self.regions.push(region.clone());
        Ok(region)
    }

    /// Change colour and/or note in place. Returns the updated highlight, or
    /// `None` if `id` is unknown.
    pub fn update(&mut self, id: Uuid, update: HighlightUpdate) -> Option<&HighlightRegion> {
        let region = self.regions.iter_mut().find(|r| r.id == id)?;
        if let Some(color) = update.color {
            region.color = color;
        }
        if let Some(note) = update.note {
            region.note = note;
        }
        Some(&*region)
    }

    /// Delete one highlight. Returns whether it existed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.regions.len();
        self.regions.retain(|r| r.id != id);
        self.regions.len() != before
    }

    /// Other highlights that overlap `region`.
    pub fn overlapping(&self, region: &HighlightRegion) -> Vec<&HighlightRegion> {
        self.regions
            .iter()
            .filter(|r| r.id != region.id && overlaps(r, region))
            .collect()
    }

    /// Replace `a` with `merge(a, b)` and drop `b`. Returns the merged highlight,
    /// or `None` if either id is unknown or both are the same.
    pub fn merge_pair(&mut self, a: Uuid, b: Uuid) -> Option<HighlightRegion> {
        if a == b {
            return None;
        }
        let merged = merge(self.get(a)?, self.get(b)?);
        self.regions.retain(|r| r.id != b);
        let slot = self.regions.iter_mut().find(|r| r.id == a)?;
        *slot = merged.clone();
        Some(merged)
    }
}
