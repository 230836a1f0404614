//! Interactive bounds registry.
//!
//! Built fresh by every paint pass and handed to the caller inside the render
//! result. Iteration order is insertion order, which is the order hit-testing
//! walks entries in.

use indexmap::IndexMap;
use serde::Serialize;

use crate::layout::ClipRect;

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive on every edge so 1px targets stay clickable.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        self.x <= px && px <= self.x + self.width && self.y <= py && py <= self.y + self.height
    }

    /// Intersection with a clip rectangle; `None` when nothing remains.
    pub fn clipped_to(&self, clip: &ClipRect) -> Option<Self> {
        let left = self.x.max(clip.x);
        let top = self.y.max(clip.y);
        let right = (self.x + self.width).min(clip.x + clip.width);
        let bottom = (self.y + self.height).min(clip.y + clip.height);
        (right > left && bottom > top).then(|| Self::new(left, top, right - left, bottom - top))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandIconBounds {
    pub bounds: Bounds,
    pub row: u32,
    pub col: u32,
    /// State the group switches to when clicked
    pub is_expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterButtonBounds {
    pub bounds: Bounds,
    pub field_index: usize,
    pub row: u32,
    pub col: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterAxis {
    Row,
    Column,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFilterBounds {
    pub bounds: Bounds,
    pub row: u32,
    pub col: u32,
    pub axis: FilterAxis,
    pub has_active_filter: bool,
}

/// Key for expand icons and header filters.
pub fn cell_key(row: u32, col: u32) -> String {
    format!("{row}-{col}")
}

/// Key for filter buttons, by field identity.
pub fn filter_key(field_index: usize) -> String {
    format!("filter-{field_index}")
}

/// Per-pass accumulator of interactive sub-element bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveBounds {
    pub expand_collapse_icons: IndexMap<String, ExpandIconBounds>,
    pub filter_buttons: IndexMap<String, FilterButtonBounds>,
    pub header_filter_buttons: IndexMap<String, HeaderFilterBounds>,
}

impl InteractiveBounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an expand icon. Returns false if the key was already taken.
    pub fn record_expand_icon(&mut self, entry: ExpandIconBounds) -> bool {
        let key = cell_key(entry.row, entry.col);
        insert_first(&mut self.expand_collapse_icons, key, entry)
    }

    pub fn record_filter_button(&mut self, entry: FilterButtonBounds) -> bool {
        let key = filter_key(entry.field_index);
        insert_first(&mut self.filter_buttons, key, entry)
    }

    pub fn record_header_filter(&mut self, entry: HeaderFilterBounds) -> bool {
        let key = cell_key(entry.row, entry.col);
        insert_first(&mut self.header_filter_buttons, key, entry)
    }

    pub fn len(&self) -> usize {
        self.expand_collapse_icons.len()
            + self.filter_buttons.len()
            + self.header_filter_buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if any entry belongs to the cell at (row, col).
    pub fn has_cell(&self, row: u32, col: u32) -> bool {
        self.expand_collapse_icons
            .values()
            .any(|e| e.row == row && e.col == col)
            || self
                .filter_buttons
                .values()
                .any(|e| e.row == row && e.col == col)
            || self
                .header_filter_buttons
                .values()
                .any(|e| e.row == row && e.col == col)
    }
}

fn insert_first<V>(map: &mut IndexMap<String, V>, key: String, value: V) -> bool {
    if map.contains_key(&key) {
        log::trace!("interactive bounds key {key} already registered");
        return false;
    }
    map.insert(key, value);
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let b = Bounds::new(10.0, 10.0, 1.0, 1.0);
        assert!(b.contains(10.0, 10.0));
        assert!(b.contains(11.0, 11.0));
        assert!(!b.contains(11.01, 10.5));
    }

    #[test]
    fn clipping() {
        let clip = ClipRect {
            x: 50.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let partial = Bounds::new(40.0, 10.0, 20.0, 10.0).clipped_to(&clip).unwrap();
        assert_eq!(partial, Bounds::new(50.0, 10.0, 10.0, 10.0));
        assert_eq!(Bounds::new(0.0, 0.0, 40.0, 40.0).clipped_to(&clip), None);
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = InteractiveBounds::new();
        let first = FilterButtonBounds {
            bounds: Bounds::new(0.0, 0.0, 80.0, 20.0),
            field_index: 3,
            row: 0,
            col: 1,
        };
        let second = FilterButtonBounds {
            row: 5,
            ..first.clone()
        };
        assert!(registry.record_filter_button(first));
        assert!(!registry.record_filter_button(second));
        assert_eq!(registry.filter_buttons["filter-3"].row, 0);
        assert!(registry.has_cell(0, 1));
        assert!(!registry.has_cell(5, 1));
    }

    #[test]
    fn serializes_camel_case_maps() {
        let mut registry = InteractiveBounds::new();
        registry.record_expand_icon(ExpandIconBounds {
            bounds: Bounds::new(1.0, 2.0, 12.0, 12.0),
            row: 2,
            col: 0,
            is_expanded: false,
        });
        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json["expandCollapseIcons"]["2-0"]["isExpanded"], false);
        assert!(json["filterButtons"].as_object().unwrap().is_empty());
    }
}
