//! Frozen-pane layout: pixel positions for rows and columns in either the
//! frozen or the scrolling regime.
//!
//! Each axis keeps prefix sums over its dense sizes, so `position_of` is O(1)
//! there. Past the dense sizes every index is default-sized except for sparse
//! overrides, whose size deltas are kept as a sorted prefix so offsets stay
//! O(log overrides) however far out the keys are. Any size change rebuilds
//! the affected suffix immediately, so no stale prefix sums survive a
//! mutation.

use super::Dimensions;
use crate::types::RenderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Col,
}

/// Layout of one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    dims: Dimensions,
    frozen_count: u32,
    scroll: f32,
    /// `positions[i]` = content offset of index i's leading edge, for i in 0..=dense_len
    positions: Vec<f32>,
    /// Overrides past the dense sizes with the running sum of `size - default`
    /// up to and including each one
    tail: Vec<(u32, f32)>,
    frozen_extent: f32,
}

impl AxisLayout {
    pub fn new(dims: Dimensions, frozen_count: u32, scroll: f32) -> Self {
        let mut axis = Self {
            dims,
            frozen_count,
            scroll,
            positions: vec![0.0],
            tail: Vec::new(),
            frozen_extent: 0.0,
        };
        axis.rebuild_from(0);
        axis
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    pub fn frozen_count(&self) -> u32 {
        self.frozen_count
    }

    /// Pixel size of the frozen leading indices.
    pub fn frozen_extent(&self) -> f32 {
        self.frozen_extent
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn size_of(&self, index: u32) -> f32 {
        self.dims.size_of(index)
    }

    /// Sum of sizes over `[0, index)`, independent of scroll.
    pub fn offset_of(&self, index: u32) -> f32 {
        if let Some(offset) = self.positions.get(index as usize) {
            return *offset;
        }
        #[allow(clippy::cast_precision_loss)]
        let beyond = index.saturating_sub(self.extent()) as f32;
        self.last() + beyond * self.dims.default_size() + self.tail_delta(index)
    }

    /// Sum of sizes over `[start, end)`; empty when `end <= start`.
    pub fn sum(&self, start: u32, end: u32) -> f32 {
        if end <= start {
            return 0.0;
        }
        self.offset_of(end) - self.offset_of(start)
    }

    /// Screen position of the leading edge of `index`.
    pub fn position_of(&self, index: u32) -> f32 {
        if index < self.frozen_count {
            self.offset_of(index)
        } else {
            self.frozen_extent + self.sum(self.frozen_count, index) - self.scroll
        }
    }

    pub fn is_frozen(&self, index: u32) -> bool {
        index < self.frozen_count
    }

    pub fn set_scroll(&mut self, scroll: f32) {
        self.scroll = scroll;
    }

    pub fn set_frozen_count(&mut self, frozen_count: u32) {
        if frozen_count == self.frozen_count {
            return;
        }
        self.frozen_count = frozen_count;
        self.frozen_extent = self.offset_of(frozen_count);
    }

    pub fn set_size(&mut self, index: u32, size: f32) {
        self.dims.set_size(index, size);
        self.rebuild_from(index);
    }

    /// Index under a screen pixel, or `None` left of / above the grid.
    pub fn index_at(&self, pixel: f32) -> Option<u32> {
        if !pixel.is_finite() || pixel < 0.0 {
            return None;
        }
        if self.frozen_count > 0 && pixel < self.frozen_extent {
            return Some(self.index_containing(pixel).min(self.frozen_count - 1));
        }
        let content = pixel - self.frozen_extent + self.offset_of(self.frozen_count) + self.scroll;
        Some(self.index_containing(content).max(self.frozen_count))
    }

    /// Smallest index `i >= from` whose trailing edge is at or past `content`.
    ///
    /// Saturates at `u32::MAX` when the remaining sizes can never reach it.
    pub fn index_ending_at_or_after(&self, content: f32, from: u32) -> u32 {
        Self::first_index(from, |i| self.offset_of(i.saturating_add(1)) >= content)
            .unwrap_or(u32::MAX)
    }

    fn extent(&self) -> u32 {
        u32::try_from(self.positions.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    fn last(&self) -> f32 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    /// Summed override deltas for overrides below `index`.
    fn tail_delta(&self, index: u32) -> f32 {
        let below = self.tail.partition_point(|(key, _)| *key < index);
        below
            .checked_sub(1)
            .and_then(|i| self.tail.get(i))
            .map_or(0.0, |(_, delta)| *delta)
    }

    /// Last index whose leading edge is at or before `content`.
    fn index_containing(&self, content: f32) -> u32 {
        Self::first_index(0, |i| self.offset_of(i) > content)
            .map_or(u32::MAX, |i| i.saturating_sub(1))
    }

    /// First index at or after `from` where `reached` holds. Offsets never
    /// decrease, so `reached` flips at most once and a binary search over
    /// the whole index space finds it.
    fn first_index(from: u32, reached: impl Fn(u32) -> bool) -> Option<u32> {
        if !reached(u32::MAX) {
            return None;
        }
        let (mut low, mut high) = (from, u32::MAX);
        while low < high {
            let mid = low + (high - low) / 2;
            if reached(mid) {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        Some(low)
    }

    fn rebuild_from(&mut self, index: u32) {
        let extent = self.dims.dense_len();
        let keep = (index.min(extent) as usize + 1).min(self.positions.len());
        self.positions.truncate(keep.max(1));
        let mut offset = self.last();
        let start = u32::try_from(self.positions.len() - 1).unwrap_or(u32::MAX);
        for i in start..extent {
            offset += self.dims.size_of(i);
            self.positions.push(offset);
        }

        let default_size = self.dims.default_size();
        let mut delta = 0.0;
        self.tail = self
            .dims
            .overrides_from(extent)
            .map(|(key, size)| {
                delta += size - default_size;
                (key, delta)
            })
            .collect();
        self.frozen_extent = self.offset_of(self.frozen_count);
    }
}

/// Two-axis frozen-pane layout for one paint pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub rows: AxisLayout,
    pub cols: AxisLayout,
}

impl GridLayout {
    pub fn new(rows: AxisLayout, cols: AxisLayout) -> Self {
        Self { rows, cols }
    }

    /// Build from render options with explicit frozen counts.
    pub fn from_options(options: &RenderOptions, frozen_rows: u32, frozen_cols: u32) -> Self {
        let threshold = options.metrics.hidden_threshold;
        let row_dims = Dimensions::from_parts(
            &options.row_heights,
            &options.row_height_overrides,
            options.default_row_height,
        )
        .with_hidden_threshold(threshold);
        let col_dims = Dimensions::from_parts(
            &options.col_widths,
            &options.col_width_overrides,
            options.default_col_width,
        )
        .with_hidden_threshold(threshold);
        Self {
            rows: AxisLayout::new(row_dims, frozen_rows, options.scroll_top),
            cols: AxisLayout::new(col_dims, frozen_cols, options.scroll_left),
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisLayout {
        match axis {
            Axis::Row => &self.rows,
            Axis::Col => &self.cols,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisLayout {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Col => &mut self.cols,
        }
    }

    pub fn position_of(&self, index: u32, axis: Axis) -> f32 {
        self.axis(axis).position_of(index)
    }

    pub fn index_at(&self, pixel: f32, axis: Axis) -> Option<u32> {
        self.axis(axis).index_at(pixel)
    }

    pub fn frozen_width(&self) -> f32 {
        self.cols.frozen_extent()
    }

    pub fn frozen_height(&self) -> f32 {
        self.rows.frozen_extent()
    }

    /// Screen (x, y) of a cell's top-left corner.
    pub fn cell_origin(&self, row: u32, col: u32) -> (f32, f32) {
        (self.cols.position_of(col), self.rows.position_of(row))
    }

    /// (row, col) under a screen point, before span resolution.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        Some((self.rows.index_at(y)?, self.cols.index_at(x)?))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn cols(widths: Vec<f32>, frozen: u32, scroll: f32) -> AxisLayout {
        AxisLayout::new(Dimensions::dense(widths, 100.0), frozen, scroll)
    }

    #[test]
    fn frozen_extent_sums_frozen_sizes() {
        let axis = cols(vec![50.0, 100.0, 100.0], 2, 0.0);
        assert_eq!(axis.frozen_extent(), 150.0);
        let none = cols(vec![50.0, 100.0], 0, 0.0);
        assert_eq!(none.frozen_extent(), 0.0);
    }

    #[test]
    fn frozen_positions_ignore_scroll() {
        let mut axis = cols(vec![50.0, 100.0, 100.0, 80.0], 2, 0.0);
        let before: Vec<f32> = (0..4).map(|i| axis.position_of(i)).collect();
        axis.set_scroll(37.0);
        assert_eq!(axis.position_of(0), before[0]);
        assert_eq!(axis.position_of(1), before[1]);
        assert_eq!(axis.position_of(2), before[2] - 37.0);
        assert_eq!(axis.position_of(3), before[3] - 37.0);
    }

    #[test]
    fn zero_frozen_is_pure_scrolling() {
        let axis = cols(vec![10.0, 20.0, 30.0], 0, 5.0);
        assert_eq!(axis.position_of(0), -5.0);
        assert_eq!(axis.position_of(2), 25.0);
    }

    #[test]
    fn positions_past_known_extent_use_default() {
        let axis = cols(vec![50.0, 100.0, 100.0], 1, 0.0);
        assert_eq!(axis.position_of(3), 250.0);
        assert_eq!(axis.position_of(5), 450.0);
        assert_eq!(axis.sum(2, 4), 200.0);
    }

    #[test]
    fn hidden_indices_sum_as_zero() {
        let axis = AxisLayout::new(
            Dimensions::dense(vec![10.0, 0.0, 10.0], 10.0).with_hidden_threshold(0.5),
            0,
            0.0,
        );
        assert_eq!(axis.position_of(1), 10.0);
        assert_eq!(axis.position_of(2), 10.0);
        assert_eq!(axis.position_of(3), 20.0);
    }

    #[test]
    fn set_size_rebuilds_prefix_sums() {
        let mut axis = cols(vec![10.0, 10.0, 10.0], 2, 0.0);
        assert_eq!(axis.position_of(3), 30.0);
        axis.set_size(0, 40.0);
        assert_eq!(axis.frozen_extent(), 50.0);
        assert_eq!(axis.position_of(3), 60.0);
        axis.set_size(6, 1.0);
        assert_eq!(axis.position_of(7), 60.0 + 300.0 + 1.0);
    }

    #[test]
    fn set_frozen_count_recomputes_extent() {
        let mut axis = cols(vec![10.0, 20.0, 30.0], 1, 0.0);
        assert_eq!(axis.frozen_extent(), 10.0);
        axis.set_frozen_count(3);
        assert_eq!(axis.frozen_extent(), 60.0);
        axis.set_frozen_count(5);
        assert_eq!(axis.frozen_extent(), 260.0);
    }

    #[test]
    fn index_at_inverts_position_of() {
        let axis = cols(vec![50.0, 100.0, 100.0, 100.0], 1, 30.0);
        // Frozen column 0 owns [0, 50)
        assert_eq!(axis.index_at(0.0), Some(0));
        assert_eq!(axis.index_at(49.9), Some(0));
        // Column 1 starts at 50 - 30 = 20 but lies under the frozen band there
        assert_eq!(axis.index_at(50.0), Some(1));
        assert_eq!(axis.index_at(axis.position_of(2)), Some(2));
        assert_eq!(axis.index_at(axis.position_of(2) - 0.5), Some(1));
        assert_eq!(axis.index_at(axis.position_of(6) + 1.0), Some(6));
        assert_eq!(axis.index_at(-1.0), None);
    }

    #[test]
    fn index_ending_at_or_after_walks_forward() {
        let axis = cols(vec![10.0, 10.0, 10.0], 0, 0.0);
        assert_eq!(axis.index_ending_at_or_after(0.0, 0), 0);
        assert_eq!(axis.index_ending_at_or_after(10.0, 0), 0);
        assert_eq!(axis.index_ending_at_or_after(10.5, 0), 1);
        assert_eq!(axis.index_ending_at_or_after(30.0, 0), 2);
        // Past the known extent every index is 100px
        assert_eq!(axis.index_ending_at_or_after(30.5, 0), 3);
        assert_eq!(axis.index_ending_at_or_after(230.0, 0), 4);
        assert_eq!(axis.index_ending_at_or_after(5.0, 2), 2);
    }

    #[test]
    fn far_sparse_overrides_resolve_lazily() {
        let mut overrides = std::collections::HashMap::new();
        overrides.insert(100_000, 10.0);
        overrides.insert(4_000_000_000, 10.0);
        let axis = AxisLayout::new(Dimensions::from_parts(&[], &overrides, 100.0), 0, 0.0);
        assert_eq!(axis.offset_of(100_000), 10_000_000.0);
        assert_eq!(axis.offset_of(100_001), 10_000_010.0);
        assert_eq!(axis.offset_of(100_002), 10_000_110.0);
        assert_eq!(axis.index_at(10_000_005.0), Some(100_000));
        assert_eq!(axis.index_at(10_000_010.0), Some(100_001));
        assert_eq!(axis.index_ending_at_or_after(10_000_005.0, 0), 100_000);
        assert_eq!(axis.index_ending_at_or_after(10_000_011.0, 0), 100_001);
        assert_eq!(axis.size_of(4_000_000_000), 10.0);
    }

    #[test]
    fn set_size_far_past_the_array() {
        let mut axis = cols(vec![10.0], 2, 0.0);
        axis.set_size(3_000_000_000, 0.0);
        axis.set_size(50_000, 0.0);
        assert_eq!(axis.frozen_extent(), 110.0);
        assert_eq!(axis.size_of(3_000_000_000), 0.0);
        assert_eq!(axis.sum(49_999, 50_001), 100.0);
        axis.set_frozen_count(0);
        assert_eq!(axis.frozen_extent(), 0.0);
    }

    #[test]
    fn grid_layout_from_options() {
        let options = RenderOptions {
            col_widths: vec![50.0, 100.0, 100.0],
            row_heights: vec![24.0, 24.0, 24.0],
            scroll_left: 10.0,
            ..RenderOptions::default()
        };
        let layout = GridLayout::from_options(&options, 1, 1);
        assert_eq!(layout.frozen_width(), 50.0);
        assert_eq!(layout.frozen_height(), 24.0);
        assert_eq!(layout.cell_origin(2, 2), (140.0, 48.0));
        assert_eq!(layout.position_of(0, Axis::Col), 0.0);
        assert_eq!(layout.cell_at(141.0, 49.0), Some((2, 2)));
    }
}
