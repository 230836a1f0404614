//! Column width / row height resolution with a default fallback.

use std::collections::{BTreeMap, HashMap};

/// Size lookup for one axis.
///
/// Sizes come from a dense array (`sizes[i]` is the size of index `i`) and a
/// sorted map of sparse overrides, which win over the array. Indices without
/// an explicit (finite, non-negative) size use the default. Sizes below
/// `hidden_threshold` are hidden and resolve to 0, but still occupy their
/// index.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimensions {
    sizes: Vec<f32>,
    overrides: BTreeMap<u32, f32>,
    default_size: f32,
    hidden_threshold: f32,
}

impl Dimensions {
    pub fn dense(sizes: Vec<f32>, default_size: f32) -> Self {
        Self {
            sizes,
            overrides: BTreeMap::new(),
            default_size,
            hidden_threshold: 0.0,
        }
    }

    pub fn sparse(overrides: HashMap<u32, f32>, default_size: f32) -> Self {
        Self {
            sizes: Vec::new(),
            overrides: overrides.into_iter().collect(),
            default_size,
            hidden_threshold: 0.0,
        }
    }

    /// Build from an array plus sparse overrides. Overrides never expand the
    /// array, however far out their keys are.
    pub fn from_parts(sizes: &[f32], overrides: &HashMap<u32, f32>, default_size: f32) -> Self {
        Self {
            sizes: sizes.to_vec(),
            overrides: overrides.iter().map(|(k, v)| (*k, *v)).collect(),
            default_size,
            hidden_threshold: 0.0,
        }
    }

    #[must_use]
    pub fn with_hidden_threshold(mut self, threshold: f32) -> Self {
        self.hidden_threshold = threshold.max(0.0);
        self
    }

    pub fn default_size(&self) -> f32 {
        self.normalize(self.default_size).unwrap_or(0.0)
    }

    /// Size of `index` in pixels. Never fails; unknown indices use the default.
    pub fn size_of(&self, index: u32) -> f32 {
        self.overrides
            .get(&index)
            .and_then(|s| self.normalize(*s))
            .or_else(|| {
                self.sizes
                    .get(index as usize)
                    .and_then(|s| self.normalize(*s))
            })
            .unwrap_or_else(|| self.default_size())
    }

    pub fn is_hidden(&self, index: u32) -> bool {
        self.size_of(index) <= 0.0
    }

    /// Length of the dense array.
    pub fn dense_len(&self) -> u32 {
        u32::try_from(self.sizes.len()).unwrap_or(u32::MAX)
    }

    /// Overridden indices at or past `start`, ascending, with their resolved size.
    pub fn overrides_from(&self, start: u32) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.overrides
            .range(start..)
            .map(move |(index, _)| (*index, self.size_of(*index)))
    }

    /// Set an explicit size. Indices past the dense array become overrides.
    pub fn set_size(&mut self, index: u32, size: f32) {
        match self.sizes.get_mut(index as usize) {
            Some(slot) => {
                *slot = size;
                self.overrides.remove(&index);
            }
            None => {
                self.overrides.insert(index, size);
            }
        }
    }

    fn normalize(&self, size: f32) -> Option<f32> {
        if !size.is_finite() || size < 0.0 {
            return None;
        }
        if size < self.hidden_threshold {
            Some(0.0)
        } else {
            Some(size)
        }
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

    #[test]
    fn dense_falls_back_to_default() {
        let dims = Dimensions::dense(vec![50.0, 100.0, 100.0], 64.0);
        assert_eq!(dims.size_of(0), 50.0);
        assert_eq!(dims.size_of(2), 100.0);
        assert_eq!(dims.size_of(3), 64.0);
        assert_eq!(dims.size_of(10_000), 64.0);
        assert_eq!(dims.dense_len(), 3);
    }

    #[test]
    fn sparse_falls_back_to_default() {
        let mut map = HashMap::new();
        map.insert(5, 30.0);
        let dims = Dimensions::sparse(map, 20.0);
        assert_eq!(dims.size_of(4), 20.0);
        assert_eq!(dims.size_of(5), 30.0);
        assert_eq!(dims.dense_len(), 0);
    }

    #[test]
    fn invalid_sizes_use_default() {
        let dims = Dimensions::dense(vec![f32::NAN, -3.0, f32::INFINITY], 20.0);
        assert_eq!(dims.size_of(0), 20.0);
        assert_eq!(dims.size_of(1), 20.0);
        assert_eq!(dims.size_of(2), 20.0);
    }

    #[test]
    fn hidden_sizes_resolve_to_zero() {
        let dims = Dimensions::dense(vec![0.0, 0.3, 12.0], 20.0).with_hidden_threshold(0.5);
        assert_eq!(dims.size_of(0), 0.0);
        assert_eq!(dims.size_of(1), 0.0);
        assert!(dims.is_hidden(1));
        assert_eq!(dims.size_of(2), 12.0);
        assert!(!dims.is_hidden(2));
    }

    #[test]
    fn overrides_win_over_the_array() {
        let mut overrides = HashMap::new();
        overrides.insert(1, 0.0);
        overrides.insert(9, 44.0);
        overrides.insert(2, f32::NAN);
        let dims = Dimensions::from_parts(&[10.0, 20.0, 30.0], &overrides, 5.0);
        assert_eq!(dims.dense_len(), 3);
        assert_eq!(dims.size_of(0), 10.0);
        assert_eq!(dims.size_of(1), 0.0);
        // An unusable override falls back to the array
        assert_eq!(dims.size_of(2), 30.0);
        assert_eq!(dims.size_of(3), 5.0);
        assert_eq!(dims.size_of(9), 44.0);
        let tail: Vec<_> = dims.overrides_from(3).collect();
        assert_eq!(tail, vec![(9, 44.0)]);
    }

    #[test]
    fn far_override_keeps_the_array_small() {
        let mut overrides = HashMap::new();
        overrides.insert(4_000_000_000, 10.0);
        let dims = Dimensions::from_parts(&[], &overrides, 100.0);
        assert_eq!(dims.dense_len(), 0);
        assert_eq!(dims.size_of(4_000_000_000), 10.0);
        assert_eq!(dims.size_of(3_999_999_999), 100.0);
    }

    #[test]
    fn set_size_past_the_array_overrides() {
        let mut dims = Dimensions::dense(vec![10.0], 7.0);
        dims.set_size(3, 1.0);
        dims.set_size(0, 4.0);
        assert_eq!(dims.size_of(0), 4.0);
        assert_eq!(dims.size_of(2), 7.0);
        assert_eq!(dims.size_of(3), 1.0);
        assert_eq!(dims.dense_len(), 1);
        dims.set_size(u32::MAX, 2.0);
        assert_eq!(dims.size_of(u32::MAX), 2.0);
    }
}
