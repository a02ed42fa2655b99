use std::collections::HashMap;

use super::Raster;

/// Distinct region labels of a label raster, indexed densely.
///
/// Labels are stored in ascending order; `index_of(label)` gives the
/// position of a label in per-label result arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<u32>,
    indices: HashMap<u32, usize>,
}

impl LabelSet {
    /// Enumerates every non-zero label present in `labels`.
    #[must_use]
    pub fn from_raster(labels: &Raster<u32>) -> Self {
        let mut found: Vec<u32> = labels
            .as_slice()
            .iter()
            .copied()
            .filter(|&l| l != 0)
            .collect();
        found.sort_unstable();
        found.dedup();
        Self::from_sorted(found)
    }

    /// Builds a set from an explicit list. Zero and duplicates are dropped.
    #[must_use]
    pub fn from_labels(labels: &[u32]) -> Self {
        let mut found: Vec<u32> = labels.iter().copied().filter(|&l| l != 0).collect();
        found.sort_unstable();
        found.dedup();
        Self::from_sorted(found)
    }

    fn from_sorted(labels: Vec<u32>) -> Self {
        let indices = labels.iter().enumerate().map(|(i, &l)| (l, i)).collect();
        Self { labels, indices }
    }

    /// Dense index of `label`, if present.
    #[must_use]
    pub fn index_of(&self, label: u32) -> Option<usize> {
        self.indices.get(&label).copied()
    }

    /// Labels in ascending order.
    #[must_use]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether the set holds no label.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Maps a label raster to a foreground mask (`label != 0`).
#[must_use]
pub fn binarize(labels: &Raster<u32>) -> Raster<bool> {
    labels.map(|l| l != 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_sorted_non_zero_labels() {
        let r = Raster::from_rows(&[[0, 7, 7], [3, 0, 12], [3, 3, 0]]).unwrap();
        let set = LabelSet::from_raster(&r);
        assert_eq!(set.labels(), &[3, 7, 12]);
        assert_eq!(set.index_of(7), Some(1));
        assert_eq!(set.index_of(0), None);
        assert_eq!(set.index_of(5), None);
    }

    #[test]
    fn explicit_list_drops_zero_and_duplicates() {
        let set = LabelSet::from_labels(&[4, 0, 2, 4]);
        assert_eq!(set.labels(), &[2, 4]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn background_only_raster_has_no_labels() {
        let r = Raster::from_rows(&[[0_u32, 0], [0, 0]]).unwrap();
        assert!(LabelSet::from_raster(&r).is_empty());
    }

    #[test]
    fn binarize_marks_labeled_pixels() {
        let r = Raster::from_rows(&[[0_u32, 5], [2, 0]]).unwrap();
        assert_eq!(binarize(&r).as_slice(), &[false, true, true, false]);
    }
}
