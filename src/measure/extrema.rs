use crate::math::{DistanceValue, Position};
use crate::raster::{LabelSet, Raster};

/// The extreme value found for one label and where it occurs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionValuePair<W> {
    /// Location of the extremum.
    pub position: Position,
    /// Value at `position`.
    pub value: W,
}

/// Finds, for every label of `set`, the pixel holding the largest value of
/// `values` in one raster scan.
///
/// Ties keep the first pixel in raster-scan order. Labels absent from
/// `labels` yield `None`. Pixels whose label is not in `set` are ignored.
#[must_use]
pub fn max_per_label<W: DistanceValue>(
    values: &Raster<W>,
    labels: &Raster<u32>,
    set: &LabelSet,
) -> Vec<Option<PositionValuePair<W>>> {
    extremum_per_label(values, labels, set, |candidate, best| candidate > best)
}

/// Finds, for every label of `set`, the pixel holding the smallest value of
/// `values`. Same conventions as [`max_per_label`].
#[must_use]
pub fn min_per_label<W: DistanceValue>(
    values: &Raster<W>,
    labels: &Raster<u32>,
    set: &LabelSet,
) -> Vec<Option<PositionValuePair<W>>> {
    extremum_per_label(values, labels, set, |candidate, best| candidate < best)
}

fn extremum_per_label<W: DistanceValue>(
    values: &Raster<W>,
    labels: &Raster<u32>,
    set: &LabelSet,
    better: impl Fn(W, W) -> bool,
) -> Vec<Option<PositionValuePair<W>>> {
    let dims = labels.dims();
    let mut best: Vec<Option<PositionValuePair<W>>> = vec![None; set.len()];

    for (index, (&label, &value)) in labels.as_slice().iter().zip(values.as_slice()).enumerate() {
        if label == 0 {
            continue;
        }
        let Some(slot) = set.index_of(label) else {
            continue;
        };
        let replace = match best[slot] {
            Some(pair) => better(value, pair.value),
            None => true,
        };
        if replace {
            best[slot] = Some(PositionValuePair {
                position: dims.position_of(index),
                value,
            });
        }
    }
    best
}
