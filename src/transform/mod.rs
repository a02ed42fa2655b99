mod distance;
mod geodesic;
mod wavefront;

pub use distance::DistanceTransform;
pub use geodesic::{GeodesicDistanceTransform, GeodesicMap, GeodesicParams, PropagationStrategy};

use crate::error::{RasterError, Result};
use crate::mask::{ChamferMask, MaskEntry};
use crate::math::DistanceValue;
use crate::raster::Dims;

/// Direction of a raster scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanOrder {
    /// Top-left-front to bottom-right-back.
    Forward,
    /// Bottom-right-back to top-left-front.
    Backward,
}

/// How a pixel may read the value of a neighbor carrying another label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NeighborRule {
    /// Neighbors of any label are read as-is (label 0 holds 0).
    Unconstrained,
    /// Neighbors of another label read as 0, like background.
    LabelBoundary,
    /// Neighbors of another label are ignored.
    SameLabel,
}

/// Runs one chamfer relaxation pass over `dist`, updating every labeled pixel
/// to the minimum of its value and `neighbor + weight` over `entries`.
///
/// Returns whether any pixel changed.
pub(crate) fn relax_pass<W: DistanceValue>(
    dist: &mut [W],
    labels: &[u32],
    dims: Dims,
    entries: &[MaskEntry<W>],
    order: ScanOrder,
    rule: NeighborRule,
) -> bool {
    let n = dims.len();
    let mut changed = false;

    let mut visit = |index: usize| {
        let label = labels[index];
        if label == 0 {
            return;
        }
        let position = dims.position_of(index);
        let current = dist[index];
        let mut best = current;

        for entry in entries {
            let Some(q) = dims.index_of(position + entry.offset) else {
                continue;
            };
            let neighbor = if labels[q] == label {
                dist[q]
            } else {
                match rule {
                    NeighborRule::Unconstrained => dist[q],
                    NeighborRule::LabelBoundary => W::ZERO,
                    NeighborRule::SameLabel => continue,
                }
            };
            let candidate = neighbor.accumulate(entry.weight);
            if candidate < best {
                best = candidate;
            }
        }

        if best < current {
            dist[index] = best;
            changed = true;
        }
    };

    match order {
        ScanOrder::Forward => (0..n).for_each(&mut visit),
        ScanOrder::Backward => (0..n).rev().for_each(&mut visit),
    }
    changed
}

/// Rejects a planar mask applied to a volume.
pub(crate) fn check_mask_fits<W: DistanceValue>(mask: &ChamferMask<W>, dims: Dims) -> Result<()> {
    if dims.is_3d() && !mask.is_3d() {
        return Err(RasterError::DimensionMismatch {
            expected: "a 3D chamfer mask".to_owned(),
            found: format!("a 2D mask for a {dims} raster"),
        }
        .into());
    }
    Ok(())
}
