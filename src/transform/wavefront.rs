//! Priority-queue geodesic propagation.
//!
//! Pixels are settled in order of increasing distance from the markers, so a
//! single sweep reaches the exact fixed point the alternating scans converge
//! to. Ties in the queue are broken by raster index.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::mask::ChamferMask;
use crate::math::DistanceValue;
use crate::progress::Monitor;
use crate::raster::Dims;

/// Number of settled pixels between two cancellation checks.
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// Queue entry for the wavefront.
#[derive(Debug, Clone, Copy)]
struct Front<W> {
    index: usize,
    distance: W,
}

impl<W: DistanceValue> PartialEq for Front<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: DistanceValue> Eq for Front<W> {}

impl<W: DistanceValue> PartialOrd for Front<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: DistanceValue> Ord for Front<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Propagates distances from every zero-valued labeled pixel of `dist`
/// through same-label neighbors. Returns whether the run was cancelled.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn propagate_wavefront<W: DistanceValue>(
    dist: &mut [W],
    labels: &[u32],
    dims: Dims,
    mask: &ChamferMask<W>,
    monitor: &Monitor,
    phase: &str,
) -> bool {
    let mut heap: BinaryHeap<Front<W>> = dist
        .iter()
        .zip(labels)
        .enumerate()
        .filter(|&(_, (&d, &label))| label != 0 && d == W::ZERO)
        .map(|(index, _)| Front {
            index,
            distance: W::ZERO,
        })
        .collect();

    if monitor.is_cancelled() {
        debug!(phase, "wavefront propagation cancelled");
        return true;
    }
    let region_pixels = labels.iter().filter(|&&l| l != 0).count().max(1);
    monitor.notify(phase, Some(0.0));

    let mut settled = 0_usize;
    while let Some(Front { index, distance }) = heap.pop() {
        if distance > dist[index] {
            continue;
        }
        settled += 1;
        if settled % CANCEL_CHECK_INTERVAL == 0 {
            if monitor.is_cancelled() {
                debug!(phase, settled, "wavefront propagation cancelled");
                return true;
            }
            monitor.notify(phase, Some(settled as f64 / region_pixels as f64));
        }

        let label = labels[index];
        let position = dims.position_of(index);
        for entry in mask.entries() {
            let Some(q) = dims.index_of(position + entry.offset) else {
                continue;
            };
            if labels[q] != label {
                continue;
            }
            let candidate = distance.accumulate(entry.weight);
            if candidate < dist[q] {
                dist[q] = candidate;
                heap.push(Front {
                    index: q,
                    distance: candidate,
                });
            }
        }
    }

    monitor.notify(phase, Some(1.0));
    debug!(phase, settled, "wavefront propagation finished");
    false
}
