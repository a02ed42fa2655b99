use crate::error::{MeasureError, Result};
use crate::mask::ChamferMask;
use crate::math::{DistanceValue, Position};
use crate::raster::Raster;

/// Reconstructs geodesic paths by steepest descent on a converged geodesic
/// distance map.
///
/// From the start pixel, the walk repeatedly moves to the same-label neighbor
/// (over the full mask neighborhood) holding the smallest value strictly
/// below the current one, until the end pixel is reached. Ties keep the
/// first neighbor in the mask's entry order. With a 5×5 mask, consecutive
/// path points may be a knight move apart.
#[derive(Debug)]
pub struct PathExtractor<'a, W> {
    mask: &'a ChamferMask<W>,
}

impl<'a, W: DistanceValue> PathExtractor<'a, W> {
    /// Creates a new `PathExtractor` walking the neighborhood of `mask`.
    #[must_use]
    pub fn new(mask: &'a ChamferMask<W>) -> Self {
        Self { mask }
    }

    /// Walks from `start` down to `end` within region `label`.
    ///
    /// Returns the visited positions in order, both endpoints included. An
    /// infinite value at `start` means no path exists and yields an empty
    /// path.
    ///
    /// # Errors
    ///
    /// - `RasterError::DimensionMismatch` if `distances` and `labels` differ
    /// - `MeasureError::RegionNotFound` if `start` or `end` is outside the
    ///   raster or not inside `label`
    /// - `MeasureError::NoDescendingNeighbor` if the walk reaches a pixel with
    ///   no strictly smaller same-label neighbor before `end`
    pub fn extract(
        &self,
        distances: &Raster<W>,
        labels: &Raster<u32>,
        label: u32,
        start: Position,
        end: Position,
    ) -> Result<Vec<Position>> {
        labels.ensure_same_dims(distances)?;
        if label == 0 || labels.get(start) != Some(label) || labels.get(end) != Some(label) {
            return Err(MeasureError::RegionNotFound { label }.into());
        }

        let dims = labels.dims();
        let mut current = start;
        let mut value = distances.get(start).unwrap_or(W::INFINITY);
        if value.is_infinite() {
            return Ok(Vec::new());
        }

        let mut path = vec![start];
        while current != end {
            let mut next: Option<(Position, W)> = None;
            for entry in self.mask.entries() {
                let candidate = current + entry.offset;
                let Some(index) = dims.index_of(candidate) else {
                    continue;
                };
                if labels[index] != label {
                    continue;
                }
                let v = distances[index];
                let lowest = next.map_or(value, |(_, best)| best);
                if v < lowest {
                    next = Some((candidate, v));
                }
            }

            let Some((position, v)) = next else {
                return Err(MeasureError::NoDescendingNeighbor {
                    label,
                    position: current,
                }
                .into());
            };
            path.push(position);
            current = position;
            value = v;
        }
        Ok(path)
    }
}
