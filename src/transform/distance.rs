use tracing::debug;

use super::{check_mask_fits, relax_pass, NeighborRule, ScanOrder};
use crate::error::Result;
use crate::mask::ChamferMask;
use crate::math::DistanceValue;
use crate::raster::Raster;

/// Two-pass chamfer distance transform.
///
/// Every foreground pixel receives the chamfer distance to the nearest
/// background pixel; background pixels hold 0. Offsets falling outside the
/// raster are skipped, so the image border is not treated as background.
///
/// # Algorithm
///
/// 1. Initialize foreground to infinity and background to 0.
/// 2. **Forward scan**: relax each pixel against the forward half of the mask.
/// 3. **Backward scan**: relax each pixel against the backward half.
#[derive(Debug)]
pub struct DistanceTransform<'a, W> {
    mask: &'a ChamferMask<W>,
    label_boundaries: bool,
}

impl<'a, W: DistanceValue> DistanceTransform<'a, W> {
    /// Creates a new distance transform using `mask`.
    #[must_use]
    pub fn new(mask: &'a ChamferMask<W>) -> Self {
        Self {
            mask,
            label_boundaries: false,
        }
    }

    /// When enabled, [`execute_labels`](Self::execute_labels) treats pixels
    /// of a different label as background, so touching regions each get the
    /// distance to their own boundary.
    #[must_use]
    pub fn with_label_boundaries(mut self, enabled: bool) -> Self {
        self.label_boundaries = enabled;
        self
    }

    /// Computes the distance map of a binary image (`true` = foreground).
    ///
    /// # Errors
    ///
    /// Returns `RasterError::DimensionMismatch` if a 2D mask is applied to a
    /// 3D raster.
    pub fn execute(&self, image: &Raster<bool>) -> Result<Raster<W>> {
        let labels = image.map(u32::from);
        self.run(&labels, NeighborRule::Unconstrained)
    }

    /// Computes the distance map of a label image, with label 0 as
    /// background.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::DimensionMismatch` if a 2D mask is applied to a
    /// 3D raster.
    pub fn execute_labels(&self, labels: &Raster<u32>) -> Result<Raster<W>> {
        let rule = if self.label_boundaries {
            NeighborRule::LabelBoundary
        } else {
            NeighborRule::Unconstrained
        };
        self.run(labels, rule)
    }

    fn run(&self, labels: &Raster<u32>, rule: NeighborRule) -> Result<Raster<W>> {
        let dims = labels.dims();
        check_mask_fits(self.mask, dims)?;
        debug!(%dims, ?rule, "chamfer distance transform");

        let mut dist = labels.map(|l| if l == 0 { W::ZERO } else { W::INFINITY });
        let ids = labels.as_slice();
        relax_pass(
            dist.as_mut_slice(),
            ids,
            dims,
            self.mask.forward_half(),
            ScanOrder::Forward,
            rule,
        );
        relax_pass(
            dist.as_mut_slice(),
            ids,
            dims,
            self.mask.backward_half(),
            ScanOrder::Backward,
            rule,
        );
        Ok(dist)
    }
}
