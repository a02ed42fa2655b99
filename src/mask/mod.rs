mod preset;

pub use preset::MaskPreset;

use crate::error::{MaskError, Result};
use crate::math::{DistanceValue, Offset};

/// One weighted neighbor of a chamfer mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskEntry<W> {
    /// Displacement from the current pixel to the neighbor.
    pub offset: Offset,
    /// Cost of one step along `offset`.
    pub weight: W,
}

/// An immutable chamfer mask: the weighted neighborhood of one propagation
/// step.
///
/// Entries cover the full, centrally symmetric neighborhood and are stored in
/// raster-scan order (z, then y, then x). The first half points to pixels a
/// forward raster scan has already visited; the second half mirrors it.
///
/// Weight classes are identified by the sorted absolute components of an
/// offset:
///
/// | weights | 2D offsets | 3D offsets |
/// |---|---|---|
/// | `w[0]` | (1,0) | (1,0,0) |
/// | `w[1]` | (1,1) | (1,1,0) |
/// | `w[2]` | (2,1) | (1,1,1) |
/// | `w[3]` | — | (2,1,0) |
/// | `w[4]` | — | (2,1,1) |
/// | `w[5]` | — | (2,2,1) |
#[derive(Debug, Clone, PartialEq)]
pub struct ChamferMask<W> {
    weights: Vec<W>,
    entries: Vec<MaskEntry<W>>,
    forward: Vec<MaskEntry<W>>,
    backward: Vec<MaskEntry<W>>,
    is_3d: bool,
    normalized: bool,
}

impl<W: DistanceValue> ChamferMask<W> {
    /// Builds a 2D mask from `[orthogonal, diagonal]` (3×3 neighborhood) or
    /// `[orthogonal, diagonal, knight]` (5×5 neighborhood) weights.
    ///
    /// # Errors
    ///
    /// Returns `MaskError::InvalidWeightSpec` if the slice length is not 2 or 3,
    /// a weight is not strictly positive, or weights decrease with offset norm.
    pub fn from_weights_2d(weights: &[W]) -> Result<Self> {
        if !matches!(weights.len(), 2 | 3) {
            return Err(MaskError::InvalidWeightSpec(format!(
                "2D masks take 2 or 3 weights, got {}",
                weights.len()
            ))
            .into());
        }
        validate_weights(weights)?;
        Ok(Self::build(weights, false))
    }

    /// Builds a 3D mask from `[orthogonal, face-diagonal, cube-diagonal]`
    /// (3×3×3 neighborhood) or six weights adding the (2,1,0), (2,1,1) and
    /// (2,2,1) classes (5×5×5 neighborhood).
    ///
    /// # Errors
    ///
    /// Returns `MaskError::InvalidWeightSpec` if the slice length is not 3 or 6,
    /// a weight is not strictly positive, or weights decrease with offset norm.
    pub fn from_weights_3d(weights: &[W]) -> Result<Self> {
        if !matches!(weights.len(), 3 | 6) {
            return Err(MaskError::InvalidWeightSpec(format!(
                "3D masks take 3 or 6 weights, got {}",
                weights.len()
            ))
            .into());
        }
        validate_weights(weights)?;
        Ok(Self::build(weights, true))
    }

    fn build(weights: &[W], is_3d: bool) -> Self {
        let radius: i32 = if weights.len() > 3 || (!is_3d && weights.len() == 3) {
            2
        } else {
            1
        };
        let z_range = if is_3d { -radius..=radius } else { 0..=0 };

        let mut entries = Vec::new();
        for dz in z_range {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let offset = Offset::new(dx, dy, dz);
                    if let Some(class) = weight_class(offset, is_3d) {
                        if let Some(&weight) = weights.get(class) {
                            entries.push(MaskEntry { offset, weight });
                        }
                    }
                }
            }
        }

        let half = entries.len() / 2;
        let forward = entries[..half].to_vec();
        let backward = entries[half..].to_vec();

        Self {
            weights: weights.to_vec(),
            entries,
            forward,
            backward,
            is_3d,
            normalized: false,
        }
    }

    /// All entries, in raster-scan order of their offsets.
    #[must_use]
    pub fn entries(&self) -> &[MaskEntry<W>] {
        &self.entries
    }

    /// Entries pointing to pixels visited before the current one in a forward
    /// (top-left to bottom-right) raster scan.
    #[must_use]
    pub fn forward_half(&self) -> &[MaskEntry<W>] {
        &self.forward
    }

    /// Entries pointing to pixels visited before the current one in a
    /// backward raster scan.
    #[must_use]
    pub fn backward_half(&self) -> &[MaskEntry<W>] {
        &self.backward
    }

    /// The weight specification the mask was built from.
    #[must_use]
    pub fn weights(&self) -> &[W] {
        &self.weights
    }

    /// Weight of one orthogonal step.
    #[must_use]
    pub fn orthogonal_weight(&self) -> W {
        self.weights[0]
    }

    /// Half-width of the neighborhood (1 for 3×3, 2 for 5×5).
    #[must_use]
    pub fn radius(&self) -> i32 {
        self.entries
            .iter()
            .map(|e| e.offset.x.abs().max(e.offset.y.abs()).max(e.offset.z.abs()))
            .max()
            .unwrap_or(0)
    }

    /// Returns whether the mask spans the z axis.
    #[must_use]
    pub fn is_3d(&self) -> bool {
        self.is_3d
    }

    /// Returns whether weights were rescaled so that the orthogonal weight is 1.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Weight of the step along `offset`, if the mask contains it.
    #[must_use]
    pub fn weight_of(&self, offset: Offset) -> Option<W> {
        self.entries
            .iter()
            .find(|e| e.offset == offset)
            .map(|e| e.weight)
    }

    /// Converts the weights to `f64`.
    #[must_use]
    pub fn to_float(&self) -> ChamferMask<f64> {
        let convert = |entries: &[MaskEntry<W>]| -> Vec<MaskEntry<f64>> {
            entries
                .iter()
                .map(|e| MaskEntry {
                    offset: e.offset,
                    weight: e.weight.to_f64(),
                })
                .collect()
        };
        ChamferMask {
            weights: self.weights.iter().map(|w| w.to_f64()).collect(),
            entries: convert(&self.entries),
            forward: convert(&self.forward),
            backward: convert(&self.backward),
            is_3d: self.is_3d,
            normalized: self.normalized,
        }
    }
}

impl ChamferMask<f64> {
    /// Divides every weight by the orthogonal weight so that distances
    /// approximate Euclidean pixel units.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let scale = self.orthogonal_weight();
        let rescale = |entries: &[MaskEntry<f64>]| -> Vec<MaskEntry<f64>> {
            entries
                .iter()
                .map(|e| MaskEntry {
                    offset: e.offset,
                    weight: e.weight / scale,
                })
                .collect()
        };
        Self {
            weights: self.weights.iter().map(|w| w / scale).collect(),
            entries: rescale(&self.entries),
            forward: rescale(&self.forward),
            backward: rescale(&self.backward),
            is_3d: self.is_3d,
            normalized: true,
        }
    }
}

/// Index into the weight specification for `offset`, or `None` for the
/// center and offsets no mask size uses.
fn weight_class(offset: Offset, is_3d: bool) -> Option<usize> {
    let mut c = [offset.x.abs(), offset.y.abs(), offset.z.abs()];
    c.sort_unstable_by(|a, b| b.cmp(a));
    match (c, is_3d) {
        ([1, 0, 0], _) => Some(0),
        ([1, 1, 0], _) => Some(1),
        ([2, 1, 0], false) | ([1, 1, 1], true) => Some(2),
        ([2, 1, 0], true) => Some(3),
        ([2, 1, 1], true) => Some(4),
        ([2, 2, 1], true) => Some(5),
        _ => None,
    }
}

/// Checks positivity and monotonicity of a weight specification. Weight
/// classes are listed in increasing offset norm.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn validate_weights<W: DistanceValue>(weights: &[W]) -> Result<()> {
    for (i, &w) in weights.iter().enumerate() {
        // NaN fails this comparison too.
        if !(w > W::ZERO) || w.is_infinite() {
            return Err(MaskError::InvalidWeightSpec(format!(
                "weight {i} must be strictly positive and finite, got {w:?}"
            ))
            .into());
        }
    }
    if let Some(i) = weights.windows(2).position(|pair| pair[1] < pair[0]) {
        return Err(MaskError::InvalidWeightSpec(format!(
            "weight {} ({:?}) is smaller than weight {i} ({:?})",
            i + 1,
            weights[i + 1],
            weights[i]
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GeodesisError;
    use approx::assert_relative_eq;

    #[test]
    fn mask_3x3_has_eight_neighbors() {
        let mask = ChamferMask::from_weights_2d(&[3_u16, 4]).unwrap();
        assert_eq!(mask.weights(), &[3, 4]);
        assert_eq!(mask.entries().len(), 8);
        assert_eq!(mask.forward_half().len(), 4);
        assert_eq!(mask.backward_half().len(), 4);
        assert_eq!(mask.radius(), 1);
        assert_eq!(mask.weight_of(Offset::new(1, 0, 0)), Some(3));
        assert_eq!(mask.weight_of(Offset::new(-1, 1, 0)), Some(4));
        assert!(!mask.is_3d());
    }

    #[test]
    fn mask_5x5_adds_knight_moves() {
        let mask = ChamferMask::from_weights_2d(&[5_u32, 7, 11]).unwrap();
        assert_eq!(mask.entries().len(), 16);
        assert_eq!(mask.radius(), 2);
        assert_eq!(mask.weight_of(Offset::new(2, -1, 0)), Some(11));
        assert_eq!(mask.weight_of(Offset::new(2, 0, 0)), None);
        assert_eq!(mask.weight_of(Offset::new(2, 2, 0)), None);
    }

    #[test]
    fn mask_3d_sizes() {
        let small = ChamferMask::from_weights_3d(&[3_u16, 4, 5]).unwrap();
        assert_eq!(small.entries().len(), 26);
        assert!(small.is_3d());
        assert_eq!(small.weight_of(Offset::new(1, -1, 1)), Some(5));

        let large = ChamferMask::from_weights_3d(&[3_u16, 4, 5, 7, 7, 9]).unwrap();
        // 26 + 24 (2,1,0) + 24 (2,1,1) + 24 (2,2,1)
        assert_eq!(large.entries().len(), 98);
        assert_eq!(large.weight_of(Offset::new(0, 2, -1)), Some(7));
        assert_eq!(large.weight_of(Offset::new(2, 2, -1)), Some(9));
    }

    #[test]
    fn halves_are_mirror_images() {
        let mask = ChamferMask::from_weights_3d(&[1.0_f64, 1.5, 2.0]).unwrap();
        for (f, b) in mask
            .forward_half()
            .iter()
            .zip(mask.backward_half().iter().rev())
        {
            assert_eq!(f.offset, -b.offset);
            assert_relative_eq!(f.weight, b.weight);
        }
        // Forward half only looks at already-scanned pixels.
        for e in mask.forward_half() {
            let o = e.offset;
            assert!(o.z < 0 || (o.z == 0 && (o.y < 0 || (o.y == 0 && o.x < 0))));
        }
    }

    #[test]
    fn wrong_length_rejected() {
        let err = ChamferMask::from_weights_2d(&[1_u16]).unwrap_err();
        assert!(matches!(
            err,
            GeodesisError::Mask(MaskError::InvalidWeightSpec(_))
        ));
        assert!(ChamferMask::from_weights_2d(&[1_u16, 2, 3, 4]).is_err());
        assert!(ChamferMask::from_weights_3d(&[1_u16, 2]).is_err());
        assert!(ChamferMask::from_weights_3d(&[1_u16, 2, 3, 4]).is_err());
    }

    #[test]
    fn non_positive_weight_rejected() {
        assert!(ChamferMask::from_weights_2d(&[0_u16, 1]).is_err());
        assert!(ChamferMask::from_weights_2d(&[-1.0_f64, 1.0]).is_err());
        assert!(ChamferMask::from_weights_2d(&[f64::NAN, 1.0]).is_err());
        assert!(ChamferMask::from_weights_2d(&[1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn decreasing_weights_rejected() {
        assert!(ChamferMask::from_weights_2d(&[4_u16, 3]).is_err());
        assert!(ChamferMask::from_weights_2d(&[5_u16, 7, 6]).is_err());
    }

    #[test]
    fn normalization_rescales_to_unit_orthogonal() {
        let mask = ChamferMask::from_weights_2d(&[3_u16, 4])
            .unwrap()
            .to_float()
            .normalized();
        assert!(mask.is_normalized());
        assert_relative_eq!(mask.orthogonal_weight(), 1.0);
        assert_relative_eq!(mask.weight_of(Offset::new(1, 1, 0)).unwrap(), 4.0 / 3.0);
        assert_relative_eq!(mask.forward_half()[0].weight, 4.0 / 3.0);
    }
}
