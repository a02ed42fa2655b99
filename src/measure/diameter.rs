use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::calibration::{CalibratedResult, Calibration};
use super::extrema::{max_per_label, PositionValuePair};
use super::path::PathExtractor;
use crate::error::{GeodesisError, MeasureError, Result};
use crate::mask::ChamferMask;
use crate::math::{DistanceValue, Position, UNDEFINED_POSITION};
use crate::raster::{binarize, Dims, LabelSet, Raster};
use crate::transform::{DistanceTransform, GeodesicDistanceTransform, GeodesicMap, GeodesicParams};

const PHASE_CENTERS: &str = "inscribed centers";
const PHASE_FIRST: &str = "first extremities";
const PHASE_SECOND: &str = "second extremities";
const PHASE_PATHS: &str = "geodesic paths";

/// Geodesic measurements of one region, in pixel units.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodesicResult {
    /// Length of the longest geodesic path, including one pixel for the
    /// extent of the end pixels. Infinite when the region is not connected.
    pub diameter: f64,
    /// Radius of the largest inscribed circle (ball); NaN when undefined.
    pub inner_radius: f64,
    /// Center of the inscribed circle.
    pub center: Position,
    /// Geodesic extremity farthest from the center.
    pub first_extremity: Position,
    /// Geodesic extremity farthest from the first extremity.
    pub second_extremity: Position,
    /// Longest geodesic path from the second extremity to the first.
    /// `None` when paths were not requested or could not be traced; empty
    /// when the diameter is infinite.
    pub path: Option<Vec<Position>>,
}

/// Everything the estimator computed for a label raster.
#[derive(Debug, Clone)]
pub struct GeodesicDiameterOutput<W> {
    /// Per-label measurements, ordered by label.
    pub results: BTreeMap<u32, GeodesicResult>,
    /// Geodesic distance from the first extremities, as computed in the last
    /// propagation phase.
    pub distance_map: Raster<W>,
    /// Per-label conditions recovered during the run.
    pub warnings: Vec<MeasureError>,
    /// Whether a propagation phase was cancelled. Results are then partial.
    pub cancelled: bool,
}

impl<W> GeodesicDiameterOutput<W> {
    /// Converts every result to physical units.
    ///
    /// # Errors
    ///
    /// Returns `CalibrationError::InvalidSpacing` for an invalid calibration.
    pub fn calibrated(&self, calibration: &Calibration) -> Result<BTreeMap<u32, CalibratedResult>> {
        self.results
            .iter()
            .map(|(&label, r)| Ok((label, r.calibrated(calibration)?)))
            .collect()
    }
}

/// Parameters of the geodesic diameter estimator.
#[derive(Debug, Clone)]
pub struct DiameterParams {
    /// Divide distances by the orthogonal weight so results are in pixels.
    pub normalize: bool,
    /// Trace the longest geodesic path of every label.
    pub compute_paths: bool,
    /// Measure inscribed circles against each label's own boundary instead of
    /// the background only.
    pub separate_touching_labels: bool,
    /// Parameters of both geodesic propagation phases.
    pub geodesic: GeodesicParams,
}

impl Default for DiameterParams {
    fn default() -> Self {
        Self {
            normalize: true,
            compute_paths: false,
            separate_touching_labels: false,
            geodesic: GeodesicParams::default(),
        }
    }
}

impl DiameterParams {
    /// Enables or disables path extraction.
    #[must_use]
    pub fn with_paths(mut self, enabled: bool) -> Self {
        self.compute_paths = enabled;
        self
    }

    /// Enables or disables normalization by the orthogonal weight.
    #[must_use]
    pub fn with_normalize(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    /// Enables or disables per-label boundaries for the inscribed circle.
    #[must_use]
    pub fn with_separate_touching_labels(mut self, enabled: bool) -> Self {
        self.separate_touching_labels = enabled;
        self
    }

    /// Replaces the geodesic propagation parameters.
    #[must_use]
    pub fn with_geodesic(mut self, geodesic: GeodesicParams) -> Self {
        self.geodesic = geodesic;
        self
    }
}

/// Estimates the geodesic diameter of every region of a label raster.
///
/// All labels are processed together, one raster sweep per phase:
///
/// 1. **Centers**: chamfer distance transform of the regions; the per-label
///    maximum gives the inscribed circle center and radius.
/// 2. **First extremities**: geodesic distance from the centers; the
///    per-label maximum is the first extremity.
/// 3. **Second extremities**: geodesic distance from the first extremities;
///    the per-label maximum plus one pixel is the diameter.
/// 4. **Paths** (optional): steepest descent from the second extremity back
///    to the first.
///
/// A failure confined to one label is recorded in
/// [`GeodesicDiameterOutput::warnings`] and never aborts the others.
#[derive(Debug)]
pub struct GeodesicDiameter<'a, W> {
    mask: &'a ChamferMask<W>,
    params: DiameterParams,
    labels: Option<Vec<u32>>,
}

impl<'a, W: DistanceValue> GeodesicDiameter<'a, W> {
    /// Creates a new estimator using `mask` and default parameters.
    #[must_use]
    pub fn new(mask: &'a ChamferMask<W>) -> Self {
        Self {
            mask,
            params: DiameterParams::default(),
            labels: None,
        }
    }

    /// Replaces the estimator parameters.
    #[must_use]
    pub fn with_params(mut self, params: DiameterParams) -> Self {
        self.params = params;
        self
    }

    /// Restricts measurement to `labels`. Listed labels missing from the
    /// raster are reported as `RegionNotFound`.
    #[must_use]
    pub fn with_labels(mut self, labels: &[u32]) -> Self {
        self.labels = Some(labels.to_vec());
        self
    }

    /// Runs every phase on `labels`.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::DimensionMismatch` if a 2D mask is applied to a
    /// 3D raster. Per-label problems are reported as warnings instead.
    pub fn execute(&self, labels: &Raster<u32>) -> Result<GeodesicDiameterOutput<W>> {
        let set = match &self.labels {
            Some(list) => LabelSet::from_labels(list),
            None => LabelSet::from_raster(labels),
        };
        let dims = labels.dims();
        let monitor = &self.params.geodesic.monitor;
        let scale = self.unit_scale();
        let mut warnings = Vec::new();

        info!(labels = set.len(), %dims, "estimating geodesic diameters");

        // Phase 1: inscribed circles.
        monitor.notify(PHASE_CENTERS, None);
        let transform = DistanceTransform::new(self.mask);
        let distance = if self.params.separate_touching_labels {
            transform.with_label_boundaries(true).execute_labels(labels)?
        } else {
            transform.execute(&binarize(labels))?
        };
        let centers = max_per_label(&distance, labels, &set);
        for (&label, center) in set.labels().iter().zip(&centers) {
            if center.is_none() {
                warn!(label, "region not found");
                warnings.push(MeasureError::RegionNotFound { label });
            }
        }

        // Phase 2: first extremities.
        let first = self.propagate(PHASE_FIRST, dims, &centers, labels, &mut warnings)?;
        let firsts = max_per_label(&first.distances, labels, &set);

        // Phase 3: second extremities and diameters.
        let second = self.propagate(PHASE_SECOND, dims, &firsts, labels, &mut warnings)?;
        let seconds = max_per_label(&second.distances, labels, &set);
        let cancelled = first.cancelled || second.cancelled;

        let mut results = BTreeMap::new();
        for (i, &label) in set.labels().iter().enumerate() {
            let saturated = [
                (PHASE_CENTERS, centers[i]),
                (PHASE_FIRST, firsts[i]),
                (PHASE_SECOND, seconds[i]),
            ]
            .into_iter()
            .find(|(_, pair)| pair.is_some_and(|p| p.value.is_saturated()));
            if let Some((phase, _)) = saturated {
                warn!(label, phase, "distance range of the weight type exceeded");
                warnings.push(MeasureError::DistanceRangeExceeded {
                    label,
                    phase: phase.to_owned(),
                });
            }

            let (center, inner_radius) = centers[i]
                .map_or((UNDEFINED_POSITION, f64::NAN), |c| {
                    (c.position, c.value.to_f64() * scale)
                });
            let diameter = seconds[i].map_or(f64::INFINITY, |s| {
                (s.value.to_f64() + self.mask.orthogonal_weight().to_f64()) * scale
            });
            if diameter.is_infinite() && centers[i].is_some() && !cancelled {
                warn!(label, "region is not connected; diameter is infinite");
                warnings.push(MeasureError::RegionNotFound { label });
            }
            results.insert(
                label,
                GeodesicResult {
                    diameter,
                    inner_radius,
                    center,
                    first_extremity: position_or_undefined(firsts[i]),
                    second_extremity: position_or_undefined(seconds[i]),
                    path: None,
                },
            );
        }

        // Phase 4: paths.
        if self.params.compute_paths && !cancelled {
            monitor.notify(PHASE_PATHS, None);
            self.trace_paths(&second.distances, labels, &mut results, &mut warnings)?;
        }

        debug!(
            labels = results.len(),
            warnings = warnings.len(),
            cancelled,
            "geodesic diameters estimated"
        );

        Ok(GeodesicDiameterOutput {
            results,
            distance_map: second.distances,
            warnings,
            cancelled,
        })
    }

    /// Factor converting map values to reported units.
    fn unit_scale(&self) -> f64 {
        if self.params.normalize {
            1.0 / self.mask.orthogonal_weight().to_f64()
        } else {
            1.0
        }
    }

    /// Seeds one marker per located label and runs a geodesic transform.
    fn propagate(
        &self,
        phase: &str,
        dims: Dims,
        seeds: &[Option<PositionValuePair<W>>],
        labels: &Raster<u32>,
        warnings: &mut Vec<MeasureError>,
    ) -> Result<GeodesicMap<W>> {
        self.params.geodesic.monitor.notify(phase, None);
        let mut markers = Raster::new(dims, false)?;
        for seed in seeds.iter().flatten() {
            markers.set(seed.position, true)?;
        }

        let map = GeodesicDistanceTransform::new(self.mask)
            .with_params(self.params.geodesic.clone())
            .with_phase_name(phase)
            .execute(&markers, labels)?;
        if !map.converged && !map.cancelled {
            warnings.push(MeasureError::MaxIterationsExceeded {
                phase: phase.to_owned(),
                iterations: map.iterations,
            });
        }
        Ok(map)
    }

    /// Traces the path of every label with a finite diameter.
    fn trace_paths(
        &self,
        distances: &Raster<W>,
        labels: &Raster<u32>,
        results: &mut BTreeMap<u32, GeodesicResult>,
        warnings: &mut Vec<MeasureError>,
    ) -> Result<()> {
        let extractor = PathExtractor::new(self.mask);
        for (&label, result) in results.iter_mut() {
            if result.diameter.is_infinite() {
                result.path = Some(Vec::new());
                continue;
            }
            match extractor.extract(
                distances,
                labels,
                label,
                result.second_extremity,
                result.first_extremity,
            ) {
                Ok(path) => result.path = Some(path),
                Err(GeodesisError::Measure(w)) => {
                    warn!(label, error = %w, "geodesic path skipped");
                    warnings.push(w);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn position_or_undefined<W>(pair: Option<PositionValuePair<W>>) -> Position {
    pair.map_or(UNDEFINED_POSITION, |p| p.position)
}
