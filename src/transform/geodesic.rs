use tracing::{debug, warn};

use super::wavefront::propagate_wavefront;
use super::{check_mask_fits, relax_pass, NeighborRule, ScanOrder};
use crate::error::Result;
use crate::mask::ChamferMask;
use crate::math::DistanceValue;
use crate::progress::Monitor;
use crate::raster::Raster;

/// How the geodesic distance is driven to its fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagationStrategy {
    /// Alternate forward and backward raster scans until a full pair of passes
    /// changes nothing, bounded by `max_iterations`.
    #[default]
    AlternatingScans,
    /// Priority-queue propagation from the markers (Dijkstra). Always
    /// converges exactly; `max_iterations` is not consulted.
    Wavefront,
}

/// Parameters controlling geodesic propagation.
#[derive(Debug, Clone)]
pub struct GeodesicParams {
    /// Maximum number of forward+backward pass pairs.
    pub max_iterations: usize,
    /// Propagation strategy.
    pub strategy: PropagationStrategy,
    /// Progress observer and cancellation flag.
    pub monitor: Monitor,
}

impl Default for GeodesicParams {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            strategy: PropagationStrategy::AlternatingScans,
            monitor: Monitor::new(),
        }
    }
}

impl GeodesicParams {
    /// Sets the maximum number of pass pairs.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the propagation strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: PropagationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the progress observer and cancellation flag.
    #[must_use]
    pub fn with_monitor(mut self, monitor: Monitor) -> Self {
        self.monitor = monitor;
        self
    }
}

/// Result of a geodesic distance transform.
#[derive(Debug, Clone)]
pub struct GeodesicMap<W> {
    /// Distance of every labeled pixel to the nearest marker of its label.
    /// Label-0 pixels hold 0; unreachable pixels hold infinity.
    pub distances: Raster<W>,
    /// Number of pass pairs run (1 for the wavefront strategy).
    pub iterations: usize,
    /// Whether a fixed point was reached.
    pub converged: bool,
    /// Whether the run stopped because cancellation was requested.
    pub cancelled: bool,
}

/// Label-constrained chamfer distance transform.
///
/// Propagation never crosses a label boundary: a pixel only inherits a
/// distance from neighbors carrying the same label, and label 0 is outside
/// every region. A label with no marker stays at infinity everywhere.
#[derive(Debug)]
pub struct GeodesicDistanceTransform<'a, W> {
    mask: &'a ChamferMask<W>,
    params: GeodesicParams,
    phase: String,
}

impl<'a, W: DistanceValue> GeodesicDistanceTransform<'a, W> {
    /// Creates a new geodesic transform using `mask` and default parameters.
    #[must_use]
    pub fn new(mask: &'a ChamferMask<W>) -> Self {
        Self {
            mask,
            params: GeodesicParams::default(),
            phase: "geodesic distance".to_owned(),
        }
    }

    /// Replaces the propagation parameters.
    #[must_use]
    pub fn with_params(mut self, params: GeodesicParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the phase name reported to the progress observer and in warnings.
    #[must_use]
    pub fn with_phase_name(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Phase name reported by this transform.
    #[must_use]
    pub fn phase_name(&self) -> &str {
        &self.phase
    }

    /// Computes the geodesic distance from `markers` within the regions of
    /// `labels`.
    ///
    /// A non-converged run still returns a valid upper bound of the true
    /// distances, with `converged == false`.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::DimensionMismatch` if `markers` and `labels`
    /// differ in size, or a 2D mask is applied to a 3D raster.
    pub fn execute(&self, markers: &Raster<bool>, labels: &Raster<u32>) -> Result<GeodesicMap<W>> {
        labels.ensure_same_dims(markers)?;
        let dims = labels.dims();
        check_mask_fits(self.mask, dims)?;

        let mut distances = Raster::from_vec(
            dims,
            markers
                .as_slice()
                .iter()
                .zip(labels.as_slice())
                .map(|(&marked, &label)| {
                    if label == 0 || marked {
                        W::ZERO
                    } else {
                        W::INFINITY
                    }
                })
                .collect(),
        )?;

        debug!(
            phase = %self.phase,
            %dims,
            strategy = ?self.params.strategy,
            "geodesic distance transform"
        );

        match self.params.strategy {
            PropagationStrategy::AlternatingScans => {
                let (iterations, converged, cancelled) =
                    self.alternate_scans(&mut distances, labels);
                Ok(GeodesicMap {
                    distances,
                    iterations,
                    converged,
                    cancelled,
                })
            }
            PropagationStrategy::Wavefront => {
                let cancelled = propagate_wavefront(
                    distances.as_mut_slice(),
                    labels.as_slice(),
                    dims,
                    self.mask,
                    &self.params.monitor,
                    &self.phase,
                );
                Ok(GeodesicMap {
                    distances,
                    iterations: 1,
                    converged: !cancelled,
                    cancelled,
                })
            }
        }
    }

    /// Alternates forward and backward passes until nothing changes.
    /// Returns `(iterations, converged, cancelled)`.
    #[allow(clippy::cast_precision_loss)]
    fn alternate_scans(&self, distances: &mut Raster<W>, labels: &Raster<u32>) -> (usize, bool, bool) {
        let dims = labels.dims();
        let monitor = &self.params.monitor;
        let total_passes = (2 * self.params.max_iterations).max(1) as f64;

        let mut iterations = 0;
        while iterations < self.params.max_iterations {
            if monitor.is_cancelled() {
                debug!(phase = %self.phase, iterations, "geodesic propagation cancelled");
                return (iterations, false, true);
            }

            let forward = relax_pass(
                distances.as_mut_slice(),
                labels.as_slice(),
                dims,
                self.mask.forward_half(),
                ScanOrder::Forward,
                NeighborRule::SameLabel,
            );
            monitor.notify(&self.phase, Some((2 * iterations + 1) as f64 / total_passes));

            let backward = relax_pass(
                distances.as_mut_slice(),
                labels.as_slice(),
                dims,
                self.mask.backward_half(),
                ScanOrder::Backward,
                NeighborRule::SameLabel,
            );
            iterations += 1;

            if !forward && !backward {
                monitor.notify(&self.phase, Some(1.0));
                debug!(phase = %self.phase, iterations, "geodesic propagation converged");
                return (iterations, true, false);
            }
            monitor.notify(&self.phase, Some((2 * iterations) as f64 / total_passes));
        }

        warn!(
            phase = %self.phase,
            max_iterations = self.params.max_iterations,
            "geodesic propagation did not converge"
        );
        (iterations, false, false)
    }
}
