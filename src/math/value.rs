use std::fmt::Debug;

/// Numeric type a chamfer mask weight and a distance map share.
///
/// Integer types represent `+infinity` with their maximum value. Finite
/// sums saturate one below it, at [`MAX_FINITE`](Self::MAX_FINITE), so a
/// long but connected region never reads as unreachable.
pub trait DistanceValue: Copy + PartialOrd + Debug + Send + Sync + 'static {
    /// Additive identity; the value of seeds and background pixels.
    const ZERO: Self;

    /// Value of pixels not (yet) reached by any propagation.
    const INFINITY: Self;

    /// Largest finite distance. Integer accumulation clamps here.
    const MAX_FINITE: Self;

    /// Accumulates one step weight onto a distance. `INFINITY` is absorbing.
    #[must_use]
    fn accumulate(self, weight: Self) -> Self;

    /// Picks the weight matching this type from a preset's integer and
    /// floating weight tables.
    fn from_preset_weight(integer: u16, float: f64) -> Self;

    /// Lossy widening to `f64`, mapping `INFINITY` to `f64::INFINITY`.
    fn to_f64(self) -> f64;

    /// Returns whether this value is the infinity sentinel.
    fn is_infinite(self) -> bool {
        self.to_f64().is_infinite()
    }

    /// Returns whether this value hit the finite range limit, in which case
    /// it is only a lower bound of the true distance.
    fn is_saturated(self) -> bool {
        self == Self::MAX_FINITE
    }
}

macro_rules! impl_integer_distance {
    ($($t:ty),*) => {$(
        impl DistanceValue for $t {
            const ZERO: Self = 0;
            const INFINITY: Self = <$t>::MAX;
            const MAX_FINITE: Self = <$t>::MAX - 1;

            fn accumulate(self, weight: Self) -> Self {
                if self == Self::INFINITY || weight == Self::INFINITY {
                    Self::INFINITY
                } else {
                    self.saturating_add(weight).min(Self::MAX_FINITE)
                }
            }

            fn from_preset_weight(integer: u16, _float: f64) -> Self {
                Self::from(integer)
            }

            fn to_f64(self) -> f64 {
                if self == Self::INFINITY {
                    f64::INFINITY
                } else {
                    f64::from(self)
                }
            }
        }
    )*};
}

impl_integer_distance!(u16, u32);

impl DistanceValue for f32 {
    const ZERO: Self = 0.0;
    const INFINITY: Self = f32::INFINITY;
    const MAX_FINITE: Self = f32::MAX;

    fn accumulate(self, weight: Self) -> Self {
        self + weight
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_preset_weight(_integer: u16, float: f64) -> Self {
        float as f32
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl DistanceValue for f64 {
    const ZERO: Self = 0.0;
    const INFINITY: Self = f64::INFINITY;
    const MAX_FINITE: Self = f64::MAX;

    fn accumulate(self, weight: Self) -> Self {
        self + weight
    }

    fn from_preset_weight(_integer: u16, float: f64) -> Self {
        float
    }

    fn to_f64(self) -> f64 {
        self
    }
}
