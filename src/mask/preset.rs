use std::fmt;
use std::str::FromStr;

use super::ChamferMask;
use crate::error::{GeodesisError, MaskError, Result};
use crate::math::DistanceValue;

const SQRT_2: f64 = std::f64::consts::SQRT_2;
const SQRT_3: f64 = 1.732_050_807_568_877_2;
const SQRT_5: f64 = 2.236_067_977_499_79;
const SQRT_6: f64 = 2.449_489_742_783_178;

/// Named chamfer weight tables.
///
/// Each preset carries an integer and a floating variant, in 2D and 3D.
/// Integer variants of `QuasiEuclidean` scale the irrational weights by 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPreset {
    /// Every neighbor at distance 1 (L∞ norm).
    Chessboard,
    /// Diagonal steps cost two orthogonal ones (L1 norm).
    CityBlock,
    /// Orthogonal 1, diagonal √2 (3D adds √3).
    QuasiEuclidean,
    /// Borgefors 3-4 weights (3D: 3-4-5).
    Borgefors,
    /// 5-7-11 weights on a 5×5 neighborhood (3D: 5×5×5).
    ChessKnight,
    /// Verwer 12-17-27 weights on a 5×5 neighborhood (3D: 5×5×5).
    Verwer,
}

impl MaskPreset {
    /// All presets, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Chessboard,
        Self::CityBlock,
        Self::QuasiEuclidean,
        Self::Borgefors,
        Self::ChessKnight,
        Self::Verwer,
    ];

    /// Canonical lower-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Chessboard => "chessboard",
            Self::CityBlock => "city-block",
            Self::QuasiEuclidean => "quasi-euclidean",
            Self::Borgefors => "borgefors",
            Self::ChessKnight => "chess-knight",
            Self::Verwer => "verwer",
        }
    }

    /// Integer weights for 2D masks.
    #[must_use]
    pub fn integer_weights_2d(self) -> &'static [u16] {
        match self {
            Self::Chessboard => &[1, 1],
            Self::CityBlock => &[1, 2],
            Self::QuasiEuclidean => &[10, 14],
            Self::Borgefors => &[3, 4],
            Self::ChessKnight => &[5, 7, 11],
            Self::Verwer => &[12, 17, 27],
        }
    }

    /// Floating weights for 2D masks, in orthogonal-step units.
    ///
    /// These match the ratios of [`integer_weights_2d`](Self::integer_weights_2d)
    /// except for `QuasiEuclidean` and `Verwer`, whose floating tables hold the
    /// real-valued weights that the integer tables only approximate.
    #[must_use]
    pub fn float_weights_2d(self) -> &'static [f64] {
        match self {
            Self::Chessboard => &[1.0, 1.0],
            Self::CityBlock => &[1.0, 2.0],
            Self::QuasiEuclidean => &[1.0, SQRT_2],
            Self::Borgefors => &[1.0, 4.0 / 3.0],
            Self::ChessKnight => &[1.0, 1.4, 2.2],
            Self::Verwer => &[1.0, 1.4, 2.2062],
        }
    }

    /// Integer weights for 3D masks.
    #[must_use]
    pub fn integer_weights_3d(self) -> &'static [u16] {
        match self {
            Self::Chessboard => &[1, 1, 1],
            Self::CityBlock => &[1, 2, 3],
            Self::QuasiEuclidean => &[10, 14, 17],
            Self::Borgefors => &[3, 4, 5],
            Self::ChessKnight => &[3, 4, 5, 7, 7, 9],
            Self::Verwer => &[12, 17, 21, 27, 29, 36],
        }
    }

    /// Floating weights for 3D masks, in orthogonal-step units. Same
    /// conventions as [`float_weights_2d`](Self::float_weights_2d).
    #[must_use]
    pub fn float_weights_3d(self) -> &'static [f64] {
        match self {
            Self::Chessboard => &[1.0, 1.0, 1.0],
            Self::CityBlock => &[1.0, 2.0, 3.0],
            Self::QuasiEuclidean => &[1.0, SQRT_2, SQRT_3],
            Self::Borgefors => &[1.0, 4.0 / 3.0, 5.0 / 3.0],
            Self::ChessKnight => &[1.0, 4.0 / 3.0, 5.0 / 3.0, 7.0 / 3.0, 7.0 / 3.0, 3.0],
            Self::Verwer => &[1.0, SQRT_2, SQRT_3, SQRT_5, SQRT_6, 3.0],
        }
    }

    /// Builds the 2D mask of this preset with weight type `W`.
    ///
    /// # Errors
    ///
    /// Returns `MaskError::InvalidWeightSpec` only if a weight table is
    /// malformed, which the tables above never are.
    pub fn mask_2d<W: DistanceValue>(self) -> Result<ChamferMask<W>> {
        ChamferMask::from_weights_2d(&pick(
            self.integer_weights_2d(),
            self.float_weights_2d(),
        ))
    }

    /// Builds the 3D mask of this preset with weight type `W`.
    ///
    /// # Errors
    ///
    /// Returns `MaskError::InvalidWeightSpec` only if a weight table is
    /// malformed, which the tables above never are.
    pub fn mask_3d<W: DistanceValue>(self) -> Result<ChamferMask<W>> {
        ChamferMask::from_weights_3d(&pick(
            self.integer_weights_3d(),
            self.float_weights_3d(),
        ))
    }
}

fn pick<W: DistanceValue>(integer: &[u16], float: &[f64]) -> Vec<W> {
    integer
        .iter()
        .zip(float)
        .map(|(&i, &f)| W::from_preset_weight(i, f))
        .collect()
}

impl fmt::Display for MaskPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaskPreset {
    type Err = GeodesisError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        match key.as_str() {
            "chessboard" => Ok(Self::Chessboard),
            "cityblock" => Ok(Self::CityBlock),
            "quasieuclidean" => Ok(Self::QuasiEuclidean),
            "borgefors" => Ok(Self::Borgefors),
            "chessknight" => Ok(Self::ChessKnight),
            "verwer" => Ok(Self::Verwer),
            _ => Err(MaskError::InvalidWeightSpec(format!("unknown mask preset '{s}'")).into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Offset;
    use approx::assert_relative_eq;

    #[test]
    fn every_preset_builds_in_both_dimensions() {
        for preset in MaskPreset::ALL {
            assert!(preset.mask_2d::<u16>().is_ok(), "{preset}");
            assert!(preset.mask_2d::<f32>().is_ok(), "{preset}");
            assert!(preset.mask_3d::<u32>().is_ok(), "{preset}");
            assert!(preset.mask_3d::<f64>().is_ok(), "{preset}");
        }
    }

    #[test]
    fn names_parse_back() {
        for preset in MaskPreset::ALL {
            assert_eq!(preset.name().parse::<MaskPreset>().unwrap(), preset);
        }
        assert_eq!(
            "City Block".parse::<MaskPreset>().unwrap(),
            MaskPreset::CityBlock
        );
        assert_eq!(
            "QUASI_EUCLIDEAN".parse::<MaskPreset>().unwrap(),
            MaskPreset::QuasiEuclidean
        );
        assert!("octagonal".parse::<MaskPreset>().is_err());
    }

    #[test]
    fn quasi_euclidean_float_diagonal() {
        let mask = MaskPreset::QuasiEuclidean.mask_2d::<f64>().unwrap();
        assert_relative_eq!(mask.weight_of(Offset::new(1, 1, 0)).unwrap(), SQRT_2);
        let int = MaskPreset::QuasiEuclidean.mask_2d::<u16>().unwrap();
        assert_eq!(int.weight_of(Offset::new(-1, 1, 0)), Some(14));
    }

    #[test]
    fn float_tables_use_orthogonal_units() {
        for preset in MaskPreset::ALL {
            let tables = [
                (preset.integer_weights_2d(), preset.float_weights_2d()),
                (preset.integer_weights_3d(), preset.float_weights_3d()),
            ];
            for (integer, float) in tables {
                assert_eq!(integer.len(), float.len(), "{preset}");
                assert_relative_eq!(float[0], 1.0);
                let unit = f64::from(integer[0]);
                for (&i, &f) in integer.iter().zip(float) {
                    assert!((f64::from(i) / unit - f).abs() < 0.05, "{preset}: {i} vs {f}");
                }
            }
        }
        let borgefors = MaskPreset::Borgefors.mask_2d::<f64>().unwrap();
        assert_relative_eq!(borgefors.weight_of(Offset::new(1, 1, 0)).unwrap(), 4.0 / 3.0);
    }

    #[test]
    fn chess_knight_is_5x5() {
        let mask = MaskPreset::ChessKnight.mask_2d::<u32>().unwrap();
        assert_eq!(mask.radius(), 2);
        let mask3 = MaskPreset::ChessKnight.mask_3d::<u32>().unwrap();
        assert_eq!(mask3.radius(), 2);
    }
}
