mod labels;

pub use labels::{binarize, LabelSet};

use std::ops::{Index, IndexMut};

use crate::error::{RasterError, Result};
use crate::math::{Offset, Position};

/// Extent of a raster along each axis. 2D rasters have `depth == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    /// Number of columns (x axis).
    pub width: usize,
    /// Number of rows (y axis).
    pub height: usize,
    /// Number of slices (z axis).
    pub depth: usize,
}

impl Dims {
    /// Creates 2D dimensions.
    #[must_use]
    pub fn new_2d(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: 1,
        }
    }

    /// Creates 3D dimensions.
    #[must_use]
    pub fn new_3d(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Total number of pixels (voxels), saturating at `usize::MAX`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.width
            .saturating_mul(self.height)
            .saturating_mul(self.depth)
    }

    /// Total number of pixels, or `None` when the product overflows or an
    /// axis is too long to be addressed by an `i32` coordinate.
    #[must_use]
    pub fn checked_len(&self) -> Option<usize> {
        let limit = usize::try_from(i32::MAX).unwrap_or(usize::MAX);
        if self.width > limit || self.height > limit || self.depth > limit {
            return None;
        }
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.depth)
    }

    /// Rejects empty or unaddressable dimensions, returning the pixel count.
    fn validate(self) -> Result<usize> {
        if self.is_empty() {
            return Err(RasterError::EmptyRaster.into());
        }
        self.checked_len()
            .ok_or_else(|| RasterError::TooLarge(self).into())
    }

    /// Returns whether any axis has zero extent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the raster spans more than one slice.
    #[must_use]
    pub fn is_3d(&self) -> bool {
        self.depth > 1
    }

    /// Returns whether `p` addresses a pixel inside these dimensions.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn contains(&self, p: Position) -> bool {
        p.x >= 0
            && p.y >= 0
            && p.z >= 0
            && (p.x as usize) < self.width
            && (p.y as usize) < self.height
            && (p.z as usize) < self.depth
    }

    /// Linear index of `p` in raster-scan order, or `None` out of bounds.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn index_of(&self, p: Position) -> Option<usize> {
        self.contains(p).then(|| {
            (p.z as usize * self.height + p.y as usize) * self.width + p.x as usize
        })
    }

    /// Position of the pixel stored at linear index `index`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn position_of(&self, index: usize) -> Position {
        let x = index % self.width;
        let y = (index / self.width) % self.height;
        let z = index / (self.width * self.height);
        Position::new(x as i32, y as i32, z as i32)
    }

    /// Linear index of the neighbor `index + offset`, or `None` when the
    /// neighbor falls outside. Never wraps across rows or slices.
    #[must_use]
    pub fn neighbor_index(&self, index: usize, offset: Offset) -> Option<usize> {
        self.index_of(self.position_of(index) + offset)
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// A dense 2D or 3D grid of values stored in raster-scan order
/// (x fastest, then y, then z).
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    dims: Dims,
    data: Vec<T>,
}

impl<T: Copy> Raster<T> {
    /// Creates a raster filled with `value`.
    ///
    /// # Errors
    ///
    /// - `RasterError::EmptyRaster` if any dimension is zero
    /// - `RasterError::TooLarge` if the pixel count overflows or an axis
    ///   exceeds `i32::MAX`
    pub fn new(dims: Dims, value: T) -> Result<Self> {
        let len = dims.validate()?;
        Ok(Self {
            dims,
            data: vec![value; len],
        })
    }

    /// Wraps existing raster-scan ordered data.
    ///
    /// # Errors
    ///
    /// - `RasterError::EmptyRaster` if any dimension is zero
    /// - `RasterError::TooLarge` if `dims` cannot be addressed
    /// - `RasterError::DimensionMismatch` if `data.len()` disagrees with `dims`
    pub fn from_vec(dims: Dims, data: Vec<T>) -> Result<Self> {
        let len = dims.validate()?;
        if data.len() != len {
            return Err(RasterError::DimensionMismatch {
                expected: format!("{len} values for {dims}"),
                found: format!("{} values", data.len()),
            }
            .into());
        }
        Ok(Self { dims, data })
    }

    /// Builds a 2D raster from rows of equal length.
    ///
    /// # Errors
    ///
    /// - `RasterError::EmptyRaster` if there are no rows or the rows are empty
    /// - `RasterError::DimensionMismatch` if the rows are ragged
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(RasterError::DimensionMismatch {
                    expected: format!("{width} columns"),
                    found: format!("{} columns in row {y}", row.len()),
                }
                .into());
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(Dims::new_2d(width, rows.len()), data)
    }

    /// Returns the value at `p`, or `None` if `p` is outside the raster.
    #[must_use]
    pub fn get(&self, p: Position) -> Option<T> {
        self.dims.index_of(p).map(|i| self.data[i])
    }

    /// Stores `value` at `p`.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::OutOfBounds` if `p` is outside the raster.
    pub fn set(&mut self, p: Position, value: T) -> Result<()> {
        let i = self
            .dims
            .index_of(p)
            .ok_or(RasterError::OutOfBounds(p))?;
        self.data[i] = value;
        Ok(())
    }

    /// Applies `f` to every value, producing a raster of the same shape.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(&self, f: F) -> Raster<U> {
        Raster {
            dims: self.dims,
            data: self.data.iter().copied().map(f).collect(),
        }
    }
}

impl<T> Raster<T> {
    /// Dimensions of the raster.
    #[must_use]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false` for a constructed raster; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw values in raster-scan order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw values in raster-scan order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the raster, returning its values.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Checks that `other` has the same dimensions as `self`.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::DimensionMismatch` otherwise.
    pub fn ensure_same_dims<U>(&self, other: &Raster<U>) -> Result<()> {
        if self.dims == other.dims {
            Ok(())
        } else {
            Err(RasterError::DimensionMismatch {
                expected: self.dims.to_string(),
                found: other.dims.to_string(),
            }
            .into())
        }
    }
}

impl<T> Index<usize> for Raster<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Raster<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}
