//! Fixed-size elevation grid shared by the world generator and the mesher.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeightmapError {
    #[error("heightmap {width}x{height} needs {expected} samples, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Column-major grid of elevations: sample `(x, y)` lives at `x * height + y`.
///
/// The same flattening is used for terrain vertex indices, so a heightmap
/// index is also the index of the vertex built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl Heightmap {
    /// A grid with every sample set to `value`.
    pub fn flat(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            samples: vec![value; width as usize * height as usize],
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for x in 0..width {
            for y in 0..height {
                samples.push(f(x, y));
            }
        }
        Self { width, height, samples }
    }

    /// Wrap an existing column-major sample vector.
    pub fn from_vec(width: u32, height: u32, samples: Vec<f32>) -> Result<Self, HeightmapError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(HeightmapError::SizeMismatch {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self { width, height, samples })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        x as usize * self.height as usize + y as usize
    }

    /// Sample at an in-grid cell. Panics if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        debug_assert!(x < self.width && y < self.height);
        self.samples[self.index(x, y)]
    }

    /// Sample at a signed cell; anything outside the grid reads as `0.0`.
    #[inline]
    pub fn get_or_zero(&self, x: i64, y: i64) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0.0;
        }
        self.samples[self.index(x as u32, y as u32)]
    }

    /// Sample nearest to a continuous grid position, clamped into the grid.
    pub fn sample_clamped(&self, x: f32, y: f32) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let cx = x.clamp(0.0, (self.width - 1) as f32) as u32;
        let cy = y.clamp(0.0, (self.height - 1) as f32) as u32;
        self.get(cx, cy)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Lowest and highest sample, or `None` for an empty grid.
    pub fn range(&self) -> Option<(f32, f32)> {
        self.samples.iter().fold(None, |acc, &h| match acc {
            None => Some((h, h)),
            Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_is_column_major() {
        let map = Heightmap::from_fn(3, 2, |x, y| (x * 10 + y) as f32);
        assert_eq!(map.samples(), &[0.0, 1.0, 10.0, 11.0, 20.0, 21.0]);
        assert_eq!(map.get(2, 1), 21.0);
        assert_eq!(map.index(1, 1), 3);
    }

    #[test]
    fn out_of_grid_reads_zero() {
        let map = Heightmap::flat(4, 4, 7.0);
        assert_eq!(map.get_or_zero(-1, 0), 0.0);
        assert_eq!(map.get_or_zero(0, 4), 0.0);
        assert_eq!(map.get_or_zero(3, 3), 7.0);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = Heightmap::from_vec(2, 2, vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            HeightmapError::SizeMismatch { width: 2, height: 2, expected: 4, actual: 3 }
        );
        assert!(Heightmap::from_vec(2, 2, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn sample_clamped_stays_in_grid() {
        let map = Heightmap::from_fn(4, 4, |x, y| (x + y) as f32);
        assert_eq!(map.sample_clamped(-50.0, -3.0), 0.0);
        assert_eq!(map.sample_clamped(100.0, 100.0), 6.0);
        assert_eq!(map.sample_clamped(1.7, 2.2), 3.0);
    }

    #[test]
    fn range_of_samples() {
        let map = Heightmap::from_fn(2, 2, |x, y| x as f32 - y as f32);
        assert_eq!(map.range(), Some((-1.0, 1.0)));
        assert_eq!(Heightmap::flat(0, 0, 0.0).range(), None);
    }
}
