//! Pixel containers
//!
//! Three representations flow through the pipeline:
//!
//! - [`PixelBuffer`]: interleaved 8-bit RGB, the pipeline's input and output
//! - [`FloatBuffer`]: interleaved RGB normalized to 0.0..=1.0
//! - [`Plane`]: a single-channel `f32` grid (dark channel, transmission, guide)
//!
//! Conversions between the 8-bit and float forms go through
//! [`u8_to_unit`] and [`unit_to_u8`] so every stage rounds the same way.

use crate::error::RestoreError;
use crate::parallel::map_samples;

/// Samples per pixel in the interleaved buffers.
pub const CHANNELS: usize = 3;

/// Convert an 8-bit sample to the 0.0..=1.0 range.
#[inline]
pub fn u8_to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

/// Convert a 0.0..=1.0 sample to 8 bits. Rounds, clamps, and maps NaN to 0.
#[inline]
pub fn unit_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Round and clamp an intermediate value on the 0..=255 scale.
#[inline]
pub(crate) fn saturate_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

fn check_dimensions(
    width: usize,
    height: usize,
    len: usize,
    per_pixel: usize,
) -> Result<(), RestoreError> {
    if width == 0 || height == 0 {
        return Err(RestoreError::EmptyImage);
    }
    let expected = width * height * per_pixel;
    if len != expected {
        return Err(RestoreError::DimensionMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Interleaved 8-bit RGB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGB samples (`width * height * 3` bytes, row-major).
    ///
    /// # Example
    /// ```
    /// use photo_restore::PixelBuffer;
    ///
    /// let buffer = PixelBuffer::new(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
    /// assert_eq!(buffer.pixel(1, 0), [0, 0, 255]);
    /// ```
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, RestoreError> {
        check_dimensions(width, height, data.len(), CHANNELS)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// An image where every pixel has the same color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self, RestoreError> {
        let data = rgb.repeat(width * height);
        Self::new(width, height, data)
    }

    /// Build an image from a per-pixel function of `(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self, RestoreError>
    where
        F: Fn(usize, usize) -> [u8; 3],
    {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// Internal constructor for buffers whose size is correct by construction.
    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * CHANNELS);
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Raw interleaved RGB samples.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its samples.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// RGB triple at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(CHANNELS).map(|p| [p[0], p[1], p[2]])
    }

    /// Apply a per-sample function to every channel of every pixel.
    pub(crate) fn map_samples<F>(&self, f: F) -> PixelBuffer
    where
        F: Fn(u8) -> u8 + Sync,
    {
        let data = map_samples(&self.data, |&v| f(v));
        PixelBuffer::from_raw(self.width, self.height, data)
    }

    /// Normalize to 0.0..=1.0 floats.
    pub fn to_float(&self) -> FloatBuffer {
        FloatBuffer {
            width: self.width,
            height: self.height,
            data: map_samples(&self.data, |&v| u8_to_unit(v)),
        }
    }
}

/// Interleaved RGB image with samples normalized to 0.0..=1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatBuffer {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl FloatBuffer {
    /// Wrap raw float samples (`width * height * 3`, row-major).
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, RestoreError> {
        check_dimensions(width, height, data.len(), CHANNELS)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width * height * CHANNELS);
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        let i = (y * self.width + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Pixel by flat row-major index.
    #[inline]
    pub fn pixel_at(&self, index: usize) -> [f32; 3] {
        let i = index * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Quantize back to 8 bits with [`unit_to_u8`].
    pub fn to_u8(&self) -> PixelBuffer {
        PixelBuffer::from_raw(
            self.width,
            self.height,
            map_samples(&self.data, |&v| unit_to_u8(v)),
        )
    }
}

/// Single-channel `f32` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Plane {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, RestoreError> {
        check_dimensions(width, height, data.len(), 1)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Element-wise map into a new plane.
    pub fn map<F>(&self, f: F) -> Plane
    where
        F: Fn(f32) -> f32 + Sync,
    {
        Plane::from_raw(self.width, self.height, map_samples(&self.data, |&v| f(v)))
    }

    /// Element-wise combination of two planes of equal size.
    pub(crate) fn zip_map<F>(&self, other: &Plane, f: F) -> Plane
    where
        F: Fn(f32, f32) -> f32,
    {
        debug_assert_eq!(self.data.len(), other.data.len());
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Plane::from_raw(self.width, self.height, data)
    }

    /// Smallest and largest value.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert!(PixelBuffer::new(2, 2, vec![0; 12]).is_ok());
        assert_eq!(
            PixelBuffer::new(2, 2, vec![0; 11]),
            Err(RestoreError::DimensionMismatch {
                expected: 12,
                actual: 11
            })
        );
        assert_eq!(PixelBuffer::new(0, 2, vec![]), Err(RestoreError::EmptyImage));
    }

    #[test]
    fn test_unit_conversions() {
        for v in 0..=255u8 {
            assert_eq!(unit_to_u8(u8_to_unit(v)), v);
        }
        assert_eq!(unit_to_u8(-0.2), 0);
        assert_eq!(unit_to_u8(1.7), 255);
        assert_eq!(unit_to_u8(f32::NAN), 0);
        assert_eq!(unit_to_u8(0.5), 128);
    }

    #[test]
    fn test_float_round_trip_is_lossless() {
        let buffer = PixelBuffer::from_fn(5, 4, |x, y| [x as u8 * 50, y as u8 * 60, 7]).unwrap();
        assert_eq!(buffer.to_float().to_u8(), buffer);
    }

    #[test]
    fn test_pixel_access() {
        let buffer = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 9]).unwrap();
        assert_eq!(buffer.pixel(2, 1), [2, 1, 9]);
        assert_eq!(buffer.pixels().count(), 6);
        let float = buffer.to_float();
        assert_eq!(float.pixel_at(5), float.pixel(2, 1));
    }

    #[test]
    fn test_plane_min_max() {
        let plane = Plane::new(2, 2, vec![0.3, -1.0, 2.5, 0.0]).unwrap();
        assert_eq!(plane.min_max(), (-1.0, 2.5));
        let doubled = plane.map(|v| v * 2.0);
        assert_eq!(doubled.get(0, 1), 5.0);
    }
}
