//! Grayscale conversion with Rec. 601 luma weights.

use crate::buffer::{saturate_u8, FloatBuffer, PixelBuffer, Plane};
use crate::parallel::map_samples;

const WEIGHT_R: f32 = 0.299;
const WEIGHT_G: f32 = 0.587;
const WEIGHT_B: f32 = 0.114;

/// Luma of an RGB triple on whatever scale the input uses.
#[inline]
pub fn luma(rgb: [f32; 3]) -> f32 {
    WEIGHT_R * rgb[0] + WEIGHT_G * rgb[1] + WEIGHT_B * rgb[2]
}

/// 8-bit grayscale, one rounded sample per pixel.
pub fn gray_u8(buffer: &PixelBuffer) -> Vec<u8> {
    let pixels: Vec<[u8; 3]> = buffer.pixels().collect();
    map_samples(&pixels, |p| {
        saturate_u8(luma([p[0] as f32, p[1] as f32, p[2] as f32]))
    })
}

/// Mean of the 8-bit grayscale image.
pub fn mean_gray(buffer: &PixelBuffer) -> f64 {
    let gray = gray_u8(buffer);
    let total: u64 = gray.iter().map(|&v| v as u64).sum();
    total as f64 / gray.len() as f64
}

/// Grayscale plane of a float image, values stay in 0.0..=1.0.
pub fn gray_plane(buffer: &FloatBuffer) -> Plane {
    let data = buffer
        .as_slice()
        .chunks_exact(3)
        .map(|p| luma([p[0], p[1], p[2]]))
        .collect();
    Plane::from_raw(buffer.width(), buffer.height(), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_weights_sum_to_one() {
        assert!((luma([1.0, 1.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((luma([255.0, 0.0, 0.0]) - 76.245).abs() < 1e-3);
    }

    #[test]
    fn test_gray_u8_values() {
        let buffer = PixelBuffer::new(2, 1, vec![255, 255, 255, 255, 0, 0]).unwrap();
        assert_eq!(gray_u8(&buffer), vec![255, 76]);
    }

    #[test]
    fn test_mean_gray() {
        let black = PixelBuffer::filled(10, 10, [0, 0, 0]).unwrap();
        assert_eq!(mean_gray(&black), 0.0);

        let half =
            PixelBuffer::from_fn(2, 1, |x, _| if x == 0 { [0; 3] } else { [200; 3] }).unwrap();
        assert!((mean_gray(&half) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_gray_plane_matches_luma() {
        let buffer = PixelBuffer::from_fn(3, 3, |x, y| [x as u8 * 80, y as u8 * 80, 40]).unwrap();
        let float = buffer.to_float();
        let plane = gray_plane(&float);
        assert!((plane.get(2, 1) - luma(float.pixel(2, 1))).abs() < 1e-6);
        let (lo, hi) = plane.min_max();
        assert!(lo >= 0.0 && hi <= 1.0);
    }
}
