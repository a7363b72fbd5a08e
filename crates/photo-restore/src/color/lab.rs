//! CIE L\*a\*b\* conversion with 8-bit channel encoding.
//!
//! Channels are stored the way 8-bit photo tools store Lab:
//!
//! | Channel | Float range | 8-bit encoding |
//! |---------|-------------|----------------|
//! | L\*     | 0..=100     | `L * 255 / 100` |
//! | a\*     | ~-128..=127 | `a + 128` |
//! | b\*     | ~-128..=127 | `b + 128` |
//!
//! Luminance-only operations (histogram equalization, CLAHE) edit the L
//! plane and leave a/b untouched, so hue and saturation structure survive.
//! Every enhancer goes through this one routine so the round trip drifts the
//! same way everywhere.

use crate::buffer::{saturate_u8, PixelBuffer, CHANNELS};
use crate::parallel::build_rows;

use super::lut::{linear_to_srgb, srgb_u8_to_linear};

/// D65 reference white
const D65_X: f32 = 0.95047;
const D65_Y: f32 = 1.0;
const D65_Z: f32 = 1.08883;

/// Linear sRGB to XYZ (D65)
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.119_192, 0.9503041],
];

/// XYZ (D65) to linear sRGB
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.969_266, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// CIE epsilon (216/24389)
const EPSILON: f32 = 0.008856;
/// CIE kappa (24389/27)
const KAPPA: f32 = 903.3;

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

#[inline]
fn lab_f_inv(f: f32) -> f32 {
    let cube = f * f * f;
    if cube > EPSILON {
        cube
    } else {
        (f - 16.0 / 116.0) / 7.787
    }
}

/// Convert one 8-bit sRGB pixel to 8-bit encoded L\*a\*b\*.
///
/// # Example
/// ```
/// use photo_restore::color::rgb_to_lab8;
///
/// let [l, a, b] = rgb_to_lab8([255, 255, 255]);
/// assert_eq!((l, a, b), (255, 128, 128));
/// ```
pub fn rgb_to_lab8(rgb: [u8; 3]) -> [u8; 3] {
    let r = srgb_u8_to_linear(rgb[0]);
    let g = srgb_u8_to_linear(rgb[1]);
    let b = srgb_u8_to_linear(rgb[2]);

    let m = &SRGB_TO_XYZ;
    let x = (m[0][0] * r + m[0][1] * g + m[0][2] * b) / D65_X;
    let y = (m[1][0] * r + m[1][1] * g + m[1][2] * b) / D65_Y;
    let z = (m[2][0] * r + m[2][1] * g + m[2][2] * b) / D65_Z;

    let fx = lab_f(x);
    let fy = lab_f(y);
    let fz = lab_f(z);

    let l = if y > EPSILON {
        116.0 * fy - 16.0
    } else {
        KAPPA * y
    };
    let a = 500.0 * (fx - fy);
    let bb = 200.0 * (fy - fz);

    [
        saturate_u8(l * 255.0 / 100.0),
        saturate_u8(a + 128.0),
        saturate_u8(bb + 128.0),
    ]
}

/// Convert one 8-bit encoded L\*a\*b\* pixel back to 8-bit sRGB.
///
/// Out-of-gamut results are clamped per channel.
pub fn lab8_to_rgb(lab: [u8; 3]) -> [u8; 3] {
    let l = lab[0] as f32 * 100.0 / 255.0;
    let a = lab[1] as f32 - 128.0;
    let b = lab[2] as f32 - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let y = if l > KAPPA * EPSILON {
        fy * fy * fy
    } else {
        l / KAPPA
    };
    let x = lab_f_inv(fx) * D65_X;
    let y = y * D65_Y;
    let z = lab_f_inv(fz) * D65_Z;

    let m = &XYZ_TO_SRGB;
    let lr = m[0][0] * x + m[0][1] * y + m[0][2] * z;
    let lg = m[1][0] * x + m[1][1] * y + m[1][2] * z;
    let lb = m[2][0] * x + m[2][1] * y + m[2][2] * z;

    [
        saturate_u8(linear_to_srgb(lr) * 255.0),
        saturate_u8(linear_to_srgb(lg) * 255.0),
        saturate_u8(linear_to_srgb(lb) * 255.0),
    ]
}

/// An image split into 8-bit L, a and b planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabImage {
    pub width: usize,
    pub height: usize,
    /// Lightness plane (0..=255 encodes L\* 0..=100)
    pub l: Vec<u8>,
    /// Green-red plane, 128 = neutral
    pub a: Vec<u8>,
    /// Blue-yellow plane, 128 = neutral
    pub b: Vec<u8>,
}

impl LabImage {
    /// Split an RGB buffer into L, a, b planes.
    pub fn from_rgb(buffer: &PixelBuffer) -> Self {
        let (width, height) = buffer.dimensions();
        let src = buffer.as_bytes();

        let interleaved: Vec<u8> = build_rows(width * CHANNELS, height, |y, row| {
            let start = y * width * CHANNELS;
            let src_row = &src[start..start + width * CHANNELS];
            for (dst, px) in row.chunks_exact_mut(CHANNELS).zip(src_row.chunks_exact(CHANNELS)) {
                dst.copy_from_slice(&rgb_to_lab8([px[0], px[1], px[2]]));
            }
        });

        let mut l = Vec::with_capacity(width * height);
        let mut a = Vec::with_capacity(width * height);
        let mut b = Vec::with_capacity(width * height);
        for px in interleaved.chunks_exact(CHANNELS) {
            l.push(px[0]);
            a.push(px[1]);
            b.push(px[2]);
        }

        Self {
            width,
            height,
            l,
            a,
            b,
        }
    }

    /// Recombine the planes into an RGB buffer.
    pub fn to_rgb(&self) -> PixelBuffer {
        let width = self.width;
        let data = build_rows(width * CHANNELS, self.height, |y, row| {
            for (x, dst) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let i = y * width + x;
                dst.copy_from_slice(&lab8_to_rgb([self.l[i], self.a[i], self.b[i]]));
            }
        });
        PixelBuffer::from_raw(self.width, self.height, data)
    }
}
