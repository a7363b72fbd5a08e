//! Test fixtures: generated images and multipart bodies.

use std::io::Cursor;

/// Multipart boundary used by [`MultipartBody`]
pub const BOUNDARY: &str = "clearview-test-boundary";

/// Mode tags accepted by the server
pub mod modes {
    pub const LOW_LIGHT: &str = "low_light";
    pub const FOG: &str = "fog";
    pub const SMOKE: &str = "smoke";
    /// Not a mode; images pass through unchanged
    pub const UNKNOWN: &str = "sepia";
}

/// Encode interleaved RGB samples as PNG
pub fn png_from_rgb(width: u32, height: u32, rgb: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("PNG header");
        writer.write_image_data(rgb).expect("PNG data");
    }
    buf.into_inner()
}

/// A dim, noisy night scene
pub fn dark_png(width: u32, height: u32) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let base = ((x + y) % 24) as u8 + 8;
            rgb.extend_from_slice(&[base, base + 2, base + 6]);
        }
    }
    png_from_rgb(width, height, &rgb)
}

/// A low-contrast gray-blue scene, brighter at the top
pub fn foggy_png(width: u32, height: u32) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let lift = (200 - 60 * y / height.max(1)) as u8;
            let detail = if (x / 4 + y / 4) % 2 == 0 { 0 } else { 12 };
            rgb.extend_from_slice(&[lift - detail, lift - detail + 4, lift + 10]);
        }
    }
    png_from_rgb(width, height, &rgb)
}

/// Pseudo-random pixels; compresses poorly
pub fn noisy_png(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    let rgb: Vec<u8> = (0..width * height * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    png_from_rgb(width, height, &rgb)
}

/// Same pixels as [`dark_png`], encoded as JPEG
pub fn dark_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        let base = ((x + y) % 24) as u8 + 8;
        image::Rgb([base, base + 2, base + 6])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg)
        .expect("JPEG encode");
    buf.into_inner()
}

/// Decode a PNG response body to `(width, height, rgb)`
pub fn decode_png(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
    let rgb = image::load_from_memory(bytes)
        .expect("decodable image")
        .into_rgb8();
    let (w, h) = rgb.dimensions();
    (w, h, rgb.into_raw())
}

/// Builder for `multipart/form-data` request bodies
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file part
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Add a PNG `image` part
    pub fn image(self, file_name: &str, bytes: &[u8]) -> Self {
        self.file("image", file_name, "image/png", bytes)
    }

    /// Add a plain text part
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
        self
    }

    /// Close the body
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}
