//! Conversion between uploaded files and [`PixelBuffer`]s.

use crate::error::ProcessError;
use photo_restore::PixelBuffer;
use std::io::Cursor;

/// Decode any supported upload (PNG, JPEG, BMP, GIF, TIFF, WebP) to RGB.
///
/// Alpha is dropped and 16-bit sources are reduced to 8 bits.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, ProcessError> {
    let rgb = image::load_from_memory(bytes)
        .map_err(|e| ProcessError::Decode(e.to_string()))?
        .into_rgb8();

    let (width, height) = rgb.dimensions();
    PixelBuffer::new(width as usize, height as usize, rgb.into_raw()).map_err(ProcessError::from)
}

/// Encode an RGB buffer as an 8-bit truecolor PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ProcessError> {
    let width = u32::try_from(buffer.width())
        .map_err(|_| ProcessError::PngEncode("image too wide".to_string()))?;
    let height = u32::try_from(buffer.height())
        .map_err(|_| ProcessError::PngEncode("image too tall".to_string()))?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ProcessError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(buffer.as_bytes())
            .map_err(|e| ProcessError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
