//! Decoding source images and encoding generated images as PNG

use crate::Result;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use std::io::{Cursor, Write};
use std::path::Path;

/// Background opaque images are flattened onto
const FLATTEN_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Whether the alpha channel is kept in the written PNG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaPolicy {
    Keep,
    /// Flatten onto white and write an RGB image
    Strip,
}

/// Decodes an image file of any supported format into RGBA
pub fn decode_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)?;
    Ok(image.to_rgba8())
}

/// Encodes an RGBA image as PNG bytes
pub fn encode_png(image: &RgbaImage, alpha: AlphaPolicy) -> Result<Vec<u8>> {
    let dynamic = match alpha {
        AlphaPolicy::Keep => DynamicImage::ImageRgba8(image.clone()),
        AlphaPolicy::Strip => DynamicImage::ImageRgb8(flatten(image, FLATTEN_BACKGROUND)),
    };

    let mut buffer = Cursor::new(Vec::new());
    dynamic.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Writes an RGBA image as a PNG file, replacing `path` atomically
pub fn write_png(image: &RgbaImage, path: &Path, alpha: AlphaPolicy) -> Result<()> {
    let data = encode_png(image, alpha)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(&data)?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Blends every pixel onto an opaque background
pub fn flatten(image: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let alpha = pixel[3] as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;

        Rgb([
            (pixel[0] as f32 * alpha + background[0] as f32 * inv_alpha).round() as u8,
            (pixel[1] as f32 * alpha + background[1] as f32 * inv_alpha).round() as u8,
            (pixel[2] as f32 * alpha + background[2] as f32 * inv_alpha).round() as u8,
        ])
    })
}
