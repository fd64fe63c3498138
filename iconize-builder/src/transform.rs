//! Resizing a source image onto a target pixel size

use crate::{Error, Result};
use iconize_core::AspectMode;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, RgbaImage};

const FILTER: FilterType = FilterType::Lanczos3;

/// Resizes `source` to exactly `width` x `height` pixels using `mode`
pub fn resize(source: &RgbaImage, width: u32, height: u32, mode: AspectMode) -> Result<RgbaImage> {
    if width == 0 || height == 0 || source.width() == 0 || source.height() == 0 {
        return Err(Error::RescalingFailed { width, height });
    }

    if source.dimensions() == (width, height) {
        return Ok(source.clone());
    }

    let resized = match mode {
        AspectMode::Stretch => imageops::resize(source, width, height, FILTER),
        AspectMode::Fit => fit(source, width, height),
        AspectMode::Fill => fill(source, width, height),
    };

    if resized.dimensions() != (width, height) {
        return Err(Error::RescalingFailed { width, height });
    }
    Ok(resized)
}

/// Size of `source` scaled to fit inside the target, keeping its aspect ratio
pub fn fit_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let scale = f64::min(
        target.0 as f64 / source.0 as f64,
        target.1 as f64 / source.1 as f64,
    );
    (
        scaled(source.0, scale).clamp(1, target.0),
        scaled(source.1, scale).clamp(1, target.1),
    )
}

/// Size of `source` scaled to cover the target, keeping its aspect ratio
pub fn fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let scale = f64::max(
        target.0 as f64 / source.0 as f64,
        target.1 as f64 / source.1 as f64,
    );
    (
        scaled(source.0, scale).max(target.0),
        scaled(source.1, scale).max(target.1),
    )
}

/// Offset that centers a `inner` long span within a `outer` long span
pub fn centered_offset(outer: u32, inner: u32) -> u32 {
    (outer.abs_diff(inner) as f64 / 2.0).round() as u32
}

/// Color used to pad the uncovered area in fit mode
pub fn background_color(source: &RgbaImage) -> Rgba<u8> {
    *source.get_pixel(0, 0)
}

fn scaled(length: u32, scale: f64) -> u32 {
    (length as f64 * scale).round() as u32
}

fn fit(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (scaled_width, scaled_height) = fit_dimensions(source.dimensions(), (width, height));
    let scaled = imageops::resize(source, scaled_width, scaled_height, FILTER);

    let mut canvas = ImageBuffer::from_pixel(width, height, background_color(source));
    let x = centered_offset(width, scaled_width);
    let y = centered_offset(height, scaled_height);
    imageops::replace(&mut canvas, &scaled, x as i64, y as i64);
    canvas
}

fn fill(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (scaled_width, scaled_height) = fill_dimensions(source.dimensions(), (width, height));
    let scaled = imageops::resize(source, scaled_width, scaled_height, FILTER);

    let x = centered_offset(scaled_width, width);
    let y = centered_offset(scaled_height, height);
    imageops::crop_imm(&scaled, x, y, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 100x50: left half red, right half blue, with a green corner pixel
    fn banner() -> RgbaImage {
        let mut image = ImageBuffer::from_fn(100, 50, |x, _| {
            if x < 50 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        image.put_pixel(0, 0, Rgba([0, 255, 0, 255]));
        image
    }

    #[test]
    fn test_fit_dimensions_keep_everything_visible() {
        assert_eq!(fit_dimensions((100, 50), (60, 60)), (60, 30));
        assert_eq!(fit_dimensions((50, 100), (60, 60)), (30, 60));
        assert_eq!(fit_dimensions((1024, 1024), (16, 16)), (16, 16));
        // extreme ratios never collapse to zero
        assert_eq!(fit_dimensions((1000, 1), (10, 10)), (10, 1));
    }

    #[test]
    fn test_fill_dimensions_cover_the_target() {
        assert_eq!(fill_dimensions((100, 50), (60, 60)), (120, 60));
        assert_eq!(fill_dimensions((50, 100), (60, 60)), (60, 120));
        assert_eq!(fill_dimensions((1024, 1024), (1242, 2688)), (2688, 2688));
    }

    #[test]
    fn test_centered_offset() {
        assert_eq!(centered_offset(60, 30), 15);
        assert_eq!(centered_offset(120, 60), 30);
        assert_eq!(centered_offset(61, 60), 1);
        assert_eq!(centered_offset(60, 60), 0);
    }

    #[test]
    fn test_fit_pads_with_corner_color() {
        let resized = resize(&banner(), 60, 60, AspectMode::Fit).unwrap();
        assert_eq!(resized.dimensions(), (60, 60));

        // scaled content is 60x30 placed at y = 15; rows above and below are padding
        let padding = Rgba([0, 255, 0, 255]);
        assert_eq!(*resized.get_pixel(30, 0), padding);
        assert_eq!(*resized.get_pixel(30, 14), padding);
        assert_eq!(*resized.get_pixel(30, 59), padding);
        assert_eq!(*resized.get_pixel(30, 45), padding);

        // both halves of the source are still present
        let left = resized.get_pixel(10, 30);
        let right = resized.get_pixel(50, 30);
        assert!(left[0] > 200 && left[2] < 50);
        assert!(right[2] > 200 && right[0] < 50);
    }

    #[test]
    fn test_fill_crops_the_overflowing_axis() {
        let resized = resize(&banner(), 60, 60, AspectMode::Fill).unwrap();
        assert_eq!(resized.dimensions(), (60, 60));

        // 120x60 intermediate cropped at x = 30: the split sits in the middle
        let left = resized.get_pixel(5, 30);
        let right = resized.get_pixel(55, 30);
        assert!(left[0] > 200 && left[2] < 50);
        assert!(right[2] > 200 && right[0] < 50);

        // the corner pixel was cropped away
        assert_ne!(*resized.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_stretch_ignores_aspect_ratio() {
        let resized = resize(&banner(), 40, 40, AspectMode::Stretch).unwrap();
        assert_eq!(resized.dimensions(), (40, 40));
        let left = resized.get_pixel(5, 20);
        let right = resized.get_pixel(35, 20);
        assert!(left[0] > 200);
        assert!(right[2] > 200);
    }

    #[test]
    fn test_rescaling_to_nothing_fails() {
        assert!(matches!(
            resize(&banner(), 0, 10, AspectMode::Fit),
            Err(Error::RescalingFailed { width: 0, height: 10 })
        ));
        let empty = RgbaImage::new(0, 0);
        assert!(resize(&empty, 10, 10, AspectMode::Fill).is_err());
    }
}
