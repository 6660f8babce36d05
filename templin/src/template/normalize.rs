use crate::error::{Error, Result};
use crate::tensor::{Dim2, Dims, ITensor, Tensor, Tensor2};
use crate::{NUM_CLASSES, TILE_EDGE};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage};
use log::debug;
use std::path::Path;

/// Canvas height, ten tiles stacked vertically.
pub const CANVAS_HEIGHT: usize = NUM_CLASSES * TILE_EDGE;
/// Canvas width, one tile.
pub const CANVAS_WIDTH: usize = TILE_EDGE;

/// Loads a template image from disk and normalizes it, see [`normalize_template`].
pub fn load_template<P: AsRef<Path>>(path: P, eta: f32) -> Result<Tensor2<f32>> {
    check_eta(eta)?;
    normalize_template(&decode_template(path)?, eta)
}

/// Reads and decodes a template image in any format supported by `image`.
pub fn decode_template<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(Error::io(path))?;
    let image = image::load_from_memory(&bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded template {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}

pub(crate) fn check_eta(eta: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&eta) {
        return Err(Error::InvalidEta(eta));
    }
    Ok(())
}

/// Produces the normalized `(280, 28)` canvas of a template image.
///
/// The image is reduced to one intensity channel by averaging its channels, blended with
/// its inverse by `eta` (see [`blend_inverted`]), resized to the canvas with bicubic
/// interpolation and finally min-max normalized into `[-1, 1]`.
pub fn normalize_template(image: &DynamicImage, eta: f32) -> Result<Tensor2<f32>> {
    check_eta(eta)?;
    let (width, height) = image.dimensions();
    let blended: Vec<u8> = channel_mean(image)
        .into_iter()
        .map(|p| blend_inverted(p, eta) as u8)
        .collect();
    let gray = GrayImage::from_raw(width, height, blended)
        .ok_or_else(|| Error::shape(format!("{width}x{height} pixels"), "a shorter buffer"))?;
    let resized = imageops::resize(
        &gray,
        CANVAS_WIDTH as u32,
        CANVAS_HEIGHT as u32,
        FilterType::CatmullRom,
    );
    let pixels: Vec<f32> = resized.into_raw().into_iter().map(f32::from).collect();
    let canvas = Tensor::from_vec(pixels, Dim2(CANVAS_HEIGHT, CANVAS_WIDTH));
    min_max_normalize(&canvas)
}

/// Blends an intensity with its inverse: `(1 - eta) * pixel + eta * (255 - pixel)`.
#[inline]
pub fn blend_inverted(pixel: f32, eta: f32) -> f32 {
    (1.0 - eta) * pixel + eta * (255.0 - pixel)
}

/// Linearly maps the tensor so its minimum becomes -1 and its maximum +1.
pub fn min_max_normalize<D: Dims>(tensor: &Tensor<f32, D>) -> Result<Tensor<f32, D>> {
    let (min, max) = tensor
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    if tensor.iter().next().is_none() {
        return Err(Error::shape("a non-empty canvas", tensor.dims()));
    }
    if !(max > min) {
        return Err(Error::DegenerateImage { value: min });
    }
    debug!("Normalizing canvas with intensity range [{min}, {max}]");
    let range = max - min;
    Ok(tensor.map(|&x| 2.0 * (x - min) / range - 1.0))
}

/// Per-pixel mean over the native channels of the image, alpha included.
fn channel_mean(image: &DynamicImage) -> Vec<f32> {
    let channels = usize::from(image.color().channel_count()).clamp(1, 4);
    let raw = match channels {
        1 => image.to_luma8().into_raw(),
        2 => image.to_luma_alpha8().into_raw(),
        3 => image.to_rgb8().into_raw(),
        _ => image.to_rgba8().into_raw(),
    };
    if channels == 1 {
        return raw.into_iter().map(f32::from).collect();
    }
    raw.chunks_exact(channels)
        .map(|px| px.iter().map(|&c| f32::from(c)).sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tensor::Tensor1;
    use approx::assert_abs_diff_eq;
    use image::{ImageBuffer, Luma, Rgb, Rgba};

    fn gradient_template() -> DynamicImage {
        DynamicImage::ImageLuma8(ImageBuffer::from_fn(28, 280, |x, y| {
            Luma([((x + y) % 200) as u8 + 20])
        }))
    }

    #[test]
    fn test_blend_inverted() {
        assert_eq!(blend_inverted(40.0, 0.0), 40.0);
        assert_eq!(blend_inverted(40.0, 1.0), 215.0);
        assert_eq!(blend_inverted(0.0, 1.0), 255.0);
        assert_abs_diff_eq!(blend_inverted(40.0, 0.25), 0.75 * 40.0 + 0.25 * 215.0, epsilon = 1e-4);
        assert_abs_diff_eq!(blend_inverted(100.0, 0.5), 127.5, epsilon = 1e-4);
    }

    #[test]
    fn test_min_max_bounds() {
        let canvas = normalize_template(&gradient_template(), 0.0).unwrap();
        assert_eq!(canvas.dims(), &Dim2(CANVAS_HEIGHT, CANVAS_WIDTH));
        let min = canvas.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = canvas.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, -1.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_min_max_is_affine() {
        let t = Tensor1::from_vec_1d(vec![10.0, 20.0, 30.0, 50.0]);
        let n = min_max_normalize(&t).unwrap();
        assert_abs_diff_eq!(n.as_ref(), &[-1.0f32, -0.5, 0.0, 1.0][..], epsilon = 1e-6);
        let shifted = t.map(|&x| 3.0 * x - 7.0);
        assert_abs_diff_eq!(min_max_normalize(&shifted).unwrap().as_ref(), n.as_ref(), epsilon = 1e-6);
    }

    #[test]
    fn test_empty_tensor_is_a_shape_error() {
        let empty: Tensor1<f32> = Tensor1::from_vec_1d(vec![]);
        let err = min_max_normalize(&empty).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
        assert!(err.to_string().contains("(0)"));
    }

    #[test]
    fn test_full_inversion_mirrors_canvas() {
        let original = normalize_template(&gradient_template(), 0.0).unwrap();
        let inverted = normalize_template(&gradient_template(), 1.0).unwrap();
        for (&a, &b) in original.iter().zip(inverted.iter()) {
            assert_abs_diff_eq!(a, -b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_flat_image_is_rejected() {
        let flat = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(28, 280, Luma([77u8])));
        match normalize_template(&flat, 0.0) {
            Err(Error::DegenerateImage { value }) => assert_eq!(value, 77.0),
            other => panic!("expected a degenerate image error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_eta() {
        assert!(matches!(
            normalize_template(&gradient_template(), 1.5),
            Err(Error::InvalidEta(_))
        ));
        assert!(matches!(
            normalize_template(&gradient_template(), -0.1),
            Err(Error::InvalidEta(_))
        ));
    }

    #[test]
    fn test_rgb_channels_are_averaged() {
        let rgb = DynamicImage::ImageRgb8(ImageBuffer::from_fn(28, 280, |_, y| {
            if y < 140 { Rgb([30, 60, 90]) } else { Rgb([0, 0, 0]) }
        }));
        assert_eq!(channel_mean(&rgb)[0], 60.0);
        let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(2, 2, Rgba([10, 20, 30, 255])));
        assert_eq!(channel_mean(&rgba), vec![78.75; 4]);
    }

    #[test]
    fn test_resize_to_canvas() {
        let small = DynamicImage::ImageLuma8(ImageBuffer::from_fn(14, 140, |_, y| {
            Luma([if y < 70 { 0 } else { 255 }])
        }));
        let canvas = normalize_template(&small, 0.0).unwrap();
        assert_eq!(canvas.dims(), &Dim2(280, 28));
        assert_eq!(canvas[0], -1.0);
        assert_eq!(canvas[canvas.len() - 1], 1.0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_template("/definitely/not/here.png", 0.0).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_undecodable_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not an image").unwrap();
        let err = load_template(file.path(), 0.0).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
