//! Conversion of image arrays into in-memory raster figures.
use std::io::Cursor;

use anyhow::Context;
use image::{imageops, Rgb, RgbImage};
use ndarray::{Array4, ArrayView3, Axis};

use crate::error::RadioPrepError;

/// Convert a `(channels, height, width)` array with values in [0, 1] into
/// an 8-bit RGB image. Single-channel input is replicated across RGB;
/// values outside [0, 1] are clamped.
pub fn to_rgb_image(image: &ArrayView3<f32>) -> Result<RgbImage, RadioPrepError> {
    let shape = image.shape();
    let (channels, height, width) = (shape[0], shape[1], shape[2]);
    if channels != 1 && channels != 3 {
        return Err(RadioPrepError::UnsupportedChannels(channels));
    }

    let mut out = RgbImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let pixel = if channels == 1 {
                let v = to_u8(image[[0, y, x]]);
                Rgb([v, v, v])
            } else {
                Rgb([
                    to_u8(image[[0, y, x]]),
                    to_u8(image[[1, y, x]]),
                    to_u8(image[[2, y, x]]),
                ])
            };
            out.put_pixel(x as u32, y as u32, pixel);
        }
    }
    Ok(out)
}

/// Tile a batch of samples into one grid image with `per_row` tiles per
/// row; the last row may be partially filled.
pub fn mosaic(images: &Array4<f32>, per_row: usize) -> Result<RgbImage, RadioPrepError> {
    if per_row == 0 {
        return Err(RadioPrepError::ZeroSize("per_row"));
    }
    let n = images.shape()[0];
    if n == 0 {
        return Err(RadioPrepError::EmptyDataset);
    }

    let height = images.shape()[2] as u32;
    let width = images.shape()[3] as u32;
    let rows = n.div_ceil(per_row);

    let mut canvas = RgbImage::new(per_row as u32 * width, rows as u32 * height);
    for (i, sample) in images.axis_iter(Axis(0)).enumerate() {
        let tile = to_rgb_image(&sample)?;
        let x = (i % per_row) as i64 * width as i64;
        let y = (i / per_row) as i64 * height as i64;
        imageops::replace(&mut canvas, &tile, x, y);
    }
    Ok(canvas)
}

/// Encode an image as PNG bytes held in memory, e.g. for attaching a
/// figure to an experiment log without touching the filesystem.
pub fn to_png_bytes(image: &RgbImage) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(bytes)
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
