//! Image preprocessing utilities shared by the dataset pipeline.
//!
//! Provides the circular crop applied to survey cutouts before training,
//! plus whole-dataset mean/std estimation and in-place standardization.
//! Everything operates on `(n, channels, height, width)` arrays.

use ndarray::parallel::prelude::*;
use ndarray::{Array2, Array4, Axis};

use crate::error::RadioPrepError;

/// Minimum sigma to avoid division by zero when standardizing.
pub const MIN_SIGMA: f32 = 1e-6;

/// Samples per task when statistics are computed in parallel.
const STAT_CHUNK: usize = 64;

/// Binary mask of the circle inscribed in a `side x side` pixel grid.
///
/// The circle is centred on the grid centre `(side - 1) / 2` with radius
/// `(side - 1) / 2`, so it touches the midpoint pixel of every edge while
/// the corners always fall outside. Pixels on the boundary are kept.
pub fn circle_mask(side: usize) -> Array2<f32> {
    let centre = (side as f32 - 1.0) / 2.0;
    let radius = centre;
    Array2::from_shape_fn((side, side), |(row, col)| {
        let dy = row as f32 - centre;
        let dx = col as f32 - centre;
        if (dy * dy + dx * dx).sqrt() <= radius {
            1.0
        } else {
            0.0
        }
    })
}

/// Zero every pixel outside the inscribed circle, for all samples and
/// channels of a `(n, channels, height, width)` batch in place.
///
/// # Arguments
///
/// * `images` - The image batch to crop, modified in place.
///
/// # Returns
///
/// `Err(RadioPrepError::NotSquare)` when height and width differ; the
/// batch is untouched in that case.
pub fn crop_to_circle(images: &mut Array4<f32>) -> Result<(), RadioPrepError> {
    let shape = images.shape();
    let (height, width) = (shape[2], shape[3]);
    if height != width {
        return Err(RadioPrepError::NotSquare { height, width });
    }

    let mask = circle_mask(height);
    images
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(|mut sample| sample *= &mask);
    Ok(())
}

/// Mean and standard deviation over every element of the batch.
///
/// The deviation is the unbiased (n - 1) estimate; a single-element input
/// degenerates to sigma 0. Accumulation runs in f64 so large batches do
/// not lose precision.
pub fn compute_mu_sig(images: &Array4<f32>) -> Result<(f32, f32), RadioPrepError> {
    if images.is_empty() {
        return Err(RadioPrepError::EmptyDataset);
    }

    let n = images.len() as f64;
    let total: f64 = images
        .axis_chunks_iter(Axis(0), STAT_CHUNK)
        .into_par_iter()
        .map(|chunk| chunk.iter().map(|&v| v as f64).sum::<f64>())
        .sum();
    let mu = total / n;

    let squared: f64 = images
        .axis_chunks_iter(Axis(0), STAT_CHUNK)
        .into_par_iter()
        .map(|chunk| {
            chunk
                .iter()
                .map(|&v| {
                    let d = v as f64 - mu;
                    d * d
                })
                .sum::<f64>()
        })
        .sum();
    let denom = (n - 1.0).max(1.0);
    let sigma = (squared / denom).sqrt();

    Ok((mu as f32, sigma as f32))
}

/// Standardize the batch in place to `(x - mu) / sigma`.
///
/// Sigma is floored at [`MIN_SIGMA`] so constant batches stay finite.
pub fn standardize(images: &mut Array4<f32>, mu: f32, sigma: f32) {
    let sigma = sigma.max(MIN_SIGMA);
    images.par_mapv_inplace(|v| (v - mu) / sigma);
}
