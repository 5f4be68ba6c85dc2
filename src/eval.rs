//! Evaluation metrics computed over probability outputs and batches.
//!
//! Entropy here is the predictive entropy of a per-row probability vector,
//! used both as an inference-time uncertainty score (clamped) and as a
//! scalar loss term (batch mean). `batch_eval` runs a set of named metric
//! functions over a dataset in batches and collects per-batch results.
use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView4, Array4, Axis};
use statrs::statistics::Statistics;

use crate::error::RadioPrepError;
use crate::loader::BatchIter;

/// Per-row predictive entropy `-sum(p * ln(p + eps))`.
///
/// The epsilon sits inside the logarithm to keep `ln(0)` finite, which can
/// push a one-hot row slightly negative; inference values are therefore
/// clamped at zero.
///
/// # Arguments
///
/// * `probs` - `(n, classes)` probability rows.
/// * `eps` - Additive floor inside the logarithm, e.g. 1e-7.
pub fn entropy(probs: &Array2<f32>, eps: f32) -> Array1<f32> {
    let mut out = Array1::zeros(probs.nrows());
    for (i, row) in probs.axis_iter(Axis(0)).enumerate() {
        let h: f32 = row.iter().map(|&p| -(p + eps).ln() * p).sum();
        out[i] = h.max(0.0);
    }
    out
}

/// Mean predictive entropy over all rows, without the clamp, usable as a
/// minimization target. Empty input yields 0.
pub fn entropy_loss(probs: &Array2<f32>, eps: f32) -> f32 {
    let n = probs.nrows();
    if n == 0 {
        return 0.0;
    }
    let total: f32 = probs
        .axis_iter(Axis(0))
        .map(|row| row.iter().map(|&p| -(p + eps).ln() * p).sum::<f32>())
        .sum();
    total / n as f32
}

/// Apply every named function to each batch of the dataset, accumulating
/// one result per batch under the function's name.
///
/// # Arguments
///
/// * `fns` - `(name, function)` pairs; each function sees one batch of
///   images and targets.
/// * `images` - `(n, channels, height, width)` batch.
/// * `targets` - Per-sample labels, length `n`.
/// * `batch_size` - Samples per batch; the final batch may be smaller.
///
/// # Returns
///
/// A map from metric name to its per-batch results, `ceil(n / batch_size)`
/// entries each.
pub fn batch_eval<R>(
    fns: &[(&str, &dyn Fn(&ArrayView4<f32>, &ArrayView1<i32>) -> R)],
    images: &Array4<f32>,
    targets: &Array1<i32>,
    batch_size: usize,
) -> Result<BTreeMap<String, Vec<R>>, RadioPrepError> {
    let iter = BatchIter::new(images, targets, batch_size)?;

    let mut outs: BTreeMap<String, Vec<R>> = BTreeMap::new();
    for (name, _) in fns {
        outs.insert((*name).to_string(), Vec::new());
    }

    for (x, y) in iter {
        for (name, func) in fns {
            if let Some(results) = outs.get_mut(*name) {
                results.push(func(&x, &y));
            }
        }
    }

    Ok(outs)
}

/// Fraction of rows whose argmax prediction equals `label`.
///
/// Ties resolve to the first maximal class. Empty input yields 0.
pub fn predicted_label_fraction(probs: &Array2<f32>, label: i32) -> f32 {
    let n = probs.nrows();
    if n == 0 {
        return 0.0;
    }
    let hits = probs
        .axis_iter(Axis(0))
        .filter(|row| argmax(row) as i32 == label)
        .count();
    hits as f32 / n as f32
}

/// Mean and unbiased standard deviation of a metric series; `(0, 0)` for
/// empty input, sigma 0 for a single value.
pub fn metric_summary(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let values: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    let mean = values.iter().mean();
    let std_dev = if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    };
    (mean as f32, std_dev as f32)
}

fn argmax(row: &ArrayView1<f32>) -> usize {
    let mut best = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (i, &v) in row.iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn entropy_one_hot_clamps_to_zero() {
        let probs = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        let h = entropy(&probs, 1e-7);
        for &v in h.iter() {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn entropy_uniform_two_classes_is_ln2() {
        let probs = arr2(&[[0.5, 0.5]]);
        let h = entropy(&probs, 1e-7);
        assert!((h[0] - std::f32::consts::LN_2).abs() < 1e-4, "H = {}", h[0]);
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        let probs = arr2(&[[0.5, 0.5]]);
        assert_eq!(predicted_label_fraction(&probs, 0), 1.0);
        assert_eq!(predicted_label_fraction(&probs, 1), 0.0);
    }
}
