//! Integration tests for evaluation metrics and configuration parsing.

use ndarray::{arr2, Array1, Array4, ArrayView1, ArrayView4};

use radioprep::config::{EvalConfig, SplitConfig};
use radioprep::error::RadioPrepError;
use radioprep::eval::{
    batch_eval, entropy, entropy_loss, metric_summary, predicted_label_fraction,
};

fn batch_count(_images: &ArrayView4<f32>, targets: &ArrayView1<i32>) -> f32 {
    targets.len() as f32
}

fn label_sum(_images: &ArrayView4<f32>, targets: &ArrayView1<i32>) -> f32 {
    targets.sum() as f32
}

fn make_batch(n: usize) -> (Array4<f32>, Array1<i32>) {
    let images = Array4::from_shape_fn((n, 1, 2, 2), |(i, _, _, _)| i as f32);
    let targets = Array1::from_iter(0..n as i32);
    (images, targets)
}

// ---------------------------------------------------------------------------
// Entropy
// ---------------------------------------------------------------------------

#[test]
fn entropy_is_zero_for_one_hot_rows() {
    let probs = arr2(&[[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
    let h = entropy(&probs, 1e-7);
    for &v in h.iter() {
        assert_eq!(v, 0.0, "one-hot rows must clamp to zero entropy");
    }
}

#[test]
fn entropy_is_never_negative() {
    let probs = arr2(&[
        [0.9999, 0.0001],
        [1.0, 0.0],
        [0.3, 0.7],
        [0.5, 0.5],
    ]);
    let h = entropy(&probs, 1e-7);
    for &v in h.iter() {
        assert!(v >= 0.0, "entropy {} fell below zero", v);
    }
}

#[test]
fn entropy_of_uniform_four_classes_is_ln4() {
    let probs = arr2(&[[0.25, 0.25, 0.25, 0.25]]);
    let h = entropy(&probs, 1e-7);
    let expected = (4.0f32).ln();
    assert!((h[0] - expected).abs() < 1e-4, "H = {}, expected {}", h[0], expected);
}

#[test]
fn entropy_loss_is_the_batch_mean() {
    let probs = arr2(&[[1.0, 0.0], [0.5, 0.5]]);
    let loss = entropy_loss(&probs, 1e-7);
    let expected = std::f32::consts::LN_2 / 2.0;
    assert!((loss - expected).abs() < 1e-4, "loss = {}, expected {}", loss, expected);
}

#[test]
fn entropy_loss_of_one_hot_rows_is_tiny() {
    // Without the clamp the epsilon can push the mean a hair below zero,
    // but it must stay within epsilon-scale of it.
    let probs = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
    let loss = entropy_loss(&probs, 1e-7);
    assert!(loss.abs() < 1e-5, "loss = {}", loss);
}

#[test]
fn entropy_loss_of_empty_input_is_zero() {
    let probs = ndarray::Array2::<f32>::zeros((0, 2));
    assert_eq!(entropy_loss(&probs, 1e-7), 0.0);
}

// ---------------------------------------------------------------------------
// Batched evaluation
// ---------------------------------------------------------------------------

#[test]
fn batch_eval_collects_one_result_per_batch() {
    let (images, targets) = make_batch(10);
    let fns: Vec<(&str, &dyn Fn(&ArrayView4<f32>, &ArrayView1<i32>) -> f32)> =
        vec![("count", &batch_count), ("label_sum", &label_sum)];

    let outs = batch_eval(&fns, &images, &targets, 3).unwrap();

    assert_eq!(outs.len(), 2);
    assert_eq!(outs["count"], vec![3.0, 3.0, 3.0, 1.0]);
    assert_eq!(outs["label_sum"], vec![3.0, 12.0, 21.0, 9.0]);

    let total: f32 = outs["count"].iter().sum();
    assert_eq!(total as usize, 10, "batch sizes must reconstruct the dataset");
}

#[test]
fn batch_eval_batch_count_is_ceil_of_n_over_batch_size() {
    let fns: Vec<(&str, &dyn Fn(&ArrayView4<f32>, &ArrayView1<i32>) -> f32)> =
        vec![("count", &batch_count)];

    for (n, batch_size, expected) in [(10, 3, 4), (9, 3, 3), (1, 200, 1)] {
        let (images, targets) = make_batch(n);
        let outs = batch_eval(&fns, &images, &targets, batch_size).unwrap();
        assert_eq!(
            outs["count"].len(),
            expected,
            "n={} batch_size={}",
            n,
            batch_size
        );
    }
}

#[test]
fn batch_eval_rejects_zero_batch_size() {
    let (images, targets) = make_batch(4);
    let fns: Vec<(&str, &dyn Fn(&ArrayView4<f32>, &ArrayView1<i32>) -> f32)> =
        vec![("count", &batch_count)];
    assert_eq!(
        batch_eval(&fns, &images, &targets, 0).unwrap_err(),
        RadioPrepError::ZeroSize("batch_size")
    );
}

#[test]
fn batch_eval_rejects_mismatched_lengths() {
    let (images, _) = make_batch(4);
    let targets = Array1::from_vec(vec![0, 1, 2]);
    let fns: Vec<(&str, &dyn Fn(&ArrayView4<f32>, &ArrayView1<i32>) -> f32)> =
        vec![("count", &batch_count)];
    assert_eq!(
        batch_eval(&fns, &images, &targets, 2).unwrap_err(),
        RadioPrepError::LengthMismatch { expected: 4, got: 3 }
    );
}

// ---------------------------------------------------------------------------
// Prediction fractions and metric summaries
// ---------------------------------------------------------------------------

#[test]
fn predicted_label_fraction_counts_argmax_hits() {
    let probs = arr2(&[[0.9, 0.1], [0.2, 0.8], [0.6, 0.4]]);
    assert!((predicted_label_fraction(&probs, 0) - 2.0 / 3.0).abs() < 1e-6);
    assert!((predicted_label_fraction(&probs, 1) - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn predicted_label_fraction_of_empty_input_is_zero() {
    let probs = ndarray::Array2::<f32>::zeros((0, 2));
    assert_eq!(predicted_label_fraction(&probs, 0), 0.0);
}

#[test]
fn metric_summary_gives_mean_and_unbiased_sigma() {
    let (mu, sigma) = metric_summary(&[1.0, 2.0, 3.0, 4.0]);
    assert!((mu - 2.5).abs() < 1e-6, "mu = {}", mu);
    assert!((sigma - 1.2909944).abs() < 1e-5, "sigma = {}", sigma);
}

#[test]
fn metric_summary_handles_degenerate_inputs() {
    assert_eq!(metric_summary(&[]), (0.0, 0.0));
    assert_eq!(metric_summary(&[7.0]), (7.0, 0.0));
}

// ---------------------------------------------------------------------------
// SplitConfig
// ---------------------------------------------------------------------------

#[test]
fn split_config_defaults() {
    let config = SplitConfig::default();
    assert_eq!(config.fraction, 1.0);
    assert_eq!(config.split, 1.0);
    assert_eq!(config.val_frac, 0.2);
    assert_eq!(config.seed, 42);
}

#[test]
fn split_config_parses_key_value_pairs() {
    let config: SplitConfig = "fraction=0.5; split=0.1;val_frac=0.25;seed=7"
        .parse()
        .unwrap();
    assert_eq!(config.fraction, 0.5);
    assert_eq!(config.split, 0.1);
    assert_eq!(config.val_frac, 0.25);
    assert_eq!(config.seed, 7);
}

#[test]
fn split_config_keeps_defaults_for_unset_keys() {
    let config: SplitConfig = "fraction=0.5".parse().unwrap();
    assert_eq!(config.fraction, 0.5);
    assert_eq!(config.split, 1.0);
    assert_eq!(config.val_frac, 0.2);
    assert_eq!(config.seed, 42);
}

#[test]
fn split_config_rejects_unknown_keys() {
    let err = "frac=0.5".parse::<SplitConfig>().unwrap_err();
    assert!(err.contains("Unknown split option"), "got: {}", err);
}

#[test]
fn split_config_rejects_unparseable_values() {
    let err = "fraction=abc".parse::<SplitConfig>().unwrap_err();
    assert!(err.contains("Invalid value"), "got: {}", err);
}

#[test]
fn split_config_rejects_out_of_range_fractions() {
    let err = "fraction=1.5".parse::<SplitConfig>().unwrap_err();
    assert!(err.contains("must lie in [0, 1]"), "got: {}", err);

    let config = SplitConfig {
        val_frac: -0.1,
        ..SplitConfig::default()
    };
    assert_eq!(
        config.validate().unwrap_err(),
        RadioPrepError::InvalidFraction { name: "val_frac", value: -0.1 }
    );
}

#[test]
fn split_config_serde_round_trip() {
    let config = SplitConfig::new(0.8, 0.1, 0.3, 99).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let back: SplitConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, back);
}

// ---------------------------------------------------------------------------
// EvalConfig
// ---------------------------------------------------------------------------

#[test]
fn eval_config_defaults() {
    let config = EvalConfig::default();
    assert_eq!(config.batch_size, 200);
    assert_eq!(config.entropy_eps, 1e-7);
}

#[test]
fn eval_config_parses_key_value_pairs() {
    let config: EvalConfig = "batch_size=64;entropy_eps=1e-6".parse().unwrap();
    assert_eq!(config.batch_size, 64);
    assert_eq!(config.entropy_eps, 1e-6);
}

#[test]
fn eval_config_rejects_zero_batch_size() {
    assert!("batch_size=0".parse::<EvalConfig>().is_err());

    let config = EvalConfig {
        batch_size: 0,
        ..EvalConfig::default()
    };
    assert_eq!(
        config.validate().unwrap_err(),
        RadioPrepError::ZeroSize("batch_size")
    );
}
