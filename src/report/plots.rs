use itertools_num::linspace;
use ndarray::Array1;
use plotly::common::{DashType, Line, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Histogram, Plot, Scatter};

use crate::split::SplitIndices;

/// Plot a histogram of the morphology labels, one trace per class
pub fn plot_label_histogram(targets: &Array1<i32>, title: &str) -> Result<Plot, String> {
    // Assert that the labels are only two classes
    assert!(
        targets.iter().all(|&t| t == 0 || t == 1),
        "Labels must be composed of only two classes, 0 for FR-I and 1 for FR-II"
    );

    let mut labels_fri = Vec::new();
    let mut labels_frii = Vec::new();

    for &target in targets.iter() {
        if target == 0 {
            labels_fri.push(target);
        } else {
            labels_frii.push(target);
        }
    }

    let trace_fri = Histogram::new(labels_fri).name("FR-I");
    let trace_frii = Histogram::new(labels_frii).name("FR-II");

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("Class"))
        .y_axis(Axis::new().title("Count"));

    let mut plot = Plot::new();
    plot.add_trace(trace_fri);
    plot.add_trace(trace_frii);
    plot.set_layout(layout);

    Ok(plot)
}

/// Plot a histogram of per-sample predictive entropies
pub fn plot_entropy_histogram(entropies: &Array1<f32>, title: &str) -> Result<Plot, String> {
    let trace = Histogram::new(entropies.to_vec()).name("Entropy");

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("Predictive entropy"))
        .y_axis(Axis::new().title("Count"));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);

    Ok(plot)
}

fn ecdf(values: &Array1<f32>) -> (Vec<f32>, Vec<f32>) {
    let mut x: Vec<f32> = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = x.len() as f32;
    let y: Vec<f32> = (1..=x.len()).map(|i| i as f32 / n).collect();
    (x, y)
}

fn interpolate_ecdf(x: &[f32], y: &[f32], x_seq: &[f32]) -> Vec<f32> {
    x_seq
        .iter()
        .map(|&xi| {
            let idx = x.iter().position(|&xv| xv >= xi).unwrap_or(x.len() - 1);
            y[idx]
        })
        .collect()
}

/// Plot the empirical CDF of the angular sizes with the cut threshold marked.
///
/// # Arguments
///
/// * `sizes` - The angular sizes of the catalogue sources
/// * `threshold` - The size-cut threshold to mark
/// * `title` - The title of the plot
///
pub fn plot_size_ecdf(sizes: &Array1<f32>, threshold: f32, title: &str) -> Result<Plot, String> {
    // Assert that there is data to plot
    assert!(!sizes.is_empty(), "Sizes must not be empty");

    let (x, y) = ecdf(sizes);

    let x_min = *x.first().unwrap();
    let x_max = *x.last().unwrap();
    let x_seq: Vec<f32> = linspace(x_min, x_max, 1000).collect();
    let y_interp = interpolate_ecdf(&x, &y, &x_seq);

    let mut plot = Plot::new();

    let curve = Scatter::new(x_seq, y_interp)
        .mode(Mode::Lines)
        .name("Angular size ECDF");

    let cut_line = Scatter::new(vec![threshold, threshold], vec![0.0, 1.0])
        .mode(Mode::Lines)
        .name("Size cut")
        .line(Line::new().color("red").dash(DashType::Dash));

    plot.add_trace(curve);
    plot.add_trace(cut_line);
    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("Angular size (arcsec)"))
            .y_axis(Axis::new().title("ECDF")),
    );

    Ok(plot)
}

/// Plot the sizes of the named subsets of a dataset split as a bar chart
pub fn plot_split_sizes(indices: &SplitIndices, title: &str) -> Result<Plot, String> {
    let names: Vec<String> = ["train_val", "rest", "val", "train", "labeled", "unlabeled"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let sizes = vec![
        indices.train_val.len(),
        indices.rest.len(),
        indices.val.len(),
        indices.train.len(),
        indices.labeled.len(),
        indices.unlabeled.len(),
    ];

    let trace = Bar::new(names, sizes).name("Subset size");

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("Subset"))
        .y_axis(Axis::new().title("Samples"));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);

    Ok(plot)
}
