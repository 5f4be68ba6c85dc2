//! Nested index splitting for semi-supervised training.
//!
//! A single seeded shuffle of `0..n` is sliced into the named subsets used
//! downstream: a usable `train_val` portion and the `rest`, a `val`/`train`
//! partition of the former, and a `labeled`/`unlabeled` partition of the
//! training set. Each subset is a `Vec<usize>` into the parent catalogue;
//! `Subset` wraps such indices as a cheap view.
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use ndarray::{ArrayView3, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::SplitConfig;
use crate::dataset::RgzCatalogue;
use crate::error::RadioPrepError;

/// Index sets produced by [`split_dataset`].
///
/// Containment is nested and disjoint: `train_val` and `rest` partition
/// `full`, `val` and `train` partition `train_val`, and `labeled` and
/// `unlabeled` partition `train`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndices {
    pub full: Vec<usize>,
    pub train_val: Vec<usize>,
    pub rest: Vec<usize>,
    pub val: Vec<usize>,
    pub train: Vec<usize>,
    pub labeled: Vec<usize>,
    pub unlabeled: Vec<usize>,
}

impl SplitIndices {
    /// Write the split as JSON so an experiment can be reproduced later.
    ///
    /// The document is serialized up front and written in one call, so any
    /// I/O failure surfaces in the returned error instead of being lost in
    /// a buffered writer's drop.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize split indices")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write split file: {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Read a split previously written by [`SplitIndices::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<SplitIndices> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open split file: {}", path.as_ref().display()))?;
        let indices = serde_json::from_reader(BufReader::new(file))
            .context("Failed to parse split indices")?;
        Ok(indices)
    }
}

impl fmt::Display for SplitIndices {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "full {} | train_val {} | rest {} | val {} | train {} | labeled {} | unlabeled {}",
            self.full.len(),
            self.train_val.len(),
            self.rest.len(),
            self.val.len(),
            self.train.len(),
            self.labeled.len(),
            self.unlabeled.len()
        )
    }
}

/// Cut an index slice at `floor(fraction * len)`, returning the leading
/// part and the remainder with order preserved. The cut point is clamped
/// to the slice length, so out-of-range fractions never panic.
pub fn subindex(idx: &[usize], fraction: f32) -> (Vec<usize>, Vec<usize>) {
    let n_sub = ((fraction * idx.len() as f32) as usize).min(idx.len());
    (idx[..n_sub].to_vec(), idx[n_sub..].to_vec())
}

/// Shuffle `0..n` with the configured seed and slice it into the nested
/// subsets described on [`SplitIndices`].
///
/// # Arguments
///
/// * `n` - Number of samples in the parent dataset.
/// * `config` - Fractions and shuffle seed; validated before use.
///
/// # Returns
///
/// The named index sets, or an error for an empty dataset or a fraction
/// outside [0, 1].
pub fn split_dataset(n: usize, config: &SplitConfig) -> Result<SplitIndices, RadioPrepError> {
    config.validate()?;
    if n == 0 {
        return Err(RadioPrepError::EmptyDataset);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut full: Vec<usize> = (0..n).collect();
    full.shuffle(&mut rng);

    let (train_val, rest) = subindex(&full, config.fraction);
    let (val, train) = subindex(&train_val, config.val_frac);
    let (labeled, unlabeled) = subindex(&train, config.split);

    let indices = SplitIndices {
        full,
        train_val,
        rest,
        val,
        train,
        labeled,
        unlabeled,
    };
    log::debug!("Split {} samples: {}", n, indices);
    Ok(indices)
}

/// Draw `size` distinct entries of `idx` uniformly at random.
///
/// Unlike a draw with replacement, the result always holds `size`
/// different positions; asking for more than `idx` holds is an error.
pub fn random_subset(
    idx: &[usize],
    size: usize,
    rng: &mut impl Rng,
) -> Result<Vec<usize>, RadioPrepError> {
    if size > idx.len() {
        return Err(RadioPrepError::SubsetTooLarge {
            requested: size,
            available: idx.len(),
        });
    }
    let picked = rand::seq::index::sample(rng, idx.len(), size)
        .into_iter()
        .map(|i| idx[i])
        .collect();
    Ok(picked)
}

/// Index-based view over a catalogue; no image data is copied.
#[derive(Debug, Clone, Copy)]
pub struct Subset<'a> {
    catalogue: &'a RgzCatalogue,
    indices: &'a [usize],
}

impl<'a> Subset<'a> {
    /// Wrap a catalogue and an index set, rejecting out-of-range indices.
    pub fn new(catalogue: &'a RgzCatalogue, indices: &'a [usize]) -> Result<Self, RadioPrepError> {
        for &index in indices {
            if index >= catalogue.len() {
                return Err(RadioPrepError::IndexOutOfBounds {
                    index,
                    len: catalogue.len(),
                });
            }
        }
        Ok(Subset { catalogue, indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The i-th sample of the view as `(image, target)`.
    pub fn get(&self, i: usize) -> Option<(ArrayView3<'a, f32>, i32)> {
        let &idx = self.indices.get(i)?;
        Some((
            self.catalogue.images.index_axis(Axis(0), idx),
            self.catalogue.targets[idx],
        ))
    }

    /// Copy the viewed rows into an owned catalogue.
    pub fn materialize(&self) -> RgzCatalogue {
        self.catalogue.select_rows(self.indices)
    }
}
