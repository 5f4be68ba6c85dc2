//! In-memory survey catalogue and label-noise helpers.
//!
//! This module defines `RgzCatalogue`, the row-aligned container for Radio
//! Galaxy Zoo cutouts and their per-source metadata, together with the
//! boolean-mask filters (angular-size threshold, benchmark crossmatch) and
//! label utilities (class fraction, noise injection) applied before
//! splitting and training.
use ndarray::{Array1, Array4, Axis};
use rand::Rng;

use crate::error::RadioPrepError;

#[derive(Debug, Clone)]
pub struct RgzCatalogue {
    /// Image cutouts, `(n, channels, height, width)`
    pub images: Array4<f32>,
    /// IAU source designations
    pub names: Vec<String>,
    /// Radio Galaxy Zoo catalogue identifiers
    pub source_id: Array1<u32>,
    /// Largest angular size per source, in arcsec
    pub sizes: Array1<f32>,
    /// Nonzero when the source is crossmatched against the labelled
    /// benchmark catalogue; those rows leak labels and get cut
    pub crossmatch: Array1<u8>,
    /// Binary morphology labels (0 = FR-I, 1 = FR-II)
    pub targets: Array1<i32>,
}

impl RgzCatalogue {
    /// Build a catalogue, checking that every per-source array agrees with
    /// the number of images.
    pub fn new(
        images: Array4<f32>,
        names: Vec<String>,
        source_id: Array1<u32>,
        sizes: Array1<f32>,
        crossmatch: Array1<u8>,
        targets: Array1<i32>,
    ) -> Result<Self, RadioPrepError> {
        let n_samples = images.shape()[0];
        for got in [
            names.len(),
            source_id.len(),
            sizes.len(),
            crossmatch.len(),
            targets.len(),
        ] {
            if got != n_samples {
                return Err(RadioPrepError::LengthMismatch {
                    expected: n_samples,
                    got,
                });
            }
        }
        Ok(RgzCatalogue {
            images,
            names,
            source_id,
            sizes,
            crossmatch,
            targets,
        })
    }

    pub fn len(&self) -> usize {
        self.images.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-line description of the catalogue contents.
    pub fn summary(&self) -> String {
        let fri = self.targets.iter().filter(|&&t| t == 0).count();
        let frii = self.targets.iter().filter(|&&t| t == 1).count();
        let shape = self.images.shape();
        format!(
            "{} samples ({} FR-I, {} FR-II), image planes {}x{} with {} channel(s)",
            self.len(),
            fri,
            frii,
            shape[2],
            shape[3],
            shape[1]
        )
    }

    pub fn print_summary(&self) {
        println!("----- Catalogue Summary -----");
        println!("Info: {}", self.summary());
        println!("-----------------------------");
    }

    /// Filter the catalogue by applying a boolean mask to all row-aligned fields.
    ///
    /// This includes:
    /// - Image cutouts `images`
    /// - Source designations `names`
    /// - Catalogue identifiers `source_id`
    /// - Angular sizes `sizes`
    /// - Crossmatch flags `crossmatch`
    /// - Morphology labels `targets`
    ///
    /// # Arguments
    ///
    /// * `mask` - A boolean mask (`Array1<bool>`) of the same length as the catalogue
    ///
    /// # Returns
    ///
    /// A new `RgzCatalogue` with only rows where `mask[i] == true`
    pub fn filter(&self, mask: &Array1<bool>) -> Result<RgzCatalogue, RadioPrepError> {
        if mask.len() != self.len() {
            return Err(RadioPrepError::LengthMismatch {
                expected: self.len(),
                got: mask.len(),
            });
        }

        let selected_indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &m)| if m { Some(i) } else { None })
            .collect();

        Ok(self.select_rows(&selected_indices))
    }

    /// Copy out the given rows in order. Callers must pass in-bounds indices.
    pub(crate) fn select_rows(&self, indices: &[usize]) -> RgzCatalogue {
        RgzCatalogue {
            images: self.images.select(Axis(0), indices),
            names: indices.iter().map(|&i| self.names[i].clone()).collect(),
            source_id: self.source_id.select(Axis(0), indices),
            sizes: self.sizes.select(Axis(0), indices),
            crossmatch: self.crossmatch.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
        }
    }

    /// Drop every source at or below the angular-size threshold, in place.
    pub fn size_cut(&mut self, threshold: f32) -> Result<(), RadioPrepError> {
        let before = self.len();
        let mask = self.sizes.mapv(|s| s > threshold);
        *self = self.filter(&mask)?;
        log::info!(
            "Size cut at {} arcsec kept {} of {} samples",
            threshold,
            self.len(),
            before
        );
        Ok(())
    }

    /// Drop every source flagged by the benchmark crossmatch, in place.
    pub fn crossmatch_cut(&mut self) -> Result<(), RadioPrepError> {
        let mask = self.crossmatch.mapv(|flag| flag == 0);
        *self = self.filter(&mask)?;
        log::info!("Catalogue cut to {} samples", self.len());
        Ok(())
    }

    /// Fraction of catalogue targets equal to `label`.
    pub fn label_fraction(&self, label: i32) -> f32 {
        label_fraction(&self.targets, label)
    }

    /// Flip a fraction of the catalogue's binary labels in place.
    pub fn flip_targets(
        &mut self,
        fraction: f32,
        rng: &mut impl Rng,
    ) -> Result<usize, RadioPrepError> {
        flip_targets(&mut self.targets, fraction, rng)
    }
}

/// Fraction of entries equal to `label`; 0.0 for an empty array.
pub fn label_fraction(targets: &Array1<i32>, label: i32) -> f32 {
    if targets.is_empty() {
        return 0.0;
    }
    let n = targets.iter().filter(|&&t| t == label).count();
    n as f32 / targets.len() as f32
}

/// Flip `floor(fraction * n)` binary labels chosen uniformly without
/// replacement, mapping each picked label `x` to `(x - 1)^2` so 0 and 1
/// exchange. Returns the number of labels flipped.
///
/// # Arguments
///
/// * `targets` - Binary labels, modified in place.
/// * `fraction` - Share of labels to corrupt, in [0, 1].
/// * `rng` - Source of randomness; seed it for a reproducible corruption.
pub fn flip_targets(
    targets: &mut Array1<i32>,
    fraction: f32,
    rng: &mut impl Rng,
) -> Result<usize, RadioPrepError> {
    if !(0.0..=1.0).contains(&fraction) || fraction.is_nan() {
        return Err(RadioPrepError::InvalidFraction {
            name: "fraction",
            value: fraction,
        });
    }

    let n_targets = targets.len();
    // f32 cannot represent every length above 2^24, so the product can
    // round past n; cap it like `subindex` does.
    let n_flip = ((fraction * n_targets as f32) as usize).min(n_targets);
    if n_flip == 0 {
        return Ok(0);
    }

    for idx in rand::seq::index::sample(rng, n_targets, n_flip) {
        targets[idx] = (targets[idx] - 1).pow(2);
    }
    log::debug!("Flipped {} of {} labels", n_flip, n_targets);
    Ok(n_flip)
}
