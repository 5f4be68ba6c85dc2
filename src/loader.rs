//! Batched iteration over image/target pairs.
//!
//! `BatchIter` walks a catalogue's arrays in contiguous axis-0 chunks,
//! yielding views so no pixels are copied. The final batch is smaller when
//! the batch size does not divide the sample count, unless `drop_last` is
//! requested.
use ndarray::{s, Array1, Array4, ArrayView1, ArrayView4};

use crate::error::RadioPrepError;

pub struct BatchIter<'a> {
    images: &'a Array4<f32>,
    targets: &'a Array1<i32>,
    batch_size: usize,
    drop_last: bool,
    cursor: usize,
}

impl<'a> BatchIter<'a> {
    /// Pair up images and targets for batched iteration.
    ///
    /// # Arguments
    ///
    /// * `images` - `(n, channels, height, width)` batch.
    /// * `targets` - Per-sample labels, length `n`.
    /// * `batch_size` - Samples per yielded batch, at least 1.
    pub fn new(
        images: &'a Array4<f32>,
        targets: &'a Array1<i32>,
        batch_size: usize,
    ) -> Result<Self, RadioPrepError> {
        if batch_size == 0 {
            return Err(RadioPrepError::ZeroSize("batch_size"));
        }
        if images.shape()[0] != targets.len() {
            return Err(RadioPrepError::LengthMismatch {
                expected: images.shape()[0],
                got: targets.len(),
            });
        }
        Ok(BatchIter {
            images,
            targets,
            batch_size,
            drop_last: false,
            cursor: 0,
        })
    }

    /// Skip a final batch smaller than `batch_size` instead of yielding it.
    pub fn drop_last(mut self) -> Self {
        self.drop_last = true;
        self
    }

    /// Number of batches this iterator will yield in total.
    pub fn num_batches(&self) -> usize {
        let n = self.targets.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }
}

impl<'a> Iterator for BatchIter<'a> {
    type Item = (ArrayView4<'a, f32>, ArrayView1<'a, i32>);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.targets.len();
        if self.cursor >= n {
            return None;
        }
        let end = (self.cursor + self.batch_size).min(n);
        if self.drop_last && end - self.cursor < self.batch_size {
            return None;
        }
        let images = self.images.slice(s![self.cursor..end, .., .., ..]);
        let targets = self.targets.slice(s![self.cursor..end]);
        self.cursor = end;
        Some((images, targets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array4};

    fn make_batch(n: usize) -> (Array4<f32>, Array1<i32>) {
        let images = Array4::from_shape_fn((n, 1, 2, 2), |(i, _, _, _)| i as f32);
        let targets = Array1::from_iter(0..n as i32);
        (images, targets)
    }

    #[test]
    fn batches_cover_all_samples_in_order() {
        let (images, targets) = make_batch(10);
        let iter = BatchIter::new(&images, &targets, 4).unwrap();
        assert_eq!(iter.num_batches(), 3);

        let mut seen = Vec::new();
        let mut sizes = Vec::new();
        for (x, y) in iter {
            assert_eq!(x.shape()[0], y.len());
            sizes.push(y.len());
            seen.extend(y.iter().copied());
        }
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(seen, (0..10).collect::<Vec<i32>>());
    }

    #[test]
    fn drop_last_skips_ragged_tail() {
        let (images, targets) = make_batch(10);
        let iter = BatchIter::new(&images, &targets, 4).unwrap().drop_last();
        assert_eq!(iter.num_batches(), 2);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn exact_division_keeps_every_batch() {
        let (images, targets) = make_batch(8);
        let iter = BatchIter::new(&images, &targets, 4).unwrap().drop_last();
        assert_eq!(iter.num_batches(), 2);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn zero_batch_size_errors() {
        let (images, targets) = make_batch(4);
        assert!(BatchIter::new(&images, &targets, 0).is_err());
    }

    #[test]
    fn mismatched_lengths_error() {
        let (images, _) = make_batch(4);
        let targets = Array1::from_vec(vec![0, 1]);
        assert!(BatchIter::new(&images, &targets, 2).is_err());
    }
}
