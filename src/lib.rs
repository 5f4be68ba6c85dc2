//! radioprep: data preparation and evaluation utilities for
//! semi-supervised radio-galaxy classification.
//!
//! This crate provides the in-memory survey catalogue with its size and
//! crossmatch cuts, the circular image crop and dataset statistics, the
//! seeded nested split into labeled/unlabeled/train/validation subsets,
//! label-noise injection, batched metric evaluation (predictive entropy
//! among them), and reporting/plotting helpers used by the surrounding
//! training pipeline.
//!
//! The design favors small, testable modules operating on plain `ndarray`
//! types so the pieces can be reused independently of any model code.
pub mod config;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod io;
pub mod loader;
pub mod preprocessing;
pub mod report;
pub mod split;
