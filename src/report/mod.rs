//! Reporting and plotting helpers for split and evaluation diagnostics.
//!
//! This module wraps plotting helpers (Plotly), a small HTML report
//! builder, and the conversion of image arrays into in-memory rasters.
//! Plots are intentionally small helper functions converting numerical
//! data into `plotly::Plot`.
pub mod figures;
pub mod plots;
pub mod report;
