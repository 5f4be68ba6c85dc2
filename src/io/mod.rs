//! IO utilities for loading survey catalogue files.

pub mod catalogue;

pub use catalogue::{read_catalogue, read_catalogue_with_config, CatalogueReaderConfig};
