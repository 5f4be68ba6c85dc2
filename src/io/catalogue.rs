//! Survey catalogue CSV reader.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array4};
use serde::{Deserialize, Serialize};

use crate::dataset::RgzCatalogue;

/// Configuration for reading catalogue CSV files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueReaderConfig {
    /// Field delimiter, comma by default.
    pub delimiter: u8,
    /// Column with IAU source designations.
    pub name_column: String,
    /// Column with Radio Galaxy Zoo identifiers.
    pub source_id_column: String,
    /// Column with the largest angular size (arcsec).
    pub size_column: String,
    /// Column with the benchmark crossmatch flag.
    pub crossmatch_column: String,
    /// Optional column with morphology labels. When `None` or absent from
    /// the header, every target defaults to 0.
    pub target_column: Option<String>,
    /// Side of the zero-filled image planes attached to the metadata.
    pub image_side: usize,
    /// Channels of the zero-filled image planes.
    pub channels: usize,
}

impl Default for CatalogueReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            name_column: "iau_name".to_string(),
            source_id_column: "rgz_id".to_string(),
            size_column: "angular_size".to_string(),
            crossmatch_column: "crossmatch".to_string(),
            target_column: Some("label".to_string()),
            image_side: 150,
            channels: 1,
        }
    }
}

/// Read a catalogue CSV file with the default column layout.
pub fn read_catalogue<P: AsRef<Path>>(path: P) -> Result<RgzCatalogue> {
    read_catalogue_with_config(path, &CatalogueReaderConfig::default())
}

/// Read a catalogue CSV file using a custom configuration.
///
/// Only metadata lives in the CSV; the returned catalogue carries
/// zero-filled image planes of the configured side so the container stays
/// row-aligned until pixel data is attached.
pub fn read_catalogue_with_config<P: AsRef<Path>>(
    path: P,
    config: &CatalogueReaderConfig,
) -> Result<RgzCatalogue> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open catalogue file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read catalogue header row")?
        .clone();

    let name_idx = find_column(&headers, &config.name_column)
        .ok_or_else(|| anyhow!("Missing name column '{}'", config.name_column))?;
    let source_id_idx = find_column(&headers, &config.source_id_column)
        .ok_or_else(|| anyhow!("Missing source id column '{}'", config.source_id_column))?;
    let size_idx = find_column(&headers, &config.size_column)
        .ok_or_else(|| anyhow!("Missing size column '{}'", config.size_column))?;
    let crossmatch_idx = find_column(&headers, &config.crossmatch_column)
        .ok_or_else(|| anyhow!("Missing crossmatch column '{}'", config.crossmatch_column))?;
    let target_idx = config
        .target_column
        .as_ref()
        .and_then(|name| find_column(&headers, name));

    let mut names = Vec::new();
    let mut source_ids = Vec::new();
    let mut sizes = Vec::new();
    let mut crossmatch = Vec::new();
    let mut targets = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        names.push(get_field(&record, name_idx, row_idx)?.to_string());
        source_ids.push(
            get_field(&record, source_id_idx, row_idx)?
                .parse::<u32>()
                .with_context(|| format!("Invalid source id at row {}", row_idx + 1))?,
        );
        sizes.push(
            get_field(&record, size_idx, row_idx)?
                .parse::<f32>()
                .with_context(|| format!("Invalid angular size at row {}", row_idx + 1))?,
        );
        crossmatch.push(
            get_field(&record, crossmatch_idx, row_idx)?
                .parse::<u8>()
                .with_context(|| format!("Invalid crossmatch flag at row {}", row_idx + 1))?,
        );
        let target = match target_idx {
            Some(idx) => get_field(&record, idx, row_idx)?
                .parse::<i32>()
                .with_context(|| format!("Invalid label at row {}", row_idx + 1))?,
            None => 0,
        };
        targets.push(target);
    }

    let n_samples = names.len();
    log::info!(
        "Read {} catalogue rows from {}",
        n_samples,
        path.as_ref().display()
    );

    let images = Array4::zeros((n_samples, config.channels, config.image_side, config.image_side));
    let catalogue = RgzCatalogue::new(
        images,
        names,
        Array1::from_vec(source_ids),
        Array1::from_vec(sizes),
        Array1::from_vec(crossmatch),
        Array1::from_vec(targets),
    )
    .context("Catalogue columns disagree on row count")?;

    Ok(catalogue)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn get_field<'r>(record: &'r StringRecord, idx: usize, row_idx: usize) -> Result<&'r str> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| anyhow!("Missing value in column {} at row {}", idx, row_idx + 1))
}
