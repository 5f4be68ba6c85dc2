use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RadioPrepError;

/// Configuration for the nested dataset split.
///
/// `fraction` selects how much of the full dataset is used at all,
/// `val_frac` carves the validation set out of that selection, and `split`
/// decides the labelled share of what remains for training. All three are
/// fractions in [0, 1]; the shuffle is seeded so a split can be reproduced.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    pub fraction: f32,
    pub split: f32,
    pub val_frac: f32,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            fraction: 1.0,
            split: 1.0,
            val_frac: 0.2,
            seed: 42,
        }
    }
}

impl SplitConfig {
    pub fn new(fraction: f32, split: f32, val_frac: f32, seed: u64) -> Result<Self, RadioPrepError> {
        let config = Self {
            fraction,
            split,
            val_frac,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RadioPrepError> {
        for (name, value) in [
            ("fraction", self.fraction),
            ("split", self.split),
            ("val_frac", self.val_frac),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(RadioPrepError::InvalidFraction { name, value });
            }
        }
        Ok(())
    }
}

impl FromStr for SplitConfig {
    type Err = String;

    /// Parse `key=value` pairs separated by `;`, e.g.
    /// `"fraction=0.5;split=0.1;val_frac=0.2;seed=7"`. Unset keys keep their
    /// defaults.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config = SplitConfig::default();
        for pair in s.split(';').filter(|p| !p.trim().is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("Expected key=value, got '{}'", pair))?;
            match key.trim().to_lowercase().as_str() {
                "fraction" => config.fraction = parse_value(key, value)?,
                "split" => config.split = parse_value(key, value)?,
                "val_frac" => config.val_frac = parse_value(key, value)?,
                "seed" => config.seed = parse_value(key, value)?,
                _ => {
                    return Err(format!(
                        "Unknown split option: {}. Valid options are fraction, split, val_frac and seed",
                        key
                    ))
                }
            }
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

/// Configuration for batched metric evaluation.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct EvalConfig {
    pub batch_size: usize,
    /// Additive floor inside the entropy logarithm to avoid log(0).
    pub entropy_eps: f32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            batch_size: 200,
            entropy_eps: 1e-7,
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<(), RadioPrepError> {
        if self.batch_size == 0 {
            return Err(RadioPrepError::ZeroSize("batch_size"));
        }
        Ok(())
    }
}

impl FromStr for EvalConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config = EvalConfig::default();
        for pair in s.split(';').filter(|p| !p.trim().is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("Expected key=value, got '{}'", pair))?;
            match key.trim().to_lowercase().as_str() {
                "batch_size" => config.batch_size = parse_value(key, value)?,
                "entropy_eps" => config.entropy_eps = parse_value(key, value)?,
                _ => {
                    return Err(format!(
                        "Unknown eval option: {}. Valid options are batch_size and entropy_eps",
                        key
                    ))
                }
            }
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid value '{}' for option '{}'", value, key))
}
