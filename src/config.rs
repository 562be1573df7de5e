//! Experiment configuration, read from JSON files.
//!
//! Every field has a default, so a configuration file only needs to name what it changes.

use std::{fs, path::Path};

use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    training::TrainingStart,
    transfer::Transfer,
    validation::Shuffle,
};

/// The configuration of all experiments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Seed for every random draw. Drawn from entropy when absent.
    pub seed: Option<u64>,
    /// The perceptron experiment.
    pub perceptron: PerceptronConfig,
    /// The multi-layer classifier experiment.
    pub network: NetworkConfig,
    /// The recurrent binary addition experiment.
    pub elman: ElmanConfig,
}

impl ExperimentConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// Cross-validation of a single perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptronConfig {
    /// Step size of the weight updates.
    pub learning_rate: f64,
    /// Training passes are `epochs + 1`.
    pub epochs: usize,
    /// Folds of k-fold validation, and iterations of random subsampling.
    pub folds: usize,
    /// The share of patterns used for training by random subsampling.
    pub fraction: f64,
    /// Whether splits permute the patterns first.
    pub shuffle: bool,
}

impl Default for PerceptronConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epochs: 500,
            folds: 5,
            fraction: 0.67,
            shuffle: true,
        }
    }
}

/// Cross-validation of a multi-layer classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Step size of the weight updates.
    pub learning_rate: f64,
    /// Sizes of the hidden layers. Input and output sizes follow from the dataset.
    pub hidden: Vec<usize>,
    /// Training passes are `epochs + 1`.
    pub epochs: usize,
    /// Folds of k-fold validation, and iterations of random subsampling.
    pub folds: usize,
    /// The share of patterns used for training by random subsampling.
    pub fraction: f64,
    /// Whether splits permute the patterns first.
    pub shuffle: bool,
    /// Transfer function of all non-input neurons.
    pub transfer: Transfer,
    /// Standard deviation of the normal distribution weights are drawn from.
    pub init_std_dev: f64,
    /// Whether each fold retrains from fresh weights.
    pub start: TrainingStart,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            hidden: vec![20],
            epochs: 500,
            folds: 3,
            fraction: 0.67,
            shuffle: true,
            transfer: Transfer::Sigmoid,
            init_std_dev: 0.1,
            start: TrainingStart::Reset,
        }
    }
}

impl NetworkConfig {
    /// The weight initialisation distribution.
    pub fn init(&self) -> Result<Normal<f64>> {
        weight_distribution(self.init_std_dev)
    }

    /// The shuffle mode of the splits.
    #[must_use]
    pub fn shuffle(&self) -> Shuffle {
        self.shuffle.into()
    }
}

/// Training an Elman network to add binary numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElmanConfig {
    /// Width of each operand.
    pub bits: usize,
    /// Length of the generated sequence.
    pub patterns: usize,
    /// Hidden neurons, which is also the number of context slots.
    pub hidden: usize,
    /// Step size of the weight updates.
    pub learning_rate: f64,
    /// Training passes are `epochs + 1`.
    pub epochs: usize,
    /// Transfer function of all non-input neurons.
    pub transfer: Transfer,
    /// Standard deviation of the normal distribution weights are drawn from.
    pub init_std_dev: f64,
}

impl Default for ElmanConfig {
    fn default() -> Self {
        Self {
            bits: 8,
            patterns: 30,
            hidden: 10,
            learning_rate: 0.01,
            epochs: 500,
            transfer: Transfer::Sigmoid,
            init_std_dev: 0.1,
        }
    }
}

impl ElmanConfig {
    /// The weight initialisation distribution.
    pub fn init(&self) -> Result<Normal<f64>> {
        weight_distribution(self.init_std_dev)
    }
}

/// A zero-mean normal distribution. `Normal::new` only rejects spreads that are not finite.
fn weight_distribution(std_dev: f64) -> Result<Normal<f64>> {
    if std_dev.is_nan() || std_dev < 0.0 {
        return Err(Error::InvalidStdDev(std_dev));
    }
    Ok(Normal::new(0.0, std_dev)?)
}
