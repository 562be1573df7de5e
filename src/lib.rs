//! Layered and simple-recurrent (Elman) neural networks of scalar neurons, trained online by the
//! perceptron rule or by backpropagation, with k-fold and random-subsampling cross-validation.

#![deny(unsafe_code, rust_2018_idioms, rust_2021_compatibility)]
#![warn(missing_docs)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod layer;
pub mod network;
pub mod neuron;
pub mod perceptron;
pub mod training;
pub mod transfer;
pub mod validation;

pub use dataset::{LabelIndex, Pattern};
pub use error::{Error, Result};
pub use layer::NeuralLayer;
pub use network::{Context, MultiLayerNetwork, Recurrence, CONTEXT_INIT};
pub use neuron::NeuronUnit;
pub use training::TrainingStart;
pub use transfer::{Transfer, TransferFunction};
pub use validation::{Scores, Shuffle};
