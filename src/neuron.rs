//! The atomic learnable unit of every network.

use rand::Rng;
use rand_distr::Distribution;

use crate::error::{ensure_len, Result};

/// A neuron holding a set of weights and a bias, along with the state of the last pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeuronUnit {
    /// One weight per neuron of the previous layer. Empty for input neurons.
    pub weights: Vec<f64>,
    /// The bias added to the weighted sum.
    pub bias: f64,
    /// The learning rate used when the neuron is trained on its own as a perceptron.
    pub learning_rate: f64,
    /// The activation computed by the last forward pass.
    pub value: f64,
    /// The error term computed by the last backward pass.
    pub delta: f64,
}

impl NeuronUnit {
    /// Create an input neuron, which has no weights.
    #[must_use]
    pub fn input() -> Self {
        Self::default()
    }

    /// Create a neuron whose weights and bias are all zero.
    #[must_use]
    pub fn zeroed(fan_in: usize, learning_rate: f64) -> Self {
        Self {
            weights: vec![0.0; fan_in],
            learning_rate,
            ..Self::default()
        }
    }

    /// Create a neuron with weights and bias sampled from `distribution`.
    pub fn rand<R, D>(rng: &mut R, distribution: &D, fan_in: usize) -> Self
    where
        R: Rng,
        D: Distribution<f64>,
    {
        Self {
            weights: (0..fan_in).map(|_| rng.sample(distribution)).collect(),
            bias: rng.sample(distribution),
            ..Self::default()
        }
    }

    /// The number of inputs the neuron is connected to.
    #[must_use]
    pub fn fan_in(&self) -> usize {
        self.weights.len()
    }

    /// Zero the weights and bias, resizing the weights to `fan_in`.
    pub fn reset(&mut self, fan_in: usize) {
        self.weights.clear();
        self.weights.resize(fan_in, 0.0);
        self.bias = 0.0;
    }

    /// Compute `dot(weights, inputs) + bias`.
    pub fn weighted_sum(&self, inputs: &[f64]) -> Result<f64> {
        ensure_len(self.weights.len(), inputs.len())?;
        Ok(self
            .weights
            .iter()
            .zip(inputs)
            .fold(self.bias, |acc, (w, x)| acc + w * x))
    }
}
