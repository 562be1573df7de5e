//! An ordered collection of neurons sharing the same inputs.

use rand::Rng;
use rand_distr::Distribution;

use crate::neuron::NeuronUnit;

/// A layer of neurons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeuralLayer {
    neurons: Vec<NeuronUnit>,
}

impl NeuralLayer {
    /// Create an input layer of `len` neurons without weights.
    #[must_use]
    pub fn input(len: usize) -> Self {
        Self {
            neurons: vec![NeuronUnit::input(); len],
        }
    }

    /// Create a layer of `len` neurons, each connected to `fan_in` inputs with random weights.
    pub fn rand<R, D>(rng: &mut R, distribution: &D, fan_in: usize, len: usize) -> Self
    where
        R: Rng,
        D: Distribution<f64>,
    {
        Self {
            neurons: (0..len)
                .map(|_| NeuronUnit::rand(rng, distribution, fan_in))
                .collect(),
        }
    }

    /// The number of neurons in the layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Check if the layer has no neurons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// The neurons of the layer.
    #[must_use]
    pub fn neurons(&self) -> &[NeuronUnit] {
        &self.neurons
    }

    pub(crate) fn neurons_mut(&mut self) -> &mut [NeuronUnit] {
        &mut self.neurons
    }

    /// The activations computed by the last forward pass.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.neurons.iter().map(|n| n.value).collect()
    }
}
