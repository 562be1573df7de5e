//! Fully connected layered networks, optionally running as Elman simple-recurrent networks.
//!
//! The input layer of a network may be wider than the patterns fed to it. Its buffer is then
//! split into a *feature region*, holding the pattern's features, followed by a *context region*.
//! Outside of recurrent mode the context region always reads [`CONTEXT_INIT`]. In recurrent mode
//! it reads the network's carried [`Context`], which each recurrent pass overwrites with the
//! activations of the first hidden layer once that layer has been computed. The input layer keeps
//! the values that were actually used during a pass; the carried state shows up there on the
//! next recurrent pass.

use rand::Rng;
use rand_distr::Normal;
use tracing::{debug, trace};

use crate::{
    dataset::Pattern,
    error::{ensure_len, Error, Result},
    layer::NeuralLayer,
    transfer::TransferFunction,
};

/// The value every context slot reads before any hidden state was carried over.
pub const CONTEXT_INIT: f64 = 0.5;

/// Whether a pass feeds the first hidden layer back into the input layer's context region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Recurrence {
    /// Context slots read [`CONTEXT_INIT`] and the carried context is left untouched.
    #[default]
    Off,
    /// Context slots read the carried context, which is then replaced by the new hidden state.
    On,
}

/// The hidden state carried between recurrent passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Context {
    /// No recurrent pass happened since construction or the last reset.
    #[default]
    Initial,
    /// The first hidden layer's activations of the last recurrent pass.
    Carried(Vec<f64>),
}

impl Context {
    /// The value context slot `index` reads in recurrent mode.
    #[must_use]
    pub fn slot(&self, index: usize) -> f64 {
        match self {
            Self::Initial => CONTEXT_INIT,
            Self::Carried(values) => values.get(index).copied().unwrap_or(CONTEXT_INIT),
        }
    }
}

/// A multi-layer network of scalar neurons trained by backpropagation.
#[derive(Debug, Clone)]
pub struct MultiLayerNetwork {
    layers: Vec<NeuralLayer>,
    learning_rate: f64,
    transfer: TransferFunction,
    init: Normal<f64>,
    context: Context,
}

impl MultiLayerNetwork {
    /// Create a network with one layer per entry of `sizes`, input layer first.
    ///
    /// Weights and biases of every non-input neuron are sampled from `init`.
    pub fn new<R>(
        rng: &mut R,
        init: Normal<f64>,
        sizes: &[usize],
        learning_rate: f64,
        transfer: impl Into<TransferFunction>,
    ) -> Result<Self>
    where
        R: Rng,
    {
        if sizes.len() < 2 {
            return Err(Error::InvalidTopology(format!(
                "a network needs at least 2 layers, got {}",
                sizes.len()
            )));
        }
        if let Some(layer) = sizes.iter().position(|&size| size == 0) {
            return Err(Error::InvalidTopology(format!("layer {layer} has no neurons")));
        }

        let transfer = transfer.into();
        let network = Self {
            layers: build_layers(rng, &init, sizes),
            learning_rate,
            transfer,
            init,
            context: Context::Initial,
        };
        debug!(
            ?sizes,
            learning_rate,
            transfer = transfer.name(),
            "network initialised"
        );
        Ok(network)
    }

    /// Create an Elman network: `features` inputs plus one context slot per hidden neuron, a
    /// single hidden layer of `hidden` neurons, and `outputs` output neurons.
    pub fn elman<R>(
        rng: &mut R,
        init: Normal<f64>,
        features: usize,
        hidden: usize,
        outputs: usize,
        learning_rate: f64,
        transfer: impl Into<TransferFunction>,
    ) -> Result<Self>
    where
        R: Rng,
    {
        if features == 0 {
            return Err(Error::InvalidTopology(
                "an Elman network needs at least one feature".to_owned(),
            ));
        }
        let network = Self::new(
            rng,
            init,
            &[features + hidden, hidden, outputs],
            learning_rate,
            transfer,
        )?;
        debug!(features, hidden, outputs, "recurrent network initialised");
        Ok(network)
    }

    /// Redraw every weight and bias from the initialisation distribution and reset the context.
    pub fn reinitialize<R>(&mut self, rng: &mut R)
    where
        R: Rng,
    {
        let sizes = self.sizes();
        self.layers = build_layers(rng, &self.init, &sizes);
        self.context = Context::Initial;
        debug!(?sizes, "network reinitialised");
    }

    /// The layers of the network, input layer first.
    #[must_use]
    pub fn layers(&self) -> &[NeuralLayer] {
        &self.layers
    }

    /// The number of neurons of each layer, input layer first.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        self.layers.iter().map(NeuralLayer::len).collect()
    }

    /// The learning rate applied by [`MultiLayerNetwork::back_propagate`].
    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// The transfer function shared by all non-input neurons.
    #[must_use]
    pub fn transfer(&self) -> TransferFunction {
        self.transfer
    }

    /// The hidden state carried between recurrent passes.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Forget the carried hidden state. The next recurrent pass reads [`CONTEXT_INIT`] again.
    pub fn reset_context(&mut self) {
        self.context = Context::Initial;
    }

    /// The values held by the input layer during the last pass, context region included.
    #[must_use]
    pub fn input_values(&self) -> Vec<f64> {
        self.layers[0].values()
    }

    /// Propagate the pattern's features through the network and return the output activations.
    pub fn execute(&mut self, pattern: &Pattern, recurrence: Recurrence) -> Result<Vec<f64>> {
        let features = &pattern.features;
        let input_len = self.layers[0].len();
        if features.len() > input_len {
            return Err(Error::DimensionMismatch {
                expected: input_len,
                actual: features.len(),
            });
        }
        let context_len = input_len - features.len();
        if recurrence == Recurrence::On && context_len > self.layers[1].len() {
            return Err(Error::DimensionMismatch {
                expected: self.layers[1].len(),
                actual: context_len,
            });
        }

        let context = &self.context;
        for (i, neuron) in self.layers[0].neurons_mut().iter_mut().enumerate() {
            neuron.value = match features.get(i) {
                Some(&feature) => feature,
                None if recurrence == Recurrence::On => context.slot(i - features.len()),
                None => CONTEXT_INIT,
            };
        }

        let transfer = self.transfer;
        for i in 1..self.layers.len() {
            let (lower, upper) = self.layers.split_at_mut(i);
            let inputs = lower[i - 1].values();
            for neuron in upper[0].neurons_mut() {
                neuron.value = transfer.apply(neuron.weighted_sum(&inputs)?);
            }
            trace!(layer = i, values = ?upper[0].values(), "layer computed");

            if i == 1 && recurrence == Recurrence::On {
                let mut hidden = upper[0].values();
                hidden.truncate(context_len);
                self.context = Context::Carried(hidden);
            }
        }

        Ok(self.layers[self.layers.len() - 1].values())
    }

    /// Run one backpropagation step towards `expected` and return the mean absolute error of the
    /// output computed before the weights were updated.
    pub fn back_propagate(
        &mut self,
        pattern: &Pattern,
        expected: &[f64],
        recurrence: Recurrence,
    ) -> Result<f64> {
        self.back_propagate_with_output(pattern, expected, recurrence)
            .map(|(error, _)| error)
    }

    /// Like [`MultiLayerNetwork::back_propagate`], also returning the output of the forward pass.
    pub(crate) fn back_propagate_with_output(
        &mut self,
        pattern: &Pattern,
        expected: &[f64],
        recurrence: Recurrence,
    ) -> Result<(f64, Vec<f64>)> {
        let last = self.layers.len() - 1;
        ensure_len(self.layers[last].len(), expected.len())?;
        let output = self.execute(pattern, recurrence)?;

        let transfer = self.transfer;

        // All deltas are computed against the weights of this pass before any of them change.
        for ((neuron, &actual), &target) in self.layers[last]
            .neurons_mut()
            .iter_mut()
            .zip(&output)
            .zip(expected)
        {
            neuron.delta = (target - actual) * transfer.derivative(actual);
        }
        for i in (1..last).rev() {
            let (lower, upper) = self.layers.split_at_mut(i + 1);
            let next = &upper[0];
            for (j, neuron) in lower[i].neurons_mut().iter_mut().enumerate() {
                let error: f64 = next
                    .neurons()
                    .iter()
                    .map(|k| k.delta * k.weights[j])
                    .sum();
                neuron.delta = error * transfer.derivative(neuron.value);
            }
        }

        let rate = self.learning_rate;
        for i in 1..=last {
            let (lower, upper) = self.layers.split_at_mut(i);
            let inputs = lower[i - 1].values();
            for neuron in upper[0].neurons_mut() {
                let step = rate * neuron.delta;
                for (w, x) in neuron.weights.iter_mut().zip(&inputs) {
                    *w += step * x;
                }
                neuron.bias += step;
            }
        }

        let error = output
            .iter()
            .zip(expected)
            .map(|(actual, target)| (actual - target).abs())
            .sum::<f64>()
            / expected.len() as f64;
        trace!(error, "backpropagation step");
        Ok((error, output))
    }

    /// The index of the strongest output for the pattern, evaluated without recurrence.
    pub fn predict_class(&mut self, pattern: &Pattern) -> Result<usize> {
        let output = self.execute(pattern, Recurrence::Off)?;
        Ok(argmax(&output))
    }
}

fn build_layers<R>(rng: &mut R, init: &Normal<f64>, sizes: &[usize]) -> Vec<NeuralLayer>
where
    R: Rng,
{
    let mut layers = Vec::with_capacity(sizes.len());
    layers.push(NeuralLayer::input(sizes[0]));
    for pair in sizes.windows(2) {
        layers.push(NeuralLayer::rand(rng, init, pair[0], pair[1]));
    }
    layers
}

/// The index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max {
                (i, v)
            } else {
                (best, max)
            }
        })
        .0
}
