//! Online training of a single threshold neuron as a binary linear classifier.

use std::borrow::Borrow;

use tracing::{debug, trace};

use crate::{
    dataset::Pattern,
    error::{ensure_len, Error, Result},
    neuron::NeuronUnit,
    training::TrainingStart,
};

/// Classify a pattern: `1.0` if `dot(weights, features) + bias >= 0`, otherwise `0.0`.
pub fn predict(neuron: &NeuronUnit, pattern: &Pattern) -> Result<f64> {
    let sum = neuron.weighted_sum(&pattern.features)?;
    Ok(if sum < 0.0 { 0.0 } else { 1.0 })
}

/// Apply the perceptron rule for one pattern.
///
/// Returns the prediction error `label - prediction` measured before and after the update.
pub fn update_weights(neuron: &mut NeuronUnit, pattern: &Pattern) -> Result<(f64, f64)> {
    let prev_error = pattern.single_label - predict(neuron, pattern)?;
    let step = neuron.learning_rate * prev_error;
    neuron.bias += step;
    for (w, x) in neuron.weights.iter_mut().zip(&pattern.features) {
        *w += step * x;
    }
    let post_error = pattern.single_label - predict(neuron, pattern)?;
    trace!(prev_error, post_error, weights = ?neuron.weights, "perceptron update");
    Ok((prev_error, post_error))
}

/// Train the neuron over the patterns for `epochs + 1` full passes.
///
/// An `epochs` value of 0 still performs one pass. With [`TrainingStart::Reset`] the weights
/// and bias are zeroed first, sized to the first pattern; an empty pattern set is then an error.
pub fn train<P>(
    neuron: &mut NeuronUnit,
    patterns: &[P],
    epochs: usize,
    start: TrainingStart,
) -> Result<()>
where
    P: Borrow<Pattern>,
{
    if start == TrainingStart::Reset {
        let first = patterns.first().ok_or(Error::EmptyDataset)?;
        neuron.reset(first.borrow().features.len());
    }

    for epoch in 0..=epochs {
        let mut squared_prev_error = 0.0;
        let mut squared_post_error = 0.0;
        for pattern in patterns {
            let (prev_error, post_error) = update_weights(neuron, pattern.borrow())?;
            squared_prev_error += prev_error * prev_error;
            squared_post_error += post_error * post_error;
        }
        debug!(
            epoch,
            squared_prev_error, squared_post_error, "perceptron epoch completed"
        );
    }
    Ok(())
}

/// The share of matching entries between two sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accuracy {
    /// The number of positions holding equal values.
    pub correct: usize,
    /// `correct` as a percentage of the sequence length.
    pub percentage: f64,
}

/// Count the positions where `actual` and `predicted` hold equal values.
pub fn accuracy(actual: &[f64], predicted: &[f64]) -> Result<Accuracy> {
    ensure_len(actual.len(), predicted.len())?;
    if actual.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let correct = actual
        .iter()
        .zip(predicted)
        .filter(|(a, p)| a == p)
        .count();
    Ok(Accuracy {
        correct,
        percentage: correct as f64 / actual.len() as f64 * 100.0,
    })
}
