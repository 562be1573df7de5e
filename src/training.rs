//! Epoch-based training drivers for multi-layer networks.

use std::borrow::Borrow;

use rand::Rng;
use tracing::{debug, info};

use crate::{
    dataset::{from_bits, Pattern},
    error::{Error, Result},
    network::{MultiLayerNetwork, Recurrence},
};

/// Every how many epochs recurrent training reports a sampled prediction.
pub const MONITOR_INTERVAL: usize = 100;

/// Whether a training run starts from fresh parameters or from the current ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainingStart {
    /// Discard the learned parameters before training.
    #[default]
    Reset,
    /// Keep training from the current parameters.
    Continue,
}

/// Train a classifier for `epochs + 1` passes over the patterns.
///
/// Each pattern's expected output is the one-hot encoding of its class index over `classes`
/// outputs. With [`TrainingStart::Reset`] the network is reinitialised from `rng` first.
pub fn train_classifier<P, R>(
    network: &mut MultiLayerNetwork,
    patterns: &[P],
    classes: usize,
    epochs: usize,
    start: TrainingStart,
    rng: &mut R,
) -> Result<()>
where
    P: Borrow<Pattern>,
    R: Rng,
{
    if start == TrainingStart::Reset {
        network.reinitialize(rng);
    }

    let mut expected = vec![0.0; classes];
    for epoch in 0..=epochs {
        let mut error = 0.0;
        for pattern in patterns {
            let pattern = pattern.borrow();
            one_hot(&mut expected, pattern.single_label)?;
            error += network.back_propagate(pattern, &expected, Recurrence::Off)?;
        }
        debug!(
            epoch,
            mean_error = error / patterns.len().max(1) as f64,
            "classifier epoch completed"
        );
    }
    Ok(())
}

/// Train a recurrent network for `epochs + 1` passes over the sequence of patterns, using each
/// pattern's `multi_label` as expected output.
///
/// Every [`MONITOR_INTERVAL`] epochs the rounded prediction for one randomly chosen pattern is
/// logged next to its expected output. The context is carried through the whole run and is only
/// reset by [`TrainingStart::Reset`].
pub fn train_recurrent<P, R>(
    network: &mut MultiLayerNetwork,
    patterns: &[P],
    epochs: usize,
    start: TrainingStart,
    rng: &mut R,
) -> Result<()>
where
    P: Borrow<Pattern>,
    R: Rng,
{
    if start == TrainingStart::Reset {
        network.reinitialize(rng);
    }

    for epoch in 0..=epochs {
        let monitored = (epoch % MONITOR_INTERVAL == 0 && !patterns.is_empty())
            .then(|| rng.gen_range(0..patterns.len()));
        let mut error = 0.0;
        for (i, pattern) in patterns.iter().enumerate() {
            let pattern = pattern.borrow();
            let (step_error, output) =
                network.back_propagate_with_output(pattern, &pattern.multi_label, Recurrence::On)?;
            error += step_error;
            if monitored == Some(i) {
                report(epoch, pattern, &output);
            }
        }
        debug!(
            epoch,
            mean_error = error / patterns.len().max(1) as f64,
            "recurrent epoch completed"
        );
    }
    Ok(())
}

fn one_hot(expected: &mut [f64], label: f64) -> Result<()> {
    let classes = expected.len();
    if !(label >= 0.0 && label.fract() == 0.0 && (label as usize) < classes) {
        return Err(Error::LabelOutOfRange { label, classes });
    }
    expected.iter_mut().for_each(|x| *x = 0.0);
    expected[label as usize] = 1.0;
    Ok(())
}

fn report(epoch: usize, pattern: &Pattern, output: &[f64]) {
    let predicted: Vec<f64> = output.iter().map(|y| y.round()).collect();
    let (a, b) = pattern.features.split_at(pattern.features.len() / 2);
    info!(
        epoch,
        a = from_bits(a),
        b = from_bits(b),
        expected = from_bits(&pattern.multi_label),
        predicted = from_bits(&predicted),
        expected_bits = ?pattern.multi_label,
        predicted_bits = ?predicted,
        "sampled recurrent prediction"
    );
}
