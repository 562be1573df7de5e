//! Cross-validation of perceptrons and multi-layer networks.
//!
//! Splits borrow the patterns they partition; nothing is copied and nothing outlives one
//! evaluation call except the trained neuron or network.

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info, instrument};

use crate::{
    dataset::Pattern,
    error::{Error, Result},
    network::{MultiLayerNetwork, Recurrence},
    neuron::NeuronUnit,
    perceptron,
    training::{self, TrainingStart},
};

/// Whether patterns are permuted before being partitioned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shuffle {
    /// Partition the patterns in their original order.
    #[default]
    Ordered,
    /// Partition a random permutation of the patterns.
    Shuffled,
}

impl From<bool> for Shuffle {
    fn from(shuffle: bool) -> Self {
        if shuffle {
            Self::Shuffled
        } else {
            Self::Ordered
        }
    }
}

/// Accuracy percentages of every fold or iteration, with their arithmetic mean.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scores {
    /// The score of each fold, in evaluation order.
    pub folds: Vec<f64>,
    /// The mean of `folds`.
    pub mean: f64,
}

impl Scores {
    fn from_folds(folds: Vec<f64>) -> Self {
        let mean = if folds.is_empty() {
            0.0
        } else {
            folds.iter().sum::<f64>() / folds.len() as f64
        };
        Self { folds, mean }
    }
}

fn order<R>(len: usize, shuffle: Shuffle, rng: &mut R) -> Vec<usize>
where
    R: Rng,
{
    let mut indices: Vec<usize> = (0..len).collect();
    if shuffle == Shuffle::Shuffled {
        indices.shuffle(rng);
    }
    indices
}

/// Split the patterns into a training part of `round(fraction * N)` patterns and a test part
/// holding the rest.
pub fn split_train_test<'a, R>(
    patterns: &'a [Pattern],
    fraction: f64,
    shuffle: Shuffle,
    rng: &mut R,
) -> Result<(Vec<&'a Pattern>, Vec<&'a Pattern>)>
where
    R: Rng,
{
    if !(0.0..=1.0).contains(&fraction) {
        return Err(Error::InvalidFraction(fraction));
    }
    let pivot = ((fraction * patterns.len() as f64).round() as usize).min(patterns.len());
    let indices = order(patterns.len(), shuffle, rng);
    let (train, test) = indices.split_at(pivot);
    let train: Vec<_> = train.iter().map(|&i| &patterns[i]).collect();
    let test: Vec<_> = test.iter().map(|&i| &patterns[i]).collect();
    debug!(train = train.len(), test = test.len(), "train/test split completed");
    Ok((train, test))
}

/// Split the patterns into `k` folds. The first `N mod k` folds hold one extra pattern.
pub fn split_k_fold<'a, R>(
    patterns: &'a [Pattern],
    k: usize,
    shuffle: Shuffle,
    rng: &mut R,
) -> Result<Vec<Vec<&'a Pattern>>>
where
    R: Rng,
{
    if k == 0 {
        return Err(Error::InvalidFoldCount {
            folds: k,
            patterns: patterns.len(),
        });
    }
    let size = patterns.len() / k;
    let extra = patterns.len() % k;
    let indices = order(patterns.len(), shuffle, rng);

    let mut folds = Vec::with_capacity(k);
    let mut rest = indices.as_slice();
    for fold in 0..k {
        let (current, tail) = rest.split_at(size + usize::from(fold < extra));
        folds.push(current.iter().map(|&i| &patterns[i]).collect());
        rest = tail;
    }
    debug!(folds = k, size, extra, "k-fold split completed");
    Ok(folds)
}

fn check_folds(k: usize, patterns: usize) -> Result<()> {
    if k < 2 || k > patterns {
        return Err(Error::InvalidFoldCount { folds: k, patterns });
    }
    Ok(())
}

/// Every pattern outside of fold `held_out`.
fn training_folds<'a>(folds: &[Vec<&'a Pattern>], held_out: usize) -> Vec<&'a Pattern> {
    folds
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != held_out)
        .flat_map(|(_, fold)| fold.iter().copied())
        .collect()
}

fn subsample<'a, R>(
    patterns: &'a [Pattern],
    fraction: f64,
    shuffle: Shuffle,
    rng: &mut R,
) -> Result<(Vec<&'a Pattern>, Vec<&'a Pattern>)>
where
    R: Rng,
{
    let (train, test) = split_train_test(patterns, fraction, shuffle, rng)?;
    if train.is_empty() || test.is_empty() {
        return Err(Error::InvalidFraction(fraction));
    }
    Ok((train, test))
}

fn perceptron_score(neuron: &NeuronUnit, test: &[&Pattern]) -> Result<f64> {
    let actual: Vec<f64> = test.iter().map(|p| p.single_label).collect();
    let predicted = test
        .iter()
        .map(|p| perceptron::predict(neuron, p))
        .collect::<Result<Vec<_>>>()?;
    Ok(perceptron::accuracy(&actual, &predicted)?.percentage)
}

fn network_score(network: &mut MultiLayerNetwork, test: &[&Pattern]) -> Result<f64> {
    let actual: Vec<f64> = test.iter().map(|p| p.single_label).collect();
    let predicted = test
        .iter()
        .map(|p| network.predict_class(p).map(|class| class as f64))
        .collect::<Result<Vec<_>>>()?;
    Ok(perceptron::accuracy(&actual, &predicted)?.percentage)
}

/// Evaluate a perceptron with k-fold cross-validation, retraining it from zero for every fold.
#[instrument(level = "trace", skip_all, fields(k = k, epochs = epochs))]
pub fn evaluate_perceptron_k_fold<R>(
    neuron: &mut NeuronUnit,
    patterns: &[Pattern],
    epochs: usize,
    k: usize,
    shuffle: Shuffle,
    rng: &mut R,
) -> Result<Scores>
where
    R: Rng,
{
    check_folds(k, patterns.len())?;
    let folds = split_k_fold(patterns, k, shuffle, rng)?;
    let mut scores = Vec::with_capacity(k);
    for (fold, test) in folds.iter().enumerate() {
        let train = training_folds(&folds, fold);
        perceptron::train(neuron, &train, epochs, TrainingStart::Reset)?;
        let score = perceptron_score(neuron, test)?;
        info!(fold, train = train.len(), test = test.len(), score, "perceptron fold evaluated");
        scores.push(score);
    }
    let scores = Scores::from_folds(scores);
    info!(folds = k, mean = scores.mean, "perceptron k-fold evaluation completed");
    Ok(scores)
}

/// Evaluate a perceptron on `iterations` independent random train/test splits, retraining it
/// from zero for every split.
#[instrument(level = "trace", skip_all, fields(iterations = iterations, epochs = epochs))]
pub fn evaluate_perceptron_subsampling<R>(
    neuron: &mut NeuronUnit,
    patterns: &[Pattern],
    fraction: f64,
    epochs: usize,
    iterations: usize,
    shuffle: Shuffle,
    rng: &mut R,
) -> Result<Scores>
where
    R: Rng,
{
    if iterations == 0 {
        return Err(Error::NoIterations);
    }
    let mut scores = Vec::with_capacity(iterations);
    for iteration in 0..iterations {
        let (train, test) = subsample(patterns, fraction, shuffle, rng)?;
        perceptron::train(neuron, &train, epochs, TrainingStart::Reset)?;
        let score = perceptron_score(neuron, &test)?;
        info!(
            iteration,
            train = train.len(),
            test = test.len(),
            score,
            "perceptron subsample evaluated"
        );
        scores.push(score);
    }
    let scores = Scores::from_folds(scores);
    info!(iterations, mean = scores.mean, "perceptron subsampling evaluation completed");
    Ok(scores)
}

/// Evaluate a classifier network with k-fold cross-validation.
///
/// `start` decides whether the network is reinitialised before each fold or keeps the weights
/// learned on the previous folds.
#[allow(clippy::too_many_arguments)]
#[instrument(level = "trace", skip_all, fields(k = k, epochs = epochs, ?start))]
pub fn evaluate_network_k_fold<R>(
    network: &mut MultiLayerNetwork,
    patterns: &[Pattern],
    classes: usize,
    epochs: usize,
    k: usize,
    shuffle: Shuffle,
    start: TrainingStart,
    rng: &mut R,
) -> Result<Scores>
where
    R: Rng,
{
    check_folds(k, patterns.len())?;
    let folds = split_k_fold(patterns, k, shuffle, rng)?;
    let mut scores = Vec::with_capacity(k);
    for (fold, test) in folds.iter().enumerate() {
        let train = training_folds(&folds, fold);
        training::train_classifier(network, &train, classes, epochs, start, rng)?;
        let score = network_score(network, test)?;
        info!(fold, train = train.len(), test = test.len(), score, "network fold evaluated");
        scores.push(score);
    }
    let scores = Scores::from_folds(scores);
    info!(folds = k, mean = scores.mean, "network k-fold evaluation completed");
    Ok(scores)
}

/// Evaluate a classifier network on `iterations` independent random train/test splits.
#[allow(clippy::too_many_arguments)]
#[instrument(level = "trace", skip_all, fields(iterations = iterations, epochs = epochs, ?start))]
pub fn evaluate_network_subsampling<R>(
    network: &mut MultiLayerNetwork,
    patterns: &[Pattern],
    classes: usize,
    fraction: f64,
    epochs: usize,
    iterations: usize,
    shuffle: Shuffle,
    start: TrainingStart,
    rng: &mut R,
) -> Result<Scores>
where
    R: Rng,
{
    if iterations == 0 {
        return Err(Error::NoIterations);
    }
    let mut scores = Vec::with_capacity(iterations);
    for iteration in 0..iterations {
        let (train, test) = subsample(patterns, fraction, shuffle, rng)?;
        training::train_classifier(network, &train, classes, epochs, start, rng)?;
        let score = network_score(network, &test)?;
        info!(
            iteration,
            train = train.len(),
            test = test.len(),
            score,
            "network subsample evaluated"
        );
        scores.push(score);
    }
    let scores = Scores::from_folds(scores);
    info!(iterations, mean = scores.mean, "network subsampling evaluation completed");
    Ok(scores)
}

/// Train a recurrent network on a sequence of patterns, then replay the sequence from an
/// initial context and score the rounded outputs of each pattern against its `multi_label`.
#[instrument(level = "trace", skip_all, fields(epochs = epochs, ?start))]
pub fn evaluate_recurrent<R>(
    network: &mut MultiLayerNetwork,
    patterns: &[Pattern],
    epochs: usize,
    start: TrainingStart,
    rng: &mut R,
) -> Result<Scores>
where
    R: Rng,
{
    if patterns.is_empty() {
        return Err(Error::EmptyDataset);
    }
    training::train_recurrent(network, patterns, epochs, start, rng)?;

    network.reset_context();
    let mut scores = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let predicted: Vec<f64> = network
            .execute(pattern, Recurrence::On)?
            .into_iter()
            .map(f64::round)
            .collect();
        debug!(
            features = ?pattern.features,
            expected = ?pattern.multi_label,
            ?predicted,
            "recurrent prediction"
        );
        scores.push(perceptron::accuracy(&pattern.multi_label, &predicted)?.percentage);
    }
    let scores = Scores::from_folds(scores);
    info!(patterns = patterns.len(), mean = scores.mean, "recurrent evaluation completed");
    Ok(scores)
}
