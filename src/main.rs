use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::Normal;
use synapse::{
    config::{ElmanConfig, ExperimentConfig, NetworkConfig, PerceptronConfig},
    dataset::{binary_sum_patterns, LabelIndex, Pattern},
    validation, MultiLayerNetwork, NeuronUnit, TrainingStart,
};
use tracing::{error, info};
use tracing_subscriber::{filter::EnvFilter, fmt::format};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A JSON experiment configuration. Defaults are used for everything it leaves out.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for every random draw. Overrides the configured seed.
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Cross-validates a single perceptron on a linearly separable dataset.
    Perceptron,
    /// Cross-validates a multi-layer classifier on clustered data.
    Network,
    /// Trains an Elman network to add binary numbers.
    Elman,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format().with_target(false).without_time())
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "experiment failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> synapse::Result<()> {
    let config = match &args.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    info!(seed, "seeding rng");
    let mut rng = StdRng::seed_from_u64(seed);

    match args.command {
        Command::Perceptron => run_perceptron(&config.perceptron, &mut rng),
        Command::Network => run_network(&config.network, &mut rng),
        Command::Elman => run_elman(&config.elman, &mut rng),
    }
}

fn run_perceptron(config: &PerceptronConfig, rng: &mut StdRng) -> synapse::Result<()> {
    let patterns = separable_patterns(rng, 200);
    let neuron = NeuronUnit::zeroed(2, config.learning_rate);

    let k_fold = validation::evaluate_perceptron_k_fold(
        &mut neuron.clone(),
        &patterns,
        config.epochs,
        config.folds,
        config.shuffle.into(),
        rng,
    )?;
    info!(scores = ?k_fold.folds, mean = k_fold.mean, "perceptron k-fold scores");

    let subsampling = validation::evaluate_perceptron_subsampling(
        &mut neuron.clone(),
        &patterns,
        config.fraction,
        config.epochs,
        config.folds,
        config.shuffle.into(),
        rng,
    )?;
    info!(scores = ?subsampling.folds, mean = subsampling.mean, "perceptron subsampling scores");
    Ok(())
}

fn run_network(config: &NetworkConfig, rng: &mut StdRng) -> synapse::Result<()> {
    let (patterns, labels) = clustered_patterns(rng, 150)?;
    let mut sizes = vec![patterns[0].features.len()];
    sizes.extend(&config.hidden);
    sizes.push(labels.classes());

    let mut network = MultiLayerNetwork::new(
        rng,
        config.init()?,
        &sizes,
        config.learning_rate,
        config.transfer,
    )?;
    let k_fold = validation::evaluate_network_k_fold(
        &mut network,
        &patterns,
        labels.classes(),
        config.epochs,
        config.folds,
        config.shuffle(),
        config.start,
        rng,
    )?;
    info!(scores = ?k_fold.folds, mean = k_fold.mean, "network k-fold scores");

    let mut network = MultiLayerNetwork::new(
        rng,
        config.init()?,
        &sizes,
        config.learning_rate,
        config.transfer,
    )?;
    let subsampling = validation::evaluate_network_subsampling(
        &mut network,
        &patterns,
        labels.classes(),
        config.fraction,
        config.epochs,
        config.folds,
        config.shuffle(),
        config.start,
        rng,
    )?;
    info!(scores = ?subsampling.folds, mean = subsampling.mean, "network subsampling scores");
    Ok(())
}

fn run_elman(config: &ElmanConfig, rng: &mut StdRng) -> synapse::Result<()> {
    let patterns = binary_sum_patterns(rng, config.bits, config.patterns);
    let mut network = MultiLayerNetwork::elman(
        rng,
        config.init()?,
        2 * config.bits,
        config.hidden,
        config.bits + 1,
        config.learning_rate,
        config.transfer,
    )?;
    let scores = validation::evaluate_recurrent(
        &mut network,
        &patterns,
        config.epochs,
        TrainingStart::Continue,
        rng,
    )?;
    info!(scores = ?scores.folds, mean = scores.mean, "recurrent bit accuracy");
    Ok(())
}

/// Points of the unit square, labelled 1 above the diagonal `x + y = 1`.
fn separable_patterns(rng: &mut StdRng, count: usize) -> Vec<Pattern> {
    (0..count)
        .map(|_| {
            let x: f64 = rng.gen();
            let y: f64 = rng.gen();
            let label = if x + y > 1.0 { 1.0 } else { 0.0 };
            Pattern::classified(vec![x, y], label)
        })
        .collect()
}

/// Three labelled clusters in four dimensions.
fn clustered_patterns(
    rng: &mut StdRng,
    count: usize,
) -> synapse::Result<(Vec<Pattern>, LabelIndex)> {
    const CENTRES: [(&str, [f64; 4]); 3] = [
        ("low", [0.2, 0.2, 0.8, 0.1]),
        ("mid", [0.5, 0.6, 0.3, 0.5]),
        ("high", [0.8, 0.3, 0.6, 0.9]),
    ];
    let noise = Normal::new(0.0, 0.08)?;

    let raw: Vec<(&str, Vec<f64>)> = (0..count)
        .map(|i| {
            let (name, centre) = CENTRES[i % CENTRES.len()];
            let features = centre.iter().map(|c| c + rng.sample(noise)).collect();
            (name, features)
        })
        .collect();

    let labels = LabelIndex::from_raw(raw.iter().map(|(name, _)| name));
    let patterns = raw
        .into_iter()
        .filter_map(|(name, features)| {
            labels
                .index_of(name)
                .map(|index| Pattern::classified(features, index as f64))
        })
        .collect();
    Ok((patterns, labels))
}
