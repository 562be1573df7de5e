use rand_distr::Normal;
use synapse::{
    dataset::{binary_sum_patterns, from_bits},
    network::{MultiLayerNetwork, Recurrence},
    training::train_recurrent,
    TrainingStart, TransferFunction,
};

const BITS: usize = 4;

fn main() -> synapse::Result<()> {
    let mut rng = rand::thread_rng();
    let distribution = Normal::new(0.0, 0.5)?;
    let dataset = binary_sum_patterns(&mut rng, BITS, 30);

    let mut rnn = MultiLayerNetwork::elman(
        &mut rng,
        distribution,
        2 * BITS,
        10,
        BITS + 1,
        0.1,
        TransferFunction::sigmoid(),
    )?;
    train_recurrent(&mut rnn, &dataset, 2000, TrainingStart::Continue, &mut rng)?;

    rnn.reset_context();
    let mut correct = 0;
    for sample in &dataset {
        let pred: Vec<f64> = rnn
            .execute(sample, Recurrence::On)?
            .into_iter()
            .map(f64::round)
            .collect();
        let (a, b) = sample.features.split_at(BITS);
        println!("{} + {}", from_bits(a), from_bits(b));
        println!("pred: {}", from_bits(&pred));
        println!("real: {}", from_bits(&sample.multi_label));
        println!("================");
        if pred == sample.multi_label {
            correct += 1;
        }
    }
    println!("{}/{} sums correct", correct, dataset.len());
    Ok(())
}
