use rand_distr::Normal;
use synapse::{
    network::{MultiLayerNetwork, Recurrence},
    training::train_classifier,
    Pattern, TrainingStart, TransferFunction,
};

fn main() -> synapse::Result<()> {
    let mut rng = rand::thread_rng();
    let distribution = Normal::new(0.0, 1.0)?;
    let dataset = vec![
        Pattern::classified(vec![0.0, 0.0], 0.0),
        Pattern::classified(vec![0.0, 1.0], 1.0),
        Pattern::classified(vec![1.0, 0.0], 1.0),
        Pattern::classified(vec![1.0, 1.0], 0.0),
    ];

    let mut mlp = MultiLayerNetwork::new(
        &mut rng,
        distribution,
        &[2, 4, 2],
        0.5,
        TransferFunction::sigmoid(),
    )?;
    train_classifier(
        &mut mlp,
        &dataset,
        2,
        20000,
        TrainingStart::Continue,
        &mut rng,
    )?;

    for sample in &dataset {
        let output = mlp.execute(sample, Recurrence::Off)?;
        println!("input: {:?}", sample.features);
        println!("output: {:?}", output);
        println!("pred: {}", mlp.predict_class(sample)?);
        println!("real: {}", sample.single_label);
        println!("================")
    }
    Ok(())
}
