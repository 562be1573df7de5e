use synapse::{
    perceptron::{self, accuracy},
    NeuronUnit, Pattern, TrainingStart,
};

fn main() -> synapse::Result<()> {
    let dataset = vec![
        Pattern::classified(vec![0.0, 0.0], 0.0),
        Pattern::classified(vec![0.0, 1.0], 0.0),
        Pattern::classified(vec![1.0, 0.0], 0.0),
        Pattern::classified(vec![1.0, 1.0], 1.0),
    ];

    let mut neuron = NeuronUnit::zeroed(2, 0.1);
    perceptron::train(&mut neuron, &dataset, 50, TrainingStart::Reset)?;

    let mut predicted = Vec::with_capacity(dataset.len());
    for sample in &dataset {
        let pred = perceptron::predict(&neuron, sample)?;
        println!("input: {:?}", sample.features);
        println!("pred: {}", pred);
        println!("real: {}", sample.single_label);
        println!("================");
        predicted.push(pred);
    }

    let actual: Vec<f64> = dataset.iter().map(|p| p.single_label).collect();
    let score = accuracy(&actual, &predicted)?;
    println!("weights: {:?}, bias: {}", neuron.weights, neuron.bias);
    println!("accuracy: {}/{} ({}%)", score.correct, dataset.len(), score.percentage);
    Ok(())
}
