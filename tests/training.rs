use rand::{rngs::StdRng, SeedableRng};
use rand_distr::Normal;
use synapse::{
    dataset::binary_sum_patterns,
    training::{train_classifier, train_recurrent},
    Context, Error, MultiLayerNetwork, Pattern, Recurrence, TrainingStart, TransferFunction,
};

fn classifier(sizes: &[usize], learning_rate: f64) -> MultiLayerNetwork {
    let mut rng = StdRng::seed_from_u64(3);
    let init = Normal::new(0.0, 0.1).unwrap();
    MultiLayerNetwork::new(
        &mut rng,
        init,
        sizes,
        learning_rate,
        TransferFunction::sigmoid(),
    )
    .unwrap()
}

fn two_corners() -> Vec<Pattern> {
    vec![
        Pattern::classified(vec![0.0, 0.0], 0.0),
        Pattern::classified(vec![1.0, 1.0], 1.0),
    ]
}

#[test]
fn classifier_learns_two_corners() {
    let patterns = two_corners();
    let mut net = classifier(&[2, 2], 0.5);
    let mut rng = StdRng::seed_from_u64(11);
    train_classifier(&mut net, &patterns, 2, 500, TrainingStart::Reset, &mut rng).unwrap();
    for pattern in &patterns {
        assert_eq!(
            net.predict_class(pattern).unwrap() as f64,
            pattern.single_label
        );
    }
}

#[test]
fn one_epoch_is_one_backpropagation_per_pattern() {
    let patterns = two_corners();
    let mut net = classifier(&[2, 3, 2], 0.2);
    let mut expected = net.clone();
    expected
        .back_propagate(&patterns[0], &[1.0, 0.0], Recurrence::Off)
        .unwrap();
    expected
        .back_propagate(&patterns[1], &[0.0, 1.0], Recurrence::Off)
        .unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    train_classifier(&mut net, &patterns, 2, 0, TrainingStart::Continue, &mut rng).unwrap();
    assert_eq!(net.layers(), expected.layers());
}

#[test]
fn reset_reinitialises_before_training() {
    let patterns = two_corners();
    let mut net = classifier(&[2, 3, 2], 0.2);
    let mut expected = net.clone();
    expected.reinitialize(&mut StdRng::seed_from_u64(5));
    for (pattern, target) in patterns.iter().zip([[1.0, 0.0], [0.0, 1.0]]) {
        expected
            .back_propagate(pattern, &target, Recurrence::Off)
            .unwrap();
    }

    let mut rng = StdRng::seed_from_u64(5);
    train_classifier(&mut net, &patterns, 2, 0, TrainingStart::Reset, &mut rng).unwrap();
    assert_eq!(net.layers(), expected.layers());
}

#[test]
fn classifier_rejects_labels_outside_classes() {
    let patterns = vec![Pattern::classified(vec![0.0, 1.0], 2.0)];
    let mut net = classifier(&[2, 2], 0.5);
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        train_classifier(&mut net, &patterns, 2, 3, TrainingStart::Continue, &mut rng),
        Err(Error::LabelOutOfRange { classes: 2, .. })
    ));
}

#[test]
fn classifier_rejects_output_layer_of_wrong_width() {
    let patterns = two_corners();
    let mut net = classifier(&[2, 3], 0.5);
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        train_classifier(&mut net, &patterns, 2, 3, TrainingStart::Continue, &mut rng),
        Err(Error::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn recurrent_training_runs_recurrent_backpropagation() {
    let mut rng = StdRng::seed_from_u64(21);
    let patterns = binary_sum_patterns(&mut rng, 3, 6);
    let mut net = MultiLayerNetwork::elman(
        &mut rng,
        Normal::new(0.0, 0.5).unwrap(),
        6,
        5,
        4,
        0.1,
        TransferFunction::sigmoid(),
    )
    .unwrap();

    let mut expected = net.clone();
    for pattern in &patterns {
        expected
            .back_propagate(pattern, &pattern.multi_label, Recurrence::On)
            .unwrap();
    }

    train_recurrent(&mut net, &patterns, 0, TrainingStart::Continue, &mut rng).unwrap();
    assert_eq!(net.layers(), expected.layers());
    assert_eq!(net.context(), expected.context());
    assert!(matches!(net.context(), Context::Carried(_)));
}

#[test]
fn recurrent_training_tolerates_empty_sequences() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut net = MultiLayerNetwork::elman(
        &mut rng,
        Normal::new(0.0, 0.5).unwrap(),
        2,
        2,
        1,
        0.1,
        TransferFunction::sigmoid(),
    )
    .unwrap();
    let empty: Vec<Pattern> = Vec::new();
    train_recurrent(&mut net, &empty, 250, TrainingStart::Reset, &mut rng).unwrap();
    assert_eq!(net.context(), &Context::Initial);
}
