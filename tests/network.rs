use rand::{rngs::StdRng, SeedableRng};
use rand_distr::Normal;
use synapse::{
    Context, Error, MultiLayerNetwork, Pattern, Recurrence, TransferFunction, CONTEXT_INIT,
};

fn network(sizes: &[usize], learning_rate: f64, transfer: TransferFunction) -> MultiLayerNetwork {
    let mut rng = StdRng::seed_from_u64(42);
    let init = Normal::new(0.0, 0.5).unwrap();
    MultiLayerNetwork::new(&mut rng, init, sizes, learning_rate, transfer).unwrap()
}

fn elman(features: usize, hidden: usize, outputs: usize) -> MultiLayerNetwork {
    let mut rng = StdRng::seed_from_u64(42);
    let init = Normal::new(0.0, 0.5).unwrap();
    MultiLayerNetwork::elman(
        &mut rng,
        init,
        features,
        hidden,
        outputs,
        0.1,
        TransferFunction::sigmoid(),
    )
    .unwrap()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[test]
fn output_length_matches_last_layer() {
    let topologies: [&[usize]; 3] = [&[3, 1], &[3, 5, 2], &[4, 6, 5, 3]];
    for sizes in topologies {
        let mut net = network(sizes, 0.1, TransferFunction::sigmoid());
        let pattern = Pattern::classified(vec![0.25; sizes[0]], 0.0);
        let output = net.execute(&pattern, Recurrence::Off).unwrap();
        assert_eq!(output.len(), sizes[sizes.len() - 1]);
        assert_eq!(net.sizes(), sizes.to_vec());
    }
}

#[test]
fn forward_pass_is_deterministic() {
    let mut net = network(&[3, 4, 2], 0.1, TransferFunction::tanh());
    let pattern = Pattern::classified(vec![0.1, -0.4, 0.9], 0.0);
    let first = net.execute(&pattern, Recurrence::Off).unwrap();
    let second = net.execute(&pattern, Recurrence::Off).unwrap();
    assert_eq!(first, second);
}

#[test]
fn forward_pass_matches_hand_computation() {
    let mut net = network(&[2, 1], 0.1, TransferFunction::sigmoid());
    let neuron = net.layers()[1].neurons()[0].clone();
    let pattern = Pattern::classified(vec![0.3, 0.7], 0.0);
    let output = net.execute(&pattern, Recurrence::Off).unwrap();
    let z = neuron.bias + neuron.weights[0] * 0.3 + neuron.weights[1] * 0.7;
    assert!((output[0] - sigmoid(z)).abs() < 1e-12);
}

#[test]
fn back_propagation_computes_deltas_before_updating() {
    for transfer in [
        TransferFunction::sigmoid(),
        TransferFunction::sigmoid_unit_derivative(),
    ] {
        let rate = 0.3;
        let mut net = network(&[1, 1, 1], rate, transfer);
        let hidden = net.layers()[1].neurons()[0].clone();
        let out = net.layers()[2].neurons()[0].clone();
        let (x, target) = (0.8, 1.0);

        let h = sigmoid(hidden.bias + hidden.weights[0] * x);
        let y = sigmoid(out.bias + out.weights[0] * h);
        let delta_out = (target - y) * transfer.derivative(y);
        let delta_hidden = delta_out * out.weights[0] * transfer.derivative(h);

        let pattern = Pattern::classified(vec![x], 0.0);
        let error = net
            .back_propagate(&pattern, &[target], Recurrence::Off)
            .unwrap();
        assert!((error - (target - y).abs()).abs() < 1e-12);

        let hidden_after = &net.layers()[1].neurons()[0];
        let out_after = &net.layers()[2].neurons()[0];
        assert!((out_after.delta - delta_out).abs() < 1e-12);
        assert!((hidden_after.delta - delta_hidden).abs() < 1e-12);
        assert!((out_after.weights[0] - (out.weights[0] + rate * delta_out * h)).abs() < 1e-12);
        assert!((out_after.bias - (out.bias + rate * delta_out)).abs() < 1e-12);
        assert!(
            (hidden_after.weights[0] - (hidden.weights[0] + rate * delta_hidden * x)).abs()
                < 1e-12
        );
        assert!((hidden_after.bias - (hidden.bias + rate * delta_hidden)).abs() < 1e-12);
    }
}

#[test]
fn repeated_back_propagation_reduces_error_of_single_neuron() {
    let mut net = network(&[2, 1], 0.1, TransferFunction::sigmoid());
    let pattern = Pattern::classified(vec![1.0, 0.0], 0.0);
    let errors: Vec<f64> = (0..200)
        .map(|_| {
            net.back_propagate(&pattern, &[1.0], Recurrence::Off)
                .unwrap()
        })
        .collect();
    assert!(errors.windows(2).all(|w| w[1] <= w[0] + 1e-12));
    assert!(errors[199] < errors[0]);
}

#[test]
fn repeated_back_propagation_reduces_error_through_hidden_layer() {
    let mut net = network(&[2, 3, 1], 0.5, TransferFunction::sigmoid());
    let pattern = Pattern::classified(vec![1.0, 0.0], 0.0);
    let first = net
        .back_propagate(&pattern, &[1.0], Recurrence::Off)
        .unwrap();
    let mut last = first;
    for _ in 0..500 {
        last = net
            .back_propagate(&pattern, &[1.0], Recurrence::Off)
            .unwrap();
    }
    assert!(last < first / 2.0, "{last} !< {first} / 2");
}

#[test]
fn back_propagation_rejects_wrong_expected_length() {
    let mut net = network(&[2, 3, 2], 0.1, TransferFunction::sigmoid());
    let pattern = Pattern::classified(vec![1.0, 0.0], 0.0);
    assert!(matches!(
        net.back_propagate(&pattern, &[1.0], Recurrence::Off),
        Err(Error::DimensionMismatch {
            expected: 2,
            actual: 1
        })
    ));
}

#[test]
fn rejected_recurrent_step_keeps_network_untouched() {
    let mut net = elman(2, 3, 1);
    let pattern = Pattern::sequence(vec![1.0, 0.0], vec![1.0]);
    let before = net.layers().to_vec();

    assert!(matches!(
        net.back_propagate(&pattern, &[1.0, 0.0], Recurrence::On),
        Err(Error::DimensionMismatch {
            expected: 1,
            actual: 2
        })
    ));
    assert_eq!(net.context(), &Context::Initial);
    assert_eq!(net.layers(), before.as_slice());

    net.execute(&pattern, Recurrence::On).unwrap();
    let carried = net.context().clone();
    assert!(net.back_propagate(&pattern, &[], Recurrence::On).is_err());
    assert_eq!(net.context(), &carried);
}

#[test]
fn elman_network_reserves_one_context_slot_per_hidden_neuron() {
    let net = elman(4, 3, 2);
    assert_eq!(net.sizes(), vec![7, 3, 2]);
    assert_eq!(net.context(), &Context::Initial);
}

#[test]
fn recurrent_passes_carry_hidden_state() {
    let mut net = elman(2, 3, 1);
    let pattern = Pattern::sequence(vec![1.0, 0.0], vec![1.0]);

    let first_output = net.execute(&pattern, Recurrence::On).unwrap();
    let first_inputs = net.input_values();
    assert_eq!(first_inputs, vec![1.0, 0.0, CONTEXT_INIT, CONTEXT_INIT, CONTEXT_INIT]);
    let hidden = net.layers()[1].values();
    assert_eq!(net.context(), &Context::Carried(hidden.clone()));

    let second_output = net.execute(&pattern, Recurrence::On).unwrap();
    let second_inputs = net.input_values();
    assert_eq!(&second_inputs[..2], &[1.0, 0.0]);
    assert_eq!(&second_inputs[2..], hidden.as_slice());
    assert_ne!(&second_inputs[2..], &first_inputs[2..]);
    assert_ne!(first_output, second_output);
}

#[test]
fn reset_context_restores_initial_slots() {
    let mut net = elman(2, 3, 1);
    let pattern = Pattern::sequence(vec![0.0, 1.0], vec![1.0]);
    let first = net.execute(&pattern, Recurrence::On).unwrap();
    net.execute(&pattern, Recurrence::On).unwrap();

    net.reset_context();
    assert_eq!(net.context(), &Context::Initial);
    let replay = net.execute(&pattern, Recurrence::On).unwrap();
    assert_eq!(&net.input_values()[2..], &[CONTEXT_INIT; 3]);
    assert_eq!(first, replay);
}

#[test]
fn reinitialize_redraws_parameters_and_context() {
    let mut net = elman(2, 3, 1);
    let pattern = Pattern::sequence(vec![0.0, 1.0], vec![1.0]);
    net.execute(&pattern, Recurrence::On).unwrap();
    let before = net.layers().to_vec();

    net.reinitialize(&mut StdRng::seed_from_u64(9));
    assert_eq!(net.context(), &Context::Initial);
    assert_eq!(net.sizes(), vec![5, 3, 1]);
    assert_ne!(net.layers()[1], before[1]);
}

#[test]
fn predict_class_is_the_strongest_output() {
    let mut net = network(&[2, 4, 3], 0.1, TransferFunction::sigmoid());
    let pattern = Pattern::classified(vec![0.2, 0.9], 0.0);
    let output = net.execute(&pattern, Recurrence::Off).unwrap();
    let class = net.predict_class(&pattern).unwrap();
    assert!(output.iter().all(|&y| y <= output[class]));
}
