#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_drive::simulation::brain::{INPUT_WIDTH, Network, OUTPUT_WIDTH, Topology};
use evo_drive::simulation::error::Error;
use ndarray::Array2;

fn topologies() -> Vec<Topology> {
    vec![
        Topology::new(0, 1),
        Topology::new(0, 7),
        Topology::new(1, 1),
        Topology::new(1, 4),
        Topology::new(1, 10),
        Topology::new(3, 5),
        Topology::new(6, 2),
    ]
}

#[test]
fn test_initialize_chains_layer_shapes() {
    for topology in topologies() {
        let network = Network::initialize(topology).expect("valid topology");

        assert_eq!(network.layer_count(), topology.hidden_layer_count + 1);
        assert_eq!(network.biases().len(), topology.hidden_layer_count + 1);
        assert_eq!(network.weights(0).nrows(), INPUT_WIDTH);
        assert_eq!(
            network.weights(network.layer_count() - 1).ncols(),
            OUTPUT_WIDTH
        );

        for i in 1..network.layer_count() {
            assert_eq!(network.weights(i).nrows(), network.weights(i - 1).ncols());
        }
        for i in 1..network.layer_count().saturating_sub(1) {
            let (rows, cols) = network.weights(i).dim();
            assert_eq!((rows, cols), (topology.neuron_count, topology.neuron_count));
        }

        assert!(network.check_shapes(topology).is_ok());
        assert_eq!(network.fitness, 0.0);
    }
}

#[test]
fn test_initialize_values_in_unit_range() {
    for topology in topologies() {
        let network = Network::initialize(topology).unwrap();
        for layer in network.layers() {
            assert!(layer.weights().iter().all(|w| (-1.0..=1.0).contains(w)));
            assert!((-1.0..=1.0).contains(&layer.bias()));
        }
    }
}

#[test]
fn test_initialize_rejects_zero_neurons() {
    let result = Network::initialize(Topology::new(2, 0));
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_forward_is_deterministic() {
    let network = Network::initialize(Topology::new(2, 6)).unwrap();
    let first = network.forward(0.3, -0.7, 0.9);
    for _ in 0..10 {
        assert_eq!(network.forward(0.3, -0.7, 0.9), first);
    }
}

#[test]
fn test_forward_output_ranges() {
    let inputs = [
        (0.0, 0.0, 0.0),
        (1.0, 1.0, 1.0),
        (-1.0, 0.5, 0.25),
        (1e6, -1e6, 3.0),
        (f32::MAX, f32::MIN, 0.0),
        (-42.0, 17.5, -0.001),
    ];

    for topology in topologies() {
        for _ in 0..5 {
            let network = Network::initialize(topology).unwrap();
            for &(a, b, c) in &inputs {
                let (acceleration, turning) = network.forward(a, b, c);
                assert!((0.0..=1.0).contains(&acceleration), "acceleration {acceleration}");
                assert!((-1.0..=1.0).contains(&turning), "turning {turning}");
            }
        }
    }
}

#[test]
fn test_forward_matches_hand_computation() {
    let topology = Topology::new(0, 1);
    let weights = Array2::from_shape_vec((3, 2), vec![0.5, -0.5, 0.25, 0.0, -1.0, 1.0]).unwrap();
    let network = Network::from_parts(topology, vec![weights], vec![0.1]).unwrap();

    let (a, b, c) = (0.2_f32, -0.4_f32, 0.6_f32);
    let (ta, tb, tc) = (a.tanh(), b.tanh(), c.tanh());
    let out0 = (ta * 0.5 + tb * 0.25 + tc * -1.0 + 0.1).tanh();
    let out1 = (ta * -0.5 + tb * 0.0 + tc * 1.0 + 0.1).tanh();
    let expected = (1.0 / (1.0 + (-out0).exp()), out1.tanh());

    let (acceleration, turning) = network.forward(a, b, c);
    assert!((acceleration - expected.0).abs() < 1e-6);
    assert!((turning - expected.1).abs() < 1e-6);
}

#[test]
fn test_copy_is_deep_and_resets_fitness() {
    let topology = Topology::new(2, 4);
    let mut source = Network::initialize(topology).unwrap();
    source.fitness = 12.5;

    let mut copy = source.copy(topology).unwrap();
    assert_eq!(copy.fitness, 0.0);
    assert_eq!(copy.layers(), source.layers());

    let before = source.weights(1).clone();
    copy.weights_mut(1).fill(0.123);
    assert_eq!(source.weights(1), &before);
    assert_ne!(copy.weights(1), &before);
    assert_eq!(source.fitness, 12.5);
}

#[test]
fn test_copy_rejects_foreign_topology() {
    let network = Network::initialize(Topology::new(1, 4)).unwrap();
    let result = network.copy(Topology::new(1, 5));
    assert!(matches!(result, Err(Error::ShapeMismatch { layer: 0, .. })));
}

#[test]
fn test_from_parts_rejects_broken_chain() {
    let topology = Topology::new(1, 4);
    let weights = vec![Array2::zeros((3, 4)), Array2::zeros((5, 2))];
    let result = Network::from_parts(topology, weights, vec![0.0, 0.0]);

    match result {
        Err(Error::ShapeMismatch {
            layer,
            expected,
            found,
        }) => {
            assert_eq!(layer, 1);
            assert_eq!(expected, (4, 2));
            assert_eq!(found, (5, 2));
        }
        other => panic!("expected shape mismatch, got {other:?}"),
    }
}

#[test]
fn test_from_parts_rejects_bias_count() {
    let topology = Topology::new(1, 4);
    let weights = vec![Array2::zeros((3, 4)), Array2::zeros((4, 2))];
    let result = Network::from_parts(topology, weights, vec![0.0]);
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}
