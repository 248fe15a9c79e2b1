// Tests for topology building and the weight get/set contract.

use feedforward::{BiasMode, NetError, Network, NetworkConfig, NeuronKind};

#[test]
fn test_layer_and_link_counts() {
    let net = Network::new(NetworkConfig::new(3, vec![4, 2, 1])).unwrap();

    assert_eq!(net.layer_count(), 3);
    assert_eq!(net.layer_size(0), Some(4));
    assert_eq!(net.layer_size(1), Some(2));
    assert_eq!(net.layer_size(2), Some(1));
    assert_eq!(net.layer_size(3), None);
    assert_eq!(net.output_size(), 1);

    let ws = net.weights();
    assert_eq!(ws[0][0].len(), 3);
    assert_eq!(ws[1][0].len(), 4);
    assert_eq!(ws[2][0].len(), 2);
}

#[test]
fn test_bias_policy_all_but_output() {
    let mut config = NetworkConfig::new(2, vec![2, 2, 2]);
    config.bias = BiasMode::AllButOutput;
    let net = Network::new(config).unwrap();

    assert_eq!(net.layer_size(0), Some(3));
    assert_eq!(net.layer_size(1), Some(3));
    assert_eq!(net.layer_size(2), Some(2));

    assert_eq!(net.neuron_kind(0, 2), Some(NeuronKind::Bias));
    assert_eq!(net.neuron_kind(1, 2), Some(NeuronKind::Bias));
    assert_eq!(net.neuron_kind(2, 0), Some(NeuronKind::Plain));
    assert_eq!(net.neuron_kind(2, 1), Some(NeuronKind::Plain));

    // Bias enables the constant input slot: 2 inputs + 1.
    let ws = net.weights();
    assert_eq!(ws[0][0].len(), 3);
    // Next layers are fed by the previous layer including its bias neuron.
    assert_eq!(ws[1][0].len(), 3);
    assert_eq!(ws[2][0].len(), 3);
}

#[test]
fn test_bias_policy_only_last_hidden() {
    let mut config = NetworkConfig::new(2, vec![2, 2, 2]);
    config.bias = BiasMode::OnlyLastHidden;
    let net = Network::new(config).unwrap();

    assert_eq!(net.layer_size(0), Some(2));
    assert_eq!(net.layer_size(1), Some(3));
    assert_eq!(net.layer_size(2), Some(2));
    assert_eq!(net.neuron_kind(1, 2), Some(NeuronKind::Bias));

    // onlyLast does not add the constant input slot.
    assert_eq!(net.weights()[0][0].len(), 2);
}

#[test]
fn test_single_layer_with_bias_policy_gets_none() {
    // A single layer is the output layer; no policy may add bias to it.
    let mut config = NetworkConfig::new(2, vec![3]);
    config.bias = BiasMode::AllButOutput;
    let net = Network::new(config).unwrap();

    assert_eq!(net.layer_size(0), Some(3));
    assert!((0..3).all(|j| net.neuron_kind(0, j) == Some(NeuronKind::Plain)));
}

#[test]
fn test_configuration_errors() {
    assert!(matches!(
        Network::new(NetworkConfig::new(0, vec![1])).unwrap_err(),
        NetError::Configuration(_)
    ));
    assert!(matches!(
        Network::new(NetworkConfig::new(2, vec![])).unwrap_err(),
        NetError::Configuration(_)
    ));
    assert!(matches!(
        Network::new(NetworkConfig::new(2, vec![2, 0])).unwrap_err(),
        NetError::Configuration(_)
    ));
}

#[test]
fn test_weight_round_trip() {
    let mut net = Network::new(NetworkConfig::new(2, vec![2, 1])).unwrap();
    let ws = vec![
        vec![vec![0.45, -0.12], vec![0.78, 0.13]],
        vec![vec![1.5, -2.3]],
    ];

    net.set_weights(&ws).unwrap();
    assert_eq!(net.weights(), ws);
}

#[test]
fn test_set_weights_rejects_structural_mismatch() {
    let mut net = Network::new(NetworkConfig::new(2, vec![2, 1])).unwrap();
    let good = vec![
        vec![vec![0.45, -0.12], vec![0.78, 0.13]],
        vec![vec![1.5, -2.3]],
    ];
    net.set_weights(&good).unwrap();

    let cases: Vec<feedforward::WeightTensor> = vec![
        // Missing layer.
        vec![vec![vec![0.1, 0.1], vec![0.1, 0.1]]],
        // Extra layer.
        vec![
            vec![vec![0.1, 0.1], vec![0.1, 0.1]],
            vec![vec![0.1, 0.1]],
            vec![vec![0.1]],
        ],
        // Missing neuron.
        vec![vec![vec![0.1, 0.1]], vec![vec![0.1, 0.1]]],
        // Missing link on a plain neuron.
        vec![vec![vec![0.1], vec![0.1, 0.1]], vec![vec![0.1, 0.1]]],
        // Extra link.
        vec![
            vec![vec![0.1, 0.1, 0.1], vec![0.1, 0.1]],
            vec![vec![0.1, 0.1]],
        ],
    ];

    for (i, bad) in cases.iter().enumerate() {
        let err = net.set_weights(bad).unwrap_err();
        assert!(matches!(err, NetError::Shape(_)), "case {i} was not Shape");
        // A rejected tensor leaves the previous weights untouched.
        assert_eq!(net.weights(), good, "case {i} mutated weights");
    }
}

#[test]
fn test_describe_lists_layers() {
    let mut config = NetworkConfig::new(2, vec![2, 1]);
    config.bias = BiasMode::AllButOutput;
    let net = Network::new(config).unwrap();

    let text = net.describe(true);
    assert!(text.contains("Inputs: 2"));
    assert!(text.contains("Layer 0"));
    assert!(text.contains("Layer 1"));
    assert!(text.contains("BIAS"));
    assert!(text.contains("Neuron"));
}
