// XOR as a two-class softmax problem with cross-entropy error.
//
// The last two dataset columns one-hot encode the classes: column 2 is 1
// for "one", column 3 is 1 for "zero".

use feedforward::{BiasMode, InitMethod, Network, NetworkConfig, Result, TrainOptions};

const SEED: u64 = 593_053_583;
const EPOCHS: usize = 1000;

fn main() -> Result<()> {
    env_logger::init();

    let mut config = NetworkConfig::new(2, vec![4, 3, 2]);
    config.name = Some("XOR_Softmax".to_string());
    config.speed = 0.01;
    config.momentum = 0.0;
    config.activation = "softmax".to_string();
    config.bias = BiasMode::AllButOutput;

    let dataset = vec![
        vec![1.0, 0.0, 1.0, 0.0],
        vec![1.0, 1.0, 0.0, 1.0],
        vec![0.0, 1.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0, 1.0],
    ];

    let mut net = Network::new(config)?;
    let (_, seed) = net.initialize_weights(InitMethod::Normal, Some(SEED), Some((0.0, 3.0)))?;

    let summary = net.train(&dataset, EPOCHS, &TrainOptions::default(), None)?;

    println!("SEED: {seed}");
    println!("ERROR: {} ({})", summary.error, summary.error_kind);
    println!("TRUTH: {}", summary.truth);

    for row in &dataset {
        let result = net.predict(&row[..2])?;
        // Class probabilities: result[0] for "one", result[1] for "zero".
        let value = if result[1] > 0.6 { 0 } else { 1 };
        println!("{} xor {} = {value}", row[0], row[1]);
    }

    Ok(())
}
