// Train a small sigmoid network on XOR and report the run.
//
// Mirrors the library's canonical example: 2 inputs, one hidden layer of 4
// neurons plus bias, sigmoid everywhere, MSE error. Writes the error curve
// to xor_errors.svg next to the working directory.

use feedforward::{
    plot, BiasMode, InitMethod, Network, NetworkConfig, Result, TrainOptions,
};

const SEED: u64 = 1_620_700_941;
const EPOCHS: usize = 500;

fn main() -> Result<()> {
    env_logger::init();

    let mut config = NetworkConfig::new(2, vec![4, 1]);
    config.name = Some("XOR_Sigmoid".to_string());
    config.speed = 1.0;
    config.momentum = 0.8;
    config.bias = BiasMode::AllButOutput;

    // Last column is the expected result.
    let dataset = vec![
        vec![1.0, 0.0, 1.0],
        vec![1.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0],
        vec![0.0, 0.0, 0.0],
    ];

    let mut net = Network::new(config)?;
    let (_, seed) = net.initialize_weights(InitMethod::Auto, Some(SEED), None)?;

    let summary = net.train(&dataset, EPOCHS, &TrainOptions::default(), None)?;

    println!("SEED: {seed}");
    println!("ERROR: {} ({})", summary.error, summary.error_kind);
    println!("TRUTH: {}", summary.truth);
    println!("TIME: {:?}", summary.elapsed);

    if let Some(session) = net.training_session() {
        plot::save_error_curves(session, "xor_errors.svg", plot::PlotOptions::default())?;
        println!("error curve written to xor_errors.svg");
    }

    for row in &dataset {
        let result = net.predict(&row[..2])?;
        println!("{} xor {} = {:.2}", row[0], row[1], result[0]);
    }

    Ok(())
}
