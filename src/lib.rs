//! Feedforward neural networks.
//!
//! This library builds, trains and evaluates feedforward networks of
//! configurable depth and width: forward activation, backpropagation-based
//! gradient descent with momentum and L1 regularization, a selectable set of
//! activation and loss functions, and seeded, reproducible weight
//! initialization.
//!
//! # Modules
//!
//! - `config`: network hyperparameters, (de)serializable from JSON
//! - `network`: topology arena with the forward and backward engines
//! - `init`: weight-initialization strategies (uniform/normal/Xavier/He)
//! - `training`: the epoch/batch training loop and evaluation
//! - `dataset`: CSV reading and column statistics (external collaborator)
//! - `persistence`: JSON save/load of configuration and weights
//! - `plot`: SVG rendering of training error curves
//! - `utils`: activation/loss kernels, the seeded PRNG, scaling helpers
//!
//! # Example
//!
//! ```
//! use feedforward::{Network, NetworkConfig, TrainOptions};
//!
//! // XOR: 2 inputs, one hidden layer of 4, one output.
//! let mut config = NetworkConfig::new(2, vec![4, 1]);
//! config.speed = 1.0;
//! config.momentum = 0.9;
//! config.bias = feedforward::BiasMode::AllButOutput;
//!
//! let dataset = vec![
//!     vec![1.0, 0.0, 1.0],
//!     vec![1.0, 1.0, 0.0],
//!     vec![0.0, 1.0, 1.0],
//!     vec![0.0, 0.0, 0.0],
//! ];
//!
//! let mut net = Network::new(config).unwrap();
//! let summary = net
//!     .train(&dataset, 200, &TrainOptions::default(), None)
//!     .unwrap();
//! assert!(summary.epochs_run <= 200);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod init;
pub mod network;
pub mod persistence;
pub mod plot;
pub mod training;
pub mod utils;

pub use config::{load_config, BiasMode, ColumnRange, InputScaling, NetworkConfig};
pub use error::{NetError, Result};
pub use init::InitMethod;
pub use network::{ForwardOutput, LossValue, Network, NeuronKind, WeightTensor};
pub use training::{
    BatchMode, EvalOptions, EvaluationSummary, TrainOptions, TrainingSession, TrainingSummary,
};
pub use utils::{Activation, Loss, SimpleRng};
