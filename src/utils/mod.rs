//! Shared utilities: activation/loss kernels, the seeded PRNG, and the
//! scaling helpers used by the data scaler.

pub mod activations;
pub mod rng;
pub mod scaling;

pub use activations::{Activation, Loss};
pub use rng::SimpleRng;
