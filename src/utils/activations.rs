//! Activation and loss kernels for the network.
//!
//! Every function exists in a value and a derivative form, dispatched over a
//! closed enum instead of by name: unknown activation names are rejected when
//! a configuration is validated, before any topology is built.
//!
//! Derivatives take the *activated* value as their argument (the network
//! stores activations, not pre-activation sums), so e.g. sigmoid' is
//! `v * (1 - v)` and tanh' is `1 - v²`.

use crate::error::{NetError, Result};
use std::fmt;

/// The closed set of activation functions a layer can use.
///
/// `Softmax` is layer-wide: it transforms the vector of weighted sums of a
/// whole layer at once, while every other variant is applied per neuron.
///
/// # Example
///
/// ```
/// use feedforward::utils::Activation;
///
/// let f = Activation::parse("sigmoid").unwrap();
/// assert!((f.value(0.0) - 0.5).abs() < 1e-12);
/// assert!(Activation::parse("swish").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu,
    Linear,
    Threshold,
    Softmax,
}

impl Activation {
    /// Resolve an activation by name.
    ///
    /// Accepts the canonical names (`sigmoid`, `tanh`, `relu`, `leaky-relu`,
    /// `linear`, `threshold`, `softmax`) plus the legacy spellings `tangh`,
    /// `leakyrelu` and `leaky_relu`. Unknown names fail with a
    /// `Configuration` error.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "sigmoid" => Ok(Self::Sigmoid),
            "tanh" | "tangh" => Ok(Self::Tanh),
            "relu" => Ok(Self::Relu),
            "leaky-relu" | "leakyrelu" | "leaky_relu" => Ok(Self::LeakyRelu),
            "linear" => Ok(Self::Linear),
            "threshold" => Ok(Self::Threshold),
            "softmax" => Ok(Self::Softmax),
            other => Err(NetError::Configuration(format!(
                "unknown activation function: {other}"
            ))),
        }
    }

    /// Canonical name of this activation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
            Self::Relu => "relu",
            Self::LeakyRelu => "leaky-relu",
            Self::Linear => "linear",
            Self::Threshold => "threshold",
            Self::Softmax => "softmax",
        }
    }

    /// Whether this activation consumes the whole layer as a vector.
    pub fn is_layer_wide(&self) -> bool {
        matches!(self, Self::Softmax)
    }

    /// Scalar activation value.
    ///
    /// For `Softmax` this is the identity: the layer-wide form
    /// ([`Activation::vector`]) is the one the forward pass uses.
    pub fn value(&self, x: f64) -> f64 {
        match self {
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => ((2.0 * x).exp() - 1.0) / ((2.0 * x).exp() + 1.0),
            Self::Relu => x.max(0.0),
            Self::LeakyRelu => x.max(0.01 * x),
            Self::Linear => x,
            Self::Threshold => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Softmax => x,
        }
    }

    /// Derivative with respect to the pre-activation sum, expressed in terms
    /// of the activated value `v`.
    ///
    /// `Softmax` reports 1: the output-layer delta formula
    /// `target − value` already encodes the simplified softmax+cross-entropy
    /// gradient, so no Jacobian is needed in backpropagation.
    pub fn derivative(&self, v: f64) -> f64 {
        match self {
            Self::Sigmoid => (1.0 - v) * v,
            Self::Tanh => 1.0 - v * v,
            Self::Relu => {
                if v > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::LeakyRelu => {
                if v > 0.0 {
                    1.0
                } else {
                    0.01
                }
            }
            Self::Linear | Self::Threshold | Self::Softmax => 1.0,
        }
    }

    /// Layer-wide activation: `yi = exp(xi) / Σ exp(xj)` for softmax
    /// (computed with max subtraction so any finite input stays finite),
    /// the scalar form mapped element-wise for everything else.
    pub fn vector(&self, xs: &[f64]) -> Vec<f64> {
        match self {
            Self::Softmax => {
                if xs.is_empty() {
                    return Vec::new();
                }
                let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let exps: Vec<f64> = xs.iter().map(|x| (x - max).exp()).collect();
                let sum: f64 = exps.iter().sum();
                exps.iter().map(|e| e / sum).collect()
            }
            _ => xs.iter().map(|&x| self.value(x)).collect(),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loss functions used for epoch errors and evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    /// Mean squared error: `Σ (target − value)² / n`.
    Mse,
    /// Cross-entropy: `−Σ target · ln(value) / n`.
    CrossEntropy,
}

impl Loss {
    /// The loss matching an output layer's activation: cross-entropy for
    /// softmax, MSE for everything else.
    pub fn for_output(activation: Activation) -> Self {
        if activation == Activation::Softmax {
            Self::CrossEntropy
        } else {
            Self::Mse
        }
    }

    /// Canonical name, as reported in training summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mse => "MSE",
            Self::CrossEntropy => "crossEntropy",
        }
    }

    /// Compute the loss of `values` against `targets`.
    ///
    /// Missing targets count as 0; an empty value vector yields 0.
    pub fn compute(&self, values: &[f64], targets: &[f64]) -> f64 {
        let n = values.len();
        if n == 0 {
            return 0.0;
        }

        let sum: f64 = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let t = targets.get(i).copied().unwrap_or(0.0);
                match self {
                    Self::Mse => (t - v) * (t - v),
                    Self::CrossEntropy => -t * v.ln(),
                }
            })
            .sum();

        sum / n as f64
    }
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
