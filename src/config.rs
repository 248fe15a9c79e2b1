//! Network configuration structures.
//!
//! This module provides the hyperparameter set a network is built from,
//! deserializable from JSON configuration files. The JSON shape follows the
//! historical format, so `bias` may be a boolean or the string `"onlyLast"`,
//! and `scale_inputs` may be a boolean or a per-column `{min, max}` map.
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "XOR_Sigmoid",
//!   "speed": 1.0,
//!   "momentum": 0.9,
//!   "activation": "sigmoid",
//!   "inputs": 2,
//!   "layers": [4, 1],
//!   "bias": true
//! }
//! ```

use crate::error::{NetError, Result};
use crate::utils::Activation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Bias-neuron policy for the hidden layers.
///
/// The output layer never receives a bias neuron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "BiasRepr", into = "BiasRepr")]
pub enum BiasMode {
    /// No bias neurons anywhere.
    #[default]
    None,
    /// A bias neuron on every layer except the output layer.
    AllButOutput,
    /// A bias neuron only on the layer immediately before the output layer.
    OnlyLastHidden,
}

/// JSON representation of [`BiasMode`]: `false`, `true` or `"onlyLast"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BiasRepr {
    Flag(bool),
    Name(String),
}

impl TryFrom<BiasRepr> for BiasMode {
    type Error = String;

    fn try_from(repr: BiasRepr) -> std::result::Result<Self, String> {
        match repr {
            BiasRepr::Flag(false) => Ok(Self::None),
            BiasRepr::Flag(true) => Ok(Self::AllButOutput),
            BiasRepr::Name(name) if name == "onlyLast" => Ok(Self::OnlyLastHidden),
            BiasRepr::Name(name) => Err(format!("unknown bias mode: {name}")),
        }
    }
}

impl From<BiasMode> for BiasRepr {
    fn from(mode: BiasMode) -> Self {
        match mode {
            BiasMode::None => Self::Flag(false),
            BiasMode::AllButOutput => Self::Flag(true),
            BiasMode::OnlyLastHidden => Self::Name("onlyLast".to_string()),
        }
    }
}

/// Min/max bounds of one input column, used for min-max normalization.
///
/// The bounds observed on the training data must be saved and re-applied
/// when the trained network is used on new data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

/// Input rescaling applied by the forward pass before layer 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ScaleRepr", into = "ScaleRepr")]
pub enum InputScaling {
    /// Inputs are used as-is.
    #[default]
    Off,
    /// Global logarithmic scaling: `x' = 1 / ln(x)`.
    Log,
    /// Per-column min-max normalization: `x' = (x - min) / (max - min)`.
    /// Columns absent from the map pass through unchanged.
    MinMax(BTreeMap<usize, ColumnRange>),
}

/// JSON representation of [`InputScaling`]: `false`, `true` or a column map.
///
/// Column indices travel as JSON object keys, i.e. strings.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ScaleRepr {
    Flag(bool),
    Columns(BTreeMap<String, ColumnRange>),
}

impl TryFrom<ScaleRepr> for InputScaling {
    type Error = String;

    fn try_from(repr: ScaleRepr) -> std::result::Result<Self, String> {
        match repr {
            ScaleRepr::Flag(false) => Ok(Self::Off),
            ScaleRepr::Flag(true) => Ok(Self::Log),
            ScaleRepr::Columns(columns) => {
                let mut map = BTreeMap::new();
                for (key, range) in columns {
                    let index: usize = key
                        .parse()
                        .map_err(|_| format!("invalid scale column index: {key}"))?;
                    map.insert(index, range);
                }
                Ok(Self::MinMax(map))
            }
        }
    }
}

impl From<InputScaling> for ScaleRepr {
    fn from(scaling: InputScaling) -> Self {
        match scaling {
            InputScaling::Off => Self::Flag(false),
            InputScaling::Log => Self::Flag(true),
            InputScaling::MinMax(map) => Self::Columns(
                map.into_iter()
                    .map(|(index, range)| (index.to_string(), range))
                    .collect(),
            ),
        }
    }
}

/// Hyperparameters a network is built from. Immutable once applied.
///
/// # Fields
///
/// * `name` - Network name, used by the persistence layer for its directory
/// * `speed` - Gradient-descent learning rate
/// * `momentum` - Fraction of the previous weight delta retained per update
/// * `regular` - L1 regularization coefficient (0 disables it)
/// * `activation` - Default activation-function name
/// * `activation_by_layers` - Per-layer activation overrides (layer index → name)
/// * `inputs` - Number of external input slots
/// * `layers` - Hidden-layer sizes; the last entry is the output layer
/// * `bias` - Bias-neuron policy
/// * `bias_input` - Append a constant-1 column to every input vector; see
///   [`NetworkConfig::auto_bias_input`] for the resolution rule
/// * `scale_inputs` - Input rescaling option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub momentum: f64,
    #[serde(default)]
    pub regular: f64,
    #[serde(default = "default_activation")]
    pub activation: String,
    #[serde(default)]
    pub activation_by_layers: BTreeMap<usize, String>,
    pub inputs: usize,
    pub layers: Vec<usize>,
    #[serde(default)]
    pub bias: BiasMode,
    #[serde(default)]
    pub bias_input: Option<bool>,
    #[serde(default)]
    pub scale_inputs: InputScaling,
}

fn default_speed() -> f64 {
    0.1
}

fn default_activation() -> String {
    "sigmoid".to_string()
}

impl NetworkConfig {
    /// Minimal configuration: everything defaulted except the architecture.
    pub fn new(inputs: usize, layers: Vec<usize>) -> Self {
        Self {
            name: None,
            speed: default_speed(),
            momentum: 0.0,
            regular: 0.0,
            activation: default_activation(),
            activation_by_layers: BTreeMap::new(),
            inputs,
            layers,
            bias: BiasMode::None,
            bias_input: None,
            scale_inputs: InputScaling::Off,
        }
    }

    /// Whether a constant-1 slot is appended to every input vector.
    ///
    /// Resolution rule: enabling bias neurons implies the bias input unless
    /// it was explicitly disabled, and the `onlyLast` policy always disables
    /// it.
    pub fn auto_bias_input(&self) -> bool {
        if self.bias == BiasMode::OnlyLastHidden {
            return false;
        }
        if self.bias != BiasMode::None && self.bias_input != Some(false) {
            return true;
        }
        self.bias_input.unwrap_or(false)
    }

    /// Validate the configuration.
    ///
    /// Checks that:
    /// - `inputs` is nonzero
    /// - `layers` is non-empty and every layer has at least one neuron
    /// - the default activation and every per-layer override are known names
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.inputs == 0 {
            return Err(NetError::Configuration(
                "the number of network inputs must be greater than 0".to_string(),
            ));
        }
        if self.layers.is_empty() {
            return Err(NetError::Configuration(
                "the network architecture must define at least one layer".to_string(),
            ));
        }
        if let Some(i) = self.layers.iter().position(|&n| n == 0) {
            return Err(NetError::Configuration(format!(
                "layer {i} must have at least one neuron"
            )));
        }

        Activation::parse(&self.activation)?;
        for name in self.activation_by_layers.values() {
            Activation::parse(name)?;
        }

        Ok(())
    }

    /// The activation used by a given layer, after applying overrides.
    ///
    /// Call only on a validated configuration; unknown names in a raw
    /// configuration surface here as `Configuration` errors.
    pub fn layer_activation(&self, layer: usize) -> Result<Activation> {
        match self.activation_by_layers.get(&layer) {
            Some(name) => Activation::parse(name),
            None => Activation::parse(&self.activation),
        }
    }
}

/// Loads a network configuration from a JSON file.
///
/// Reads the file at `path`, deserializes its JSON contents and validates
/// the result.
///
/// # Returns
///
/// `Ok(NetworkConfig)` on success, or an error if the file cannot be read,
/// the JSON is invalid, or validation fails.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<NetworkConfig> {
    let contents = fs::read_to_string(path)?;
    let config: NetworkConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
