//! Weight initialization strategies.
//!
//! Initialization owns an explicit [`SimpleRng`] instance seeded either by
//! the caller or from the wall clock; the seed actually used is always
//! reported back, so any initialization can be reproduced exactly.

use crate::error::Result;
use crate::network::{sanitize, Network, NeuronKind, WeightTensor};
use crate::utils::{Activation, SimpleRng};

/// Weight-initialization strategy.
///
/// `Auto` resolves per layer from that layer's activation function:
/// He/Kaiming for the ReLU family, Xavier/Glorot for sigmoid/tanh, and a
/// plain normal distribution otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMethod {
    #[default]
    Auto,
    /// Uniform samples; `params` gives the range (default [-1, 1]).
    Uniform,
    /// Normal samples; `params` gives mean and std (default (0, 1)).
    Normal,
    /// `uniform(-1/√n, 1/√n)` with `n` the traversed neuron's fan-in.
    Xavier,
    /// `normal(0, √(2/n))` with `n` the traversed neuron's fan-in.
    He,
}

impl InitMethod {
    /// Resolve a strategy by name. Unrecognized names fall back to `Auto`,
    /// mirroring the historical behavior; `havier`/`glorot` mean Xavier and
    /// `kayming` means He.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "uniform" => Self::Uniform,
            "normal" => Self::Normal,
            "xavier" | "havier" | "glorot" => Self::Xavier,
            "he" | "kayming" | "kaiming" => Self::He,
            _ => Self::Auto,
        }
    }

    /// The concrete strategy for a layer with activation `f`.
    fn for_layer(self, f: Activation) -> Self {
        if self != Self::Auto {
            return self;
        }
        match f {
            Activation::Relu | Activation::LeakyRelu => Self::He,
            Activation::Sigmoid | Activation::Tanh => Self::Xavier,
            _ => Self::Normal,
        }
    }

    /// Draw one weight for a neuron with `fan_in` incoming links.
    fn draw(self, rng: &mut SimpleRng, fan_in: usize, params: Option<(f64, f64)>) -> f64 {
        match self {
            Self::Uniform => {
                let (min, max) = params.unwrap_or((-1.0, 1.0));
                rng.uniform(min, max)
            }
            Self::Normal => {
                let (mean, std) = params.unwrap_or((0.0, 1.0));
                rng.normal(mean, std)
            }
            Self::Xavier => rng.xavier(fan_in),
            Self::He => rng.he(fan_in),
            // Auto never reaches a draw; it resolves per layer first.
            Self::Auto => rng.normal(0.0, 1.0),
        }
    }
}

impl Network {
    /// Assign initial weights to the built topology.
    ///
    /// When `seed` is absent, one is generated from the wall clock; the
    /// seed actually used is returned together with the produced tensor.
    /// Reproducibility contract: the same seed and strategy on the same
    /// topology produce bit-identical weights.
    ///
    /// Assignment order follows the historical dual traversal: layer-0
    /// incoming links are assigned directly, while every other layer is
    /// filled through the *outgoing* links of the previous layer's neurons
    /// (the output layer through the second-to-last layer's outgoing pass).
    /// Every link is assigned exactly once. For the fan-in-driven
    /// strategies, `n` is the incoming-link count of the neuron being
    /// traversed. Links sourced at a bias neuron — and layer-0 incoming
    /// links of a bias neuron — are fixed to 0.
    ///
    /// `params` feeds the `Uniform` (min, max) and `Normal` (mean, std)
    /// strategies and is ignored by the fan-in-driven ones.
    pub fn initialize_weights(
        &mut self,
        method: InitMethod,
        seed: Option<u64>,
        params: Option<(f64, f64)>,
    ) -> Result<(WeightTensor, u64)> {
        let seed = seed.unwrap_or_else(SimpleRng::seed_from_time);
        let mut rng = SimpleRng::new(seed);

        let last = self.layers.len() - 1;
        for l in 0..self.layers.len() {
            let layer_method = method.for_layer(self.activations[l]);

            for j in 0..self.layers[l].len() {
                let fan_in = self.layers[l][j].incoming.len();
                let is_bias = self.layers[l][j].kind == NeuronKind::Bias;

                // Incoming links exist as assignment targets only on layer 0.
                if l == 0 {
                    for k in 0..fan_in {
                        let w = if is_bias {
                            0.0
                        } else {
                            layer_method.draw(&mut rng, fan_in, params)
                        };
                        self.layers[0][j].incoming[k].weight = sanitize(w);
                    }
                }

                // Outgoing links, i.e. slot j of every next-layer neuron.
                if l < last {
                    for d in 0..self.layers[l + 1].len() {
                        let w = if is_bias {
                            0.0
                        } else {
                            layer_method.draw(&mut rng, fan_in, params)
                        };
                        self.layers[l + 1][d].incoming[j].weight = sanitize(w);
                    }
                }
            }
        }

        self.has_weights = true;
        log::debug!("initialized weights with seed {seed}");

        Ok((self.weights(), seed))
    }
}
