//! The network core: topology arena, forward engine and backpropagation.
//!
//! A network is a fixed layered topology built once from a
//! [`NetworkConfig`]. Neurons and links live in per-layer arenas addressed
//! by `(layer, neuron, incoming-slot)` indices; because every layer is fully
//! connected to its predecessor, the source of incoming slot `k` is always
//! neuron `k` of the previous layer (or scaled input slot `k` for layer 0),
//! so links need no back-references.
//!
//! Weights are the only long-lived mutable state: forward passes overwrite
//! neuron activation values, backward passes overwrite link weights and
//! neuron error deltas. Every mutating operation takes `&mut self`, which
//! gives the single-writer discipline the training loop relies on.
//!
//! Numeric overflow is sanitized rather than reported: NaN becomes 0 and
//! infinities become `f64::MAX` wherever activations, deltas or weights are
//! stored. This is a deliberate stability policy.

use crate::config::{InputScaling, NetworkConfig};
use crate::error::{NetError, Result};
use crate::training::TrainingSession;
use crate::utils::{scaling, Activation, Loss};
use std::fmt;
use std::fmt::Write as _;

/// Nested weight representation: layer → neuron → incoming-link weight,
/// in topology order.
pub type WeightTensor = Vec<Vec<Vec<f64>>>;

/// Clamp non-finite intermediate values: NaN → 0, ±∞ → largest finite.
pub(crate) fn sanitize(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else if x.is_infinite() {
        f64::MAX
    } else {
        x
    }
}

/// What a neuron is: a regular computing unit or a constant-1 bias unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeuronKind {
    Plain,
    Bias,
}

/// A weighted connection into a neuron.
///
/// `prev_delta` remembers the last applied weight correction for the
/// momentum term of the next update.
#[derive(Debug, Clone, Default)]
pub(crate) struct Link {
    pub weight: f64,
    pub prev_delta: f64,
}

/// One arena entry. `value` holds the activation computed by the last
/// forward pass; for a bias neuron the *read* value is always 1 regardless
/// of what was stored. `delta` is the accumulated error signal.
#[derive(Debug, Clone)]
pub(crate) struct Neuron {
    pub kind: NeuronKind,
    pub value: f64,
    pub delta: f64,
    pub incoming: Vec<Link>,
}

/// Loss computed by a forward pass when a target vector was supplied.
#[derive(Debug, Clone, Copy)]
pub struct LossValue {
    pub value: f64,
    pub kind: Loss,
}

/// Result of a forward pass: the output-layer activations and, when a
/// target was supplied, the loss against it.
#[derive(Debug, Clone)]
pub struct ForwardOutput {
    pub values: Vec<f64>,
    pub loss: Option<LossValue>,
}

/// A feedforward network: immutable topology, mutable weights.
///
/// # Example
///
/// ```
/// use feedforward::{InitMethod, Network, NetworkConfig};
///
/// let mut net = Network::new(NetworkConfig::new(2, vec![3, 1])).unwrap();
/// let (_, seed) = net.initialize_weights(InitMethod::Auto, Some(42), None).unwrap();
/// assert_eq!(seed, 42);
///
/// let out = net.forward(&[0.5, -0.5], None).unwrap();
/// assert_eq!(out.values.len(), 1);
/// ```
#[derive(Debug)]
pub struct Network {
    pub(crate) config: NetworkConfig,
    /// Activation per layer, resolved from the config's overrides at build.
    pub(crate) activations: Vec<Activation>,
    pub(crate) layers: Vec<Vec<Neuron>>,
    /// Scaled input of the last forward pass, including the constant bias
    /// slot when enabled. Source values for layer-0 links.
    pub(crate) input: Vec<f64>,
    pub(crate) last_output: Vec<f64>,
    pub(crate) target: Vec<f64>,
    pub(crate) has_weights: bool,
    pub(crate) session: Option<TrainingSession>,
}

impl Network {
    /// Build the topology described by `config`.
    ///
    /// Creates every neuron and link with zero weights; no numeric
    /// assignment happens here. Bias neurons are appended as the last
    /// neuron of the layers the bias policy applies to (never the output
    /// layer; under `OnlyLastHidden` only the layer feeding the output
    /// layer). Layer-0 neurons receive one incoming link per input slot,
    /// plus one for the constant bias input when enabled.
    ///
    /// # Errors
    ///
    /// `Configuration` if the architecture is missing/empty or any
    /// activation name (default or per-layer) is unknown.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        config.validate()?;

        let last = config.layers.len() - 1;
        let mut activations = Vec::with_capacity(config.layers.len());
        for l in 0..config.layers.len() {
            activations.push(config.layer_activation(l)?);
        }

        let mut layers = Vec::with_capacity(config.layers.len());
        let mut prev_n = config.inputs + usize::from(config.auto_bias_input());
        for (l, &size) in config.layers.iter().enumerate() {
            let has_bias = l != last
                && match config.bias {
                    crate::config::BiasMode::None => false,
                    crate::config::BiasMode::AllButOutput => true,
                    crate::config::BiasMode::OnlyLastHidden => last >= 1 && l == last - 1,
                };

            let total = size + usize::from(has_bias);
            let mut neurons = Vec::with_capacity(total);
            for j in 0..total {
                let kind = if has_bias && j == total - 1 {
                    NeuronKind::Bias
                } else {
                    NeuronKind::Plain
                };
                neurons.push(Neuron {
                    kind,
                    value: 0.0,
                    delta: 0.0,
                    incoming: vec![Link::default(); prev_n],
                });
            }
            layers.push(neurons);
            prev_n = total;
        }

        Ok(Self {
            config,
            activations,
            layers,
            input: Vec::new(),
            last_output: Vec::new(),
            target: Vec::new(),
            has_weights: false,
            session: None,
        })
    }

    /// The configuration this network was built from.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Number of layers (hidden + output).
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of neurons in a layer, bias neuron included.
    pub fn layer_size(&self, layer: usize) -> Option<usize> {
        self.layers.get(layer).map(|l| l.len())
    }

    /// Width of the output layer.
    pub fn output_size(&self) -> usize {
        self.config.layers[self.config.layers.len() - 1]
    }

    /// Kind of the neuron at `(layer, index)`.
    pub fn neuron_kind(&self, layer: usize, index: usize) -> Option<NeuronKind> {
        self.layers.get(layer)?.get(index).map(|n| n.kind)
    }

    /// Activation value of the neuron at `(layer, index)`.
    ///
    /// A bias neuron reads as 1 regardless of what the last forward pass
    /// stored in it.
    pub fn neuron_activation(&self, layer: usize, index: usize) -> Option<f64> {
        let neuron = self.layers.get(layer)?.get(index)?;
        Some(match neuron.kind {
            NeuronKind::Bias => 1.0,
            NeuronKind::Plain => neuron.value,
        })
    }

    /// Output vector of the last forward pass (empty before the first one).
    pub fn last_output(&self) -> &[f64] {
        &self.last_output
    }

    /// Whether weights have been initialized or assigned.
    pub fn has_weights(&self) -> bool {
        self.has_weights
    }

    /// The loss kind matching this network's output activation.
    pub fn error_kind(&self) -> Loss {
        Loss::for_output(self.activations[self.layers.len() - 1])
    }

    /// Error history of the most recent training run, if any.
    pub fn training_session(&self) -> Option<&TrainingSession> {
        self.session.as_ref()
    }

    pub(crate) fn neuron_value(&self, layer: usize, index: usize) -> f64 {
        let neuron = &self.layers[layer][index];
        match neuron.kind {
            NeuronKind::Bias => 1.0,
            NeuronKind::Plain => neuron.value,
        }
    }

    /// Source activation of incoming slot `slot` of a neuron in `layer`:
    /// the scaled input for layer 0, the previous layer's neuron otherwise.
    pub(crate) fn source_activation(&self, layer: usize, slot: usize) -> f64 {
        if layer == 0 {
            self.input.get(slot).copied().unwrap_or(0.0)
        } else {
            self.neuron_value(layer - 1, slot)
        }
    }

    /// Scale an input vector and store it as the layer-0 link sources.
    ///
    /// Applies the configured rescaling per element, appends the constant-1
    /// bias slot when enabled, and pads/truncates to the layer-0 fan-in
    /// (unvalidated callers may hand rows of the wrong width; missing slots
    /// read as 0).
    pub(crate) fn apply_input(&mut self, input: &[f64]) {
        let mut scaled: Vec<f64> = input
            .iter()
            .enumerate()
            .map(|(i, &v)| match &self.config.scale_inputs {
                InputScaling::Off => v,
                InputScaling::Log => scaling::scale_log(v),
                InputScaling::MinMax(map) => match map.get(&i) {
                    Some(range) => scaling::scale_min_max(v, range.min, range.max),
                    None => v,
                },
            })
            .collect();

        if self.config.auto_bias_input() {
            scaled.push(1.0);
        }

        let slots = self.layers[0][0].incoming.len();
        scaled.resize(slots, 0.0);
        self.input = scaled;
    }

    /// Forward pass: compute every neuron's activation for `input` and
    /// return the output-layer vector.
    ///
    /// Procedure per layer: weighted sum of `weight × source activation`
    /// over each neuron's incoming links, then the layer's activation —
    /// per neuron, or jointly over the layer vector for softmax. NaN
    /// results clamp to 0 and infinities to `f64::MAX`.
    ///
    /// When `target` is supplied the returned output also carries the loss:
    /// cross-entropy if the output layer is softmax, MSE otherwise.
    ///
    /// # Errors
    ///
    /// * `State` - no weights have been initialized or assigned yet
    /// * `Input` - `input` is empty or its length differs from the
    ///   configured input count
    pub fn forward(&mut self, input: &[f64], target: Option<&[f64]>) -> Result<ForwardOutput> {
        if !self.has_weights {
            return Err(NetError::State(
                "network weights have not been initialized or assigned".to_string(),
            ));
        }
        if input.is_empty() {
            return Err(NetError::Input("input vector is empty".to_string()));
        }
        if input.len() != self.config.inputs {
            return Err(NetError::Input(format!(
                "expected {} input values, got {}",
                self.config.inputs,
                input.len()
            )));
        }

        self.apply_input(input);
        Ok(self.run_forward(target))
    }

    /// Forward pass without target or loss computation.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input, None).map(|out| out.values)
    }

    /// One training iteration: an unvalidated forward pass followed by a
    /// backward pass against `target`. Returns the forward output.
    ///
    /// # Errors
    ///
    /// * `Input` - empty input or target
    /// * `State` - weights not initialized
    /// * `Shape` - target length differs from the output width
    pub fn learn(&mut self, input: &[f64], target: &[f64]) -> Result<ForwardOutput> {
        if input.is_empty() || target.is_empty() {
            return Err(NetError::Input(
                "learn requires both an input and a target vector".to_string(),
            ));
        }
        if !self.has_weights {
            return Err(NetError::State(
                "network weights have not been initialized or assigned".to_string(),
            ));
        }

        self.apply_input(input);
        let out = self.run_forward(None);
        self.backward(Some(target), false)?;
        Ok(out)
    }

    pub(crate) fn run_forward(&mut self, target: Option<&[f64]>) -> ForwardOutput {
        let layer_count = self.layers.len();
        let mut out = Vec::new();

        for l in 0..layer_count {
            let f = self.activations[l];
            let n = self.layers[l].len();
            let mut vs = Vec::with_capacity(n);

            for j in 0..n {
                let fan_in = self.layers[l][j].incoming.len();
                let mut sum = 0.0;
                for k in 0..fan_in {
                    sum += self.layers[l][j].incoming[k].weight * self.source_activation(l, k);
                }

                let v = if f.is_layer_wide() { sum } else { f.value(sum) };
                let v = sanitize(v);
                self.layers[l][j].value = v;
                vs.push(v);
            }

            // Layer-wide activation: transform the collected sums jointly,
            // then scatter back to the neurons.
            if f.is_layer_wide() {
                vs = f.vector(&vs);
                for (j, &v) in vs.iter().enumerate() {
                    self.layers[l][j].value = v;
                }
            }

            if l == layer_count - 1 {
                out = vs;
            }
        }

        self.last_output = out.clone();

        let loss = target.map(|t| {
            let kind = self.error_kind();
            LossValue {
                value: kind.compute(&out, t),
                kind,
            }
        });

        ForwardOutput { values: out, loss }
    }

    /// Backward pass: propagate error deltas from the output layer down and
    /// correct every trainable weight by gradient descent with momentum.
    ///
    /// Output layer: `δ = (target − v) · f'(v)`, added to the stored δ in
    /// `batched` mode, then reduced by `L1 · Σ|w_in|` when L1 regularization
    /// is configured. Hidden layers: `δ = f'(v) · Σ (w_out · δ_dest)` over
    /// outgoing links, skipping links into bias neurons; each outgoing link
    /// is corrected by `Δw = speed · δ_dest · v + momentum · Δw_prev` in the
    /// same sweep (the δ sum reads the pre-update weight). Layer-0 incoming
    /// links are corrected with the scaled raw input as source activation.
    ///
    /// When `target` is `None` the target of the previous backward pass (or
    /// delta accumulation) is reused.
    ///
    /// # Errors
    ///
    /// * `State` - no forward result exists, or no target is available
    /// * `Shape` - target length differs from the output width
    pub fn backward(&mut self, target: Option<&[f64]>, batched: bool) -> Result<()> {
        if self.last_output.is_empty() {
            return Err(NetError::State(
                "no forward result to propagate; run forward first".to_string(),
            ));
        }
        if let Some(t) = target {
            if !t.is_empty() {
                self.target = t.to_vec();
            }
        }
        if self.target.is_empty() {
            return Err(NetError::State(
                "no target vector supplied for backpropagation".to_string(),
            ));
        }
        if self.target.len() != self.last_output.len() {
            return Err(NetError::Shape(format!(
                "target has {} values but the output layer has {}",
                self.target.len(),
                self.last_output.len()
            )));
        }

        let last = self.layers.len() - 1;
        let speed = self.config.speed;
        let momentum = self.config.momentum;
        let regular = self.config.regular;

        for l in (0..=last).rev() {
            let f = self.activations[l];

            if l == last {
                // Output layer: deltas only; its incoming weights are
                // corrected while sweeping the layer below.
                for j in 0..self.layers[l].len() {
                    let v = self.neuron_value(l, j);
                    let mut delta = (self.target[j] - v) * f.derivative(v);
                    if batched {
                        delta += self.layers[l][j].delta;
                    }
                    self.assign_delta(l, j, delta, regular);
                }
                continue;
            }

            let next_len = self.layers[l + 1].len();
            for j in 0..self.layers[l].len() {
                let v = self.neuron_value(l, j);
                let mut sum_dw = 0.0;

                for d in 0..next_len {
                    if self.layers[l + 1][d].kind == NeuronKind::Bias {
                        continue;
                    }
                    let dest_delta = self.layers[l + 1][d].delta;
                    let link = &self.layers[l + 1][d].incoming[j];
                    let (w, prev) = (link.weight, link.prev_delta);

                    sum_dw += w * dest_delta;

                    let dw = speed * (dest_delta * v) + momentum * prev;
                    self.correct_link(l + 1, d, j, dw);
                }

                let delta = sum_dw * f.derivative(v);
                self.assign_delta(l, j, delta, 0.0);

                // Input slots are not neurons, so layer-0 incoming weights
                // are corrected here with the raw scaled input as source.
                if l == 0 && self.layers[0][j].kind != NeuronKind::Bias {
                    let own_delta = self.layers[0][j].delta;
                    for k in 0..self.layers[0][j].incoming.len() {
                        let x = self.source_activation(0, k);
                        let prev = self.layers[0][j].incoming[k].prev_delta;
                        let dw = speed * (own_delta * x) + momentum * prev;
                        self.correct_link(0, j, k, dw);
                    }
                }
            }
        }

        Ok(())
    }

    /// Add the output-layer error signal for `target` to the stored deltas
    /// without touching any weight. Used by batched training between
    /// boundary updates. Returns the per-neuron increments.
    ///
    /// # Errors
    ///
    /// * `State` - no forward result exists
    /// * `Shape` - target length differs from the output width
    pub fn accumulate_output_delta(&mut self, target: &[f64]) -> Result<Vec<f64>> {
        if self.last_output.is_empty() {
            return Err(NetError::State(
                "no forward result to accumulate from; run forward first".to_string(),
            ));
        }
        let last = self.layers.len() - 1;
        if target.len() != self.layers[last].len() {
            return Err(NetError::Shape(format!(
                "target has {} values but the output layer has {}",
                target.len(),
                self.layers[last].len()
            )));
        }

        self.target = target.to_vec();
        let f = self.activations[last];
        let mut increments = Vec::with_capacity(target.len());
        for j in 0..self.layers[last].len() {
            let v = self.neuron_value(last, j);
            let d = (target[j] - v) * f.derivative(v);
            let accumulated = self.layers[last][j].delta + d;
            self.assign_delta(last, j, accumulated, 0.0);
            increments.push(d);
        }

        Ok(increments)
    }

    /// Reset the output-layer deltas to zero (batch boundary).
    pub fn reset_output_delta(&mut self) {
        let last = self.layers.len() - 1;
        for neuron in &mut self.layers[last] {
            neuron.delta = 0.0;
        }
    }

    fn assign_delta(&mut self, layer: usize, index: usize, delta: f64, l1: f64) {
        let mut d = sanitize(delta);
        if l1 != 0.0 && !self.layers[layer][index].incoming.is_empty() {
            let weight_sum: f64 = self.layers[layer][index]
                .incoming
                .iter()
                .map(|link| link.weight.abs())
                .sum();
            d -= l1 * weight_sum;
        }
        self.layers[layer][index].delta = d;
    }

    fn correct_link(&mut self, layer: usize, index: usize, slot: usize, dw: f64) {
        let dw = sanitize(dw);
        let link = &mut self.layers[layer][index].incoming[slot];
        link.prev_delta = dw;
        link.weight = sanitize(link.weight + dw);
    }

    /// Assign an externally supplied weight tensor.
    ///
    /// The tensor must structurally match the topology: same layer count,
    /// same neuron count per layer, and per non-bias neuron the exact
    /// incoming-link count. Entries for bias neurons may be missing or
    /// short; absent values default to 0. Validation completes before any
    /// weight is written, so a rejected tensor leaves the network unchanged.
    ///
    /// # Errors
    ///
    /// `Shape` describing the first structural mismatch.
    pub fn set_weights(&mut self, weights: &WeightTensor) -> Result<()> {
        if weights.len() != self.layers.len() {
            return Err(NetError::Shape(format!(
                "weight tensor has {} layers but the topology has {}",
                weights.len(),
                self.layers.len()
            )));
        }
        for (l, layer) in self.layers.iter().enumerate() {
            if weights[l].len() != layer.len() {
                return Err(NetError::Shape(format!(
                    "layer {l}: weight tensor has {} neurons but the topology has {}",
                    weights[l].len(),
                    layer.len()
                )));
            }
            for (j, neuron) in layer.iter().enumerate() {
                let given = weights[l][j].len();
                let expected = neuron.incoming.len();
                let mismatch = match neuron.kind {
                    NeuronKind::Plain => given != expected,
                    NeuronKind::Bias => given > expected,
                };
                if mismatch {
                    return Err(NetError::Shape(format!(
                        "layer {l}, neuron {j}: {given} weights given, {expected} links expected"
                    )));
                }
            }
        }

        for (l, layer) in self.layers.iter_mut().enumerate() {
            for (j, neuron) in layer.iter_mut().enumerate() {
                for (k, link) in neuron.incoming.iter_mut().enumerate() {
                    let w = weights[l][j].get(k).copied().unwrap_or(0.0);
                    link.weight = sanitize(w);
                }
            }
        }
        self.has_weights = true;

        Ok(())
    }

    /// Collect the current weights as a nested tensor, in topology order.
    pub fn weights(&self) -> WeightTensor {
        self.layers
            .iter()
            .map(|layer| {
                layer
                    .iter()
                    .map(|neuron| neuron.incoming.iter().map(|link| link.weight).collect())
                    .collect()
            })
            .collect()
    }

    /// Human-readable architecture and state dump.
    ///
    /// With `short`, weights are rounded to four decimals and neuron values
    /// and deltas are omitted.
    pub fn describe(&self, short: bool) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "Inputs: {}", self.config.inputs);

        for (l, neurons) in self.layers.iter().enumerate() {
            let _ = writeln!(s, "Layer {l}");
            for (j, neuron) in neurons.iter().enumerate() {
                let name = match neuron.kind {
                    NeuronKind::Bias => "BIAS",
                    NeuronKind::Plain => "Neuron",
                };
                let _ = write!(s, "  {name} #{j}");
                if !short {
                    let _ = write!(s, " v = {} dE = {}", self.neuron_value(l, j), neuron.delta);
                }
                let _ = write!(s, " | incomes:");
                for link in &neuron.incoming {
                    if short {
                        let _ = write!(s, " {:.4};", link.weight);
                    } else {
                        let _ = write!(s, " {};", link.weight);
                    }
                }
                let _ = writeln!(s);
            }
        }

        s
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(true))
    }
}
