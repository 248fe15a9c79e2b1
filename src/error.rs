//! Error types shared by every public operation of the crate.
//!
//! All core operations are total: they report failures through `Result`
//! values of these kinds instead of panicking. Numeric overflow (NaN,
//! infinity) is *not* an error — it is sanitized in place by the network
//! (NaN becomes 0, infinities become the largest finite value).

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetError>;

/// Failure kinds produced by the network core and its service modules.
#[derive(Error, Debug)]
pub enum NetError {
    /// Missing or invalid architecture parameters, or an unknown
    /// activation-function name. Raised before any topology is built.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A weight tensor or target vector does not structurally match the
    /// topology it is applied to.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Missing or empty input data (input vector, dataset, or CSV cell).
    #[error("invalid input: {0}")]
    Input(String),

    /// An operation was invoked before its prerequisite state existed,
    /// e.g. a backward pass before any forward pass.
    #[error("invalid state: {0}")]
    State(String),

    /// Filesystem failure while reading or writing network files.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure in the persistence layer.
    #[error("serialization failure: {0}")]
    Json(#[from] serde_json::Error),
}
