//! Network persistence: JSON configuration and weight files.
//!
//! A trained network is stored as two files inside a per-network directory:
//! `config.json` (pretty-printed configuration) and `weights.json` (the
//! compact weight tensor). The error history of the last training run can
//! be appended as a CSV next to them. This is an external collaborator of
//! the core — it only composes the public configuration and weight
//! contracts.

use crate::config::NetworkConfig;
use crate::error::{NetError, Result};
use crate::network::{Network, WeightTensor};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const WEIGHTS_FILE: &str = "weights.json";

/// Directory a network is stored in: `<base>/<name>`, with unnamed
/// networks under `NoNames`.
fn network_dir(base: &Path, name: Option<&str>) -> PathBuf {
    base.join(name.unwrap_or("NoNames"))
}

/// Save a network's configuration and current weights.
///
/// Creates `<base>/<name>/config.json` and `weights.json`, creating the
/// directory when needed. Returns the directory used.
///
/// # Errors
///
/// * `Io` - directory creation or file writing fails
/// * `Json` - serialization fails
pub fn save<P: AsRef<Path>>(network: &Network, base: P) -> Result<PathBuf> {
    let dir = network_dir(base.as_ref(), network.config().name.as_deref());
    fs::create_dir_all(&dir)?;

    let config = serde_json::to_string_pretty(network.config())?;
    fs::write(dir.join(CONFIG_FILE), config)?;

    let weights = serde_json::to_string(&network.weights())?;
    fs::write(dir.join(WEIGHTS_FILE), weights)?;

    log::info!("saved network to {}", dir.display());
    Ok(dir)
}

/// Load a network saved by [`save`].
///
/// Reads and validates the configuration, builds the topology, and assigns
/// the stored weights when a weight file is present.
///
/// # Errors
///
/// * `Io` - the configuration file cannot be read
/// * `Json` - a file does not parse
/// * `Configuration` / `Shape` - the stored data is inconsistent
pub fn load<P: AsRef<Path>>(base: P, name: &str) -> Result<Network> {
    let dir = network_dir(base.as_ref(), Some(name));

    let contents = fs::read_to_string(dir.join(CONFIG_FILE))?;
    let config: NetworkConfig = serde_json::from_str(&contents)?;
    config.validate()?;

    let mut network = Network::new(config)?;

    let weights_path = dir.join(WEIGHTS_FILE);
    if weights_path.exists() {
        let contents = fs::read_to_string(weights_path)?;
        let weights: WeightTensor = serde_json::from_str(&contents)?;
        network.set_weights(&weights)?;
    }

    Ok(network)
}

/// Append the last training run's error history as
/// `<base>/<name>/<session>_errors.csv`, one `epoch;error` line per entry.
///
/// # Errors
///
/// * `State` - the network has no training history
/// * `Io` - the file cannot be written
pub fn save_error_history<P: AsRef<Path>>(network: &Network, base: P) -> Result<PathBuf> {
    let session = network.training_session().ok_or_else(|| {
        NetError::State("the network has no training history to save".to_string())
    })?;

    let dir = network_dir(base.as_ref(), network.config().name.as_deref());
    fs::create_dir_all(&dir)?;

    let mut contents = String::new();
    for (i, error) in session.errors.iter().enumerate() {
        contents.push_str(&format!("{i};{error}\r\n"));
    }

    let path = dir.join(format!("{}_errors.csv", session.session));
    fs::write(&path, contents)?;
    Ok(path)
}
