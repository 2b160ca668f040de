//! Error types shared by the evolution core and its configuration layer.

use thiserror::Error;

/// Errors raised by network construction, configuration and config files.
///
/// All variants are contract violations rather than runtime conditions:
/// they surface at configuration time or signal a construction bug.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A weight matrix (or the bias list) does not fit the layer chain.
    #[error(
        "shape mismatch at layer {layer}: expected {}x{}, found {}x{}",
        expected.0, expected.1, found.0, found.1
    )]
    ShapeMismatch {
        /// Index of the offending layer transition.
        layer: usize,
        /// Shape required by the topology.
        expected: (usize, usize),
        /// Shape actually present.
        found: (usize, usize),
    },
    /// Reading or writing a configuration file failed.
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfiguration(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
