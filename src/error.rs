use crate::grid::{CellChange, Position};
use thiserror::Error;

/// Errors raised by the ant automaton
#[derive(Debug, Error)]
pub enum AntError {
    /// A rule carries a rotation code the lattice does not understand
    #[error("invalid rotation code in rule set: {code:?}")]
    InvalidRule { code: String },

    /// Rule table cannot be built (empty, zero step count, ...)
    #[error("invalid rule table: {0}")]
    InvalidRuleTable(String),

    /// Moving would leave the addressable coordinate range
    #[error("ant at {pos} heading {dir} cannot move {steps} cells without overflowing")]
    CoordinateOverflow { pos: Position, dir: usize, steps: u32 },

    /// A batch stopped part way; `applied` holds the changes already made
    #[error("batch stopped after {} applied steps: {source}", applied.len())]
    BatchFailed {
        applied: Vec<CellChange>,
        source: Box<AntError>,
    },

    /// Unknown lattice name
    #[error("invalid lattice: {0} (expected \"square\" or \"hex\")")]
    InvalidLattice(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rule file is not valid TOML for a rule set
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Background engine thread has shut down
    #[error("engine worker thread has shut down")]
    WorkerGone,
}

impl AntError {
    /// The underlying error, looking through batch wrappers
    pub fn root(&self) -> &AntError {
        match self {
            AntError::BatchFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Changes a failed batch applied before stopping
    pub fn applied(&self) -> &[CellChange] {
        match self {
            AntError::BatchFailed { applied, .. } => applied,
            _ => &[],
        }
    }
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, AntError>;
