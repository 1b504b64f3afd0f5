//! # Ant Automaton
//!
//! A generalised Langton's ant on an unbounded square or hex lattice.
//!
//! This library provides the stepping engine, the sparse grid of visited
//! cells, rule tables keyed by color, and drivers for batched, clocked and
//! background-thread simulation. Drawing is left to the caller.

pub mod ant;
pub mod cli;
pub mod error;
pub mod grid;
pub mod lattice;
pub mod report;
pub mod rotation;
pub mod rules;
pub mod simulation;

pub use ant::AntState;
pub use cli::Args;
pub use error::{AntError, Result};
pub use grid::{CellChange, GridStore, Position};
pub use lattice::Lattice;
pub use rotation::{Rotation, RotationCode};
pub use rules::{Color, Rule, RuleSpec, RuleTable};
pub use simulation::SimulationEngine;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        AntError, AntState, Args, CellChange, Color, GridStore, Lattice, Position, Result,
        Rotation, RuleSpec, RuleTable, SimulationEngine,
    };
}
