//! Engine worker thread.
//!
//! Long prerenders block whichever thread runs them, so a driver can move
//! the engine onto a dedicated thread. Commands go over `mpsc`, each with
//! its own reply channel; replies carry copies, never shared state.

use crate::ant::AntState;
use crate::error::{AntError, Result};
use crate::grid::{CellChange, Position};
use crate::rules::{Color, RuleTable};
use crate::simulation::engine::SimulationEngine;
use std::sync::mpsc;
use std::thread;
use tracing::debug;

type Reply<T> = mpsc::Sender<Result<T>>;

/// Commands sent to the engine worker thread
pub enum EngineCommand {
    Step { n: usize, tx: Reply<Batch> },
    Prerender { n: u64, tx: Reply<Batch> },
    Reset { tx: Reply<()> },
    SetRules { rules: RuleTable, tx: Reply<()> },
    CellColor { pos: Position, tx: Reply<Color> },
    Snapshot { tx: Reply<Batch> },
}

/// Changes plus the ant state after they were applied
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    pub ant: AntState,
    pub changes: Vec<CellChange>,
    pub steps_taken: u64,
}

impl Batch {
    fn from_engine(engine: &SimulationEngine, changes: Vec<CellChange>) -> Self {
        Self {
            ant: engine.ant(),
            changes,
            steps_taken: engine.steps_taken(),
        }
    }
}

/// Handle to the engine worker thread
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Move `engine` onto a new thread and return a handle.
    ///
    /// The thread exits once every handle is dropped.
    pub fn spawn(mut engine: SimulationEngine) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    EngineCommand::Step { n, tx } => {
                        let resp = engine
                            .step_n(n)
                            .map(|changes| Batch::from_engine(&engine, changes));
                        let _ = tx.send(resp);
                    }
                    EngineCommand::Prerender { n, tx } => {
                        let resp = engine
                            .prerender(n)
                            .map(|()| Batch::from_engine(&engine, engine.grid().snapshot()));
                        let _ = tx.send(resp);
                    }
                    EngineCommand::Reset { tx } => {
                        engine.reset();
                        let _ = tx.send(Ok(()));
                    }
                    EngineCommand::SetRules { rules, tx } => {
                        engine.set_rules(rules);
                        let _ = tx.send(Ok(()));
                    }
                    EngineCommand::CellColor { pos, tx } => {
                        let _ = tx.send(Ok(engine.cell_color(pos)));
                    }
                    EngineCommand::Snapshot { tx } => {
                        let snapshot = engine.grid().snapshot();
                        let _ = tx.send(Ok(Batch::from_engine(&engine, snapshot)));
                    }
                }
            }
            debug!("engine worker shutting down");
        });

        Self { cmd_tx }
    }

    fn request<T>(&self, make: impl FnOnce(Reply<T>) -> EngineCommand) -> Result<T> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx
            .send(make(tx))
            .map_err(|_| AntError::WorkerGone)?;
        rx.recv().map_err(|_| AntError::WorkerGone)?
    }

    /// Advance `n` steps
    pub fn step(&self, n: usize) -> Result<Batch> {
        self.request(|tx| EngineCommand::Step { n, tx })
    }

    /// Reset and run `n` steps; the batch holds the full grid
    pub fn prerender(&self, n: u64) -> Result<Batch> {
        self.request(|tx| EngineCommand::Prerender { n, tx })
    }

    pub fn reset(&self) -> Result<()> {
        self.request(|tx| EngineCommand::Reset { tx })
    }

    pub fn set_rules(&self, rules: RuleTable) -> Result<()> {
        self.request(|tx| EngineCommand::SetRules { rules, tx })
    }

    pub fn cell_color(&self, pos: Position) -> Result<Color> {
        self.request(|tx| EngineCommand::CellColor { pos, tx })
    }

    /// Full grid copy plus ant state
    pub fn snapshot(&self) -> Result<Batch> {
        self.request(|tx| EngineCommand::Snapshot { tx })
    }
}
