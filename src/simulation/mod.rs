pub mod animation;
pub mod engine;
pub mod worker;

pub use animation::FrameClock;
pub use engine::{step, step_n, PrerenderOutcome, SimulationEngine};
pub use worker::{Batch, EngineHandle};
