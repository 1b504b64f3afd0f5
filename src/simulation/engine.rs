use crate::ant::AntState;
use crate::error::{AntError, Result};
use crate::grid::{CellChange, GridStore, Position};
use crate::lattice::Lattice;
use crate::rules::{Color, Rule, RuleTable};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, trace, warn};

fn fallback_rule() -> &'static Rule {
    static FALLBACK: OnceLock<Rule> = OnceLock::new();
    FALLBACK.get_or_init(Rule::fallback)
}

/// Advance the ant by one step.
///
/// The cell being vacated is recoloured; the destination is neither read
/// nor written, so multi-cell moves jump over intermediate cells. On error
/// nothing is mutated.
#[inline]
pub fn step(
    ant: &mut AntState,
    grid: &mut GridStore,
    rules: &RuleTable,
    lattice: Lattice,
) -> Result<CellChange> {
    let current = grid.get(ant.pos).unwrap_or_else(|| rules.primary_color());
    let rule = match rules.lookup(current) {
        Some(rule) => rule,
        None => {
            trace!(color = %current, pos = %ant.pos, "no rule for color, using fallback");
            fallback_rule()
        }
    };

    let dir = lattice.rotate(ant.dir, &rule.rotation)?;
    let pos = ant
        .pos
        .offset(lattice.vector(dir), rule.steps)
        .ok_or(AntError::CoordinateOverflow {
            pos: ant.pos,
            dir,
            steps: rule.steps,
        })?;

    let change = CellChange::new(ant.pos, rule.next_color.clone());
    grid.set(ant.pos, rule.next_color.clone());
    ant.pos = pos;
    ant.dir = dir;
    Ok(change)
}

/// Apply [`step`] `n` times, returning every change in visitation order.
///
/// A position recoloured twice appears twice; the later entry wins. An
/// error stops the batch immediately with earlier steps kept; they come
/// back in [`AntError::BatchFailed`] so a consumer can stay in sync.
pub fn step_n(
    n: usize,
    ant: &mut AntState,
    grid: &mut GridStore,
    rules: &RuleTable,
    lattice: Lattice,
) -> Result<Vec<CellChange>> {
    let mut changes = Vec::with_capacity(n.min(1 << 16));
    for _ in 0..n {
        match step(ant, grid, rules, lattice) {
            Ok(change) => changes.push(change),
            Err(err) => {
                return Err(AntError::BatchFailed {
                    applied: changes,
                    source: Box::new(err),
                })
            }
        }
    }
    Ok(changes)
}

/// Result of a chunked prerender
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrerenderOutcome {
    /// Steps actually executed
    pub steps: u64,
    /// Whether the cancellation flag stopped the run early
    pub cancelled: bool,
}

/// Owns the ant, the grid and the active rule table.
///
/// Single writer: every mutation goes through `&mut self`.
#[derive(Clone, Debug)]
pub struct SimulationEngine {
    ant: AntState,
    grid: GridStore,
    rules: RuleTable,
    lattice: Lattice,
    pending_lattice: Option<Lattice>,
    steps_taken: u64,
}

impl SimulationEngine {
    /// Create a new simulation engine in its initial state
    pub fn new(rules: RuleTable, lattice: Lattice) -> Self {
        Self {
            ant: AntState::initial(),
            grid: GridStore::new(),
            rules,
            lattice,
            pending_lattice: None,
            steps_taken: 0,
        }
    }

    /// Back to the initial ant state and an empty grid.
    ///
    /// A lattice change requested with [`Self::set_lattice`] takes effect here.
    pub fn reset(&mut self) {
        if let Some(lattice) = self.pending_lattice.take() {
            self.lattice = lattice;
        }
        self.ant = AntState::initial();
        self.grid.clear();
        self.steps_taken = 0;
        debug!(lattice = %self.lattice, "simulation reset");
    }

    /// Replace the rule table; the next step uses it
    pub fn set_rules(&mut self, rules: RuleTable) {
        debug!(colors = rules.len(), "rule table replaced");
        self.rules = rules;
    }

    /// Switch lattice at the next reset
    pub fn set_lattice(&mut self, lattice: Lattice) {
        if lattice == self.lattice {
            self.pending_lattice = None;
        } else {
            self.pending_lattice = Some(lattice);
        }
    }

    /// Advance one step
    pub fn step(&mut self) -> Result<CellChange> {
        let change = step(&mut self.ant, &mut self.grid, &self.rules, self.lattice)?;
        self.steps_taken += 1;
        Ok(change)
    }

    /// Advance `n` steps and return the changes in order
    pub fn step_n(&mut self, n: usize) -> Result<Vec<CellChange>> {
        let result = step_n(n, &mut self.ant, &mut self.grid, &self.rules, self.lattice);
        let applied = match &result {
            Ok(changes) => changes.len(),
            Err(err) => err.applied().len(),
        };
        self.steps_taken += applied as u64;
        result
    }

    /// Advance without collecting changes
    fn advance(&mut self, n: u64) -> Result<()> {
        for _ in 0..n {
            step(&mut self.ant, &mut self.grid, &self.rules, self.lattice)?;
            self.steps_taken += 1;
        }
        Ok(())
    }

    /// Reset, then run `n` steps; only the final grid matters
    pub fn prerender(&mut self, n: u64) -> Result<()> {
        self.reset();
        let start = Instant::now();
        self.advance(n)?;
        debug!(
            steps = n,
            cells = self.grid.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "prerender complete"
        );
        Ok(())
    }

    /// Like [`Self::prerender`] but in batches of `chunk` steps, checking
    /// `cancel` before each batch.
    pub fn prerender_chunked(
        &mut self,
        n: u64,
        chunk: u64,
        cancel: &AtomicBool,
    ) -> Result<PrerenderOutcome> {
        self.reset();
        let chunk = chunk.max(1);
        let mut done = 0u64;
        while done < n {
            if cancel.load(Ordering::Relaxed) {
                warn!(done, requested = n, "prerender cancelled");
                return Ok(PrerenderOutcome {
                    steps: done,
                    cancelled: true,
                });
            }
            let batch = chunk.min(n - done);
            self.advance(batch)?;
            done += batch;
        }
        Ok(PrerenderOutcome {
            steps: done,
            cancelled: false,
        })
    }

    /// Current color of any cell, visited or not
    pub fn cell_color(&self, pos: Position) -> Color {
        self.grid
            .get(pos)
            .unwrap_or_else(|| self.rules.primary_color())
            .clone()
    }

    /// Recolour a cell from outside the simulation
    pub fn set_cell_color(&mut self, pos: Position, color: Color) -> CellChange {
        self.grid.set(pos, color.clone());
        CellChange::new(pos, color)
    }

    pub fn ant(&self) -> AntState {
        self.ant
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    /// Steps since the last reset
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleSpec, FALLBACK_COLOR};

    fn langton() -> RuleTable {
        RuleTable::new(&[
            RuleSpec::new("white", "black", "r", 1),
            RuleSpec::new("black", "white", "l", 1),
        ])
        .unwrap()
    }

    fn c(name: &str) -> Color {
        Color::from(name)
    }

    #[test]
    fn test_square_langton_first_two_steps() {
        let mut engine = SimulationEngine::new(langton(), Lattice::Square);

        // turn right from east (index 0 -> 3), then move along (0, -1)
        let change = engine.step().unwrap();
        assert_eq!(change, CellChange::new(Position::new(0, 0), c("black")));
        assert_eq!(engine.ant(), AntState::new(Position::new(0, -1), 3));
        assert_eq!(engine.grid().get(Position::ORIGIN), Some(&c("black")));

        engine.step().unwrap();
        assert_eq!(engine.grid().get(Position::new(0, -1)), Some(&c("black")));
        assert_eq!(engine.ant(), AntState::new(Position::new(-1, -1), 2));
        assert_eq!(engine.steps_taken(), 2);
    }

    #[test]
    fn test_hex_multi_cell_move_leaves_no_trace() {
        let rules = RuleTable::new(&[RuleSpec::new("white", "white", "n", 3)]).unwrap();
        let mut engine = SimulationEngine::new(rules, Lattice::Hex);

        engine.step().unwrap();
        assert_eq!(engine.ant().pos, Position::new(3, 0));
        assert_eq!(engine.ant().dir, 0);
        assert_eq!(engine.grid().len(), 1);
        assert!(!engine.grid().contains(Position::new(1, 0)));
        assert!(!engine.grid().contains(Position::new(2, 0)));
    }

    #[test]
    fn test_unknown_rotation_fails_without_mutation() {
        let rules = RuleTable::new(&[RuleSpec::new("white", "black", "z", 1)]).unwrap();
        let mut engine = SimulationEngine::new(rules, Lattice::Square);

        let err = engine.step().unwrap_err();
        assert!(matches!(err, AntError::InvalidRule { ref code } if code == "z"));
        assert_eq!(engine.ant(), AntState::initial());
        assert!(engine.grid().is_empty());
        assert_eq!(engine.steps_taken(), 0);
    }

    #[test]
    fn test_batch_error_keeps_earlier_steps() {
        // white -> black with a valid turn, black carries a bad code
        let rules = RuleTable::new(&[
            RuleSpec::new("white", "black", "u", 1),
            RuleSpec::new("black", "white", "?", 1),
        ])
        .unwrap();
        let mut engine = SimulationEngine::new(rules, Lattice::Square);

        // reverse: (0,0) -> (-1,0) -> (0,0) which is black
        let err = engine.step_n(5).unwrap_err();
        assert!(matches!(err.root(), AntError::InvalidRule { .. }));
        assert_eq!(engine.steps_taken(), 2);
        assert_eq!(engine.ant().pos, Position::ORIGIN);
        assert_eq!(engine.grid().len(), 2);

        // the applied changes reproduce the grid exactly
        let mut replay = GridStore::new();
        for change in err.applied() {
            replay.set(change.pos, change.color.clone());
        }
        assert_eq!(
            err.applied(),
            &[
                CellChange::new(Position::new(0, 0), c("black")),
                CellChange::new(Position::new(-1, 0), c("black")),
            ]
        );
        assert_eq!(replay.snapshot(), engine.grid().snapshot());
    }

    #[test]
    fn test_batch_failing_on_first_step_applies_nothing() {
        let rules = RuleTable::new(&[RuleSpec::new("white", "black", "z", 1)]).unwrap();
        let mut engine = SimulationEngine::new(rules, Lattice::Square);

        let err = engine.step_n(3).unwrap_err();
        assert!(err.applied().is_empty());
        assert!(matches!(err.root(), AntError::InvalidRule { ref code } if code == "z"));
        assert!(engine.grid().is_empty());
        assert_eq!(engine.steps_taken(), 0);
    }

    #[test]
    fn test_missing_rule_uses_fallback() {
        let rules = RuleTable::new(&[RuleSpec::new("white", "purple", "l", 1)]).unwrap();
        let mut engine = SimulationEngine::new(rules, Lattice::Square);

        engine.step_n(2).unwrap();
        engine.set_cell_color(engine.ant().pos, c("purple"));
        let before = engine.ant();
        let change = engine.step().unwrap();

        assert_eq!(change, CellChange::new(before.pos, c(FALLBACK_COLOR)));
        assert_eq!(engine.ant().dir, (before.dir + 3) % 4);
        assert_eq!(
            engine.ant().pos,
            before.pos.offset(Lattice::Square.vector(engine.ant().dir), 1).unwrap()
        );
    }

    #[test]
    fn test_zero_steps_is_noop() {
        let mut engine = SimulationEngine::new(langton(), Lattice::Square);
        engine.step_n(7).unwrap();
        let ant = engine.ant();
        let cells = engine.grid().len();

        let changes = engine.step_n(0).unwrap();
        assert!(changes.is_empty());
        assert_eq!(engine.ant(), ant);
        assert_eq!(engine.grid().len(), cells);
    }

    #[test]
    fn test_batch_reports_revisits_in_order() {
        let mut engine = SimulationEngine::new(langton(), Lattice::Square);
        let changes = engine.step_n(200).unwrap();
        assert_eq!(changes.len(), 200);

        let mut replay = GridStore::new();
        for change in &changes {
            replay.set(change.pos, change.color.clone());
        }
        assert_eq!(replay.snapshot(), engine.grid().snapshot());
        assert!(engine.grid().len() < changes.len());
    }

    #[test]
    fn test_determinism() {
        let mut a = SimulationEngine::new(langton(), Lattice::Hex);
        let mut b = SimulationEngine::new(langton(), Lattice::Hex);
        assert_eq!(a.step_n(1000).unwrap(), b.step_n(1000).unwrap());
        assert_eq!(a.ant(), b.ant());
    }

    #[test]
    fn test_composability_random_splits() {
        let mut rng = fastrand::Rng::with_seed(2024);
        for lattice in Lattice::ALL {
            for _ in 0..10 {
                let a = rng.usize(0..300);
                let b = rng.usize(0..300);

                let mut whole = SimulationEngine::new(langton(), lattice);
                let all = whole.step_n(a + b).unwrap();

                let mut split = SimulationEngine::new(langton(), lattice);
                let mut parts = split.step_n(a).unwrap();
                parts.extend(split.step_n(b).unwrap());

                assert_eq!(all, parts);
                assert_eq!(whole.ant(), split.ant());
                assert_eq!(whole.grid().snapshot(), split.grid().snapshot());
            }
        }
    }

    #[test]
    fn test_sparse_invariant() {
        let mut engine = SimulationEngine::new(langton(), Lattice::Square);
        for n in [1usize, 10, 100, 1000] {
            engine.reset();
            engine.step_n(n).unwrap();
            assert!(engine.grid().len() <= n);
        }
    }

    #[test]
    fn test_free_functions_match_engine() {
        let rules = langton();
        let mut ant = AntState::initial();
        let mut grid = GridStore::new();
        let changes = step_n(50, &mut ant, &mut grid, &rules, Lattice::Square).unwrap();

        let mut engine = SimulationEngine::new(langton(), Lattice::Square);
        assert_eq!(engine.step_n(50).unwrap(), changes);
        assert_eq!(engine.ant(), ant);
    }

    #[test]
    fn test_prerender_resets_first() {
        let mut engine = SimulationEngine::new(langton(), Lattice::Square);
        engine.step_n(33).unwrap();
        engine.prerender(100).unwrap();

        let mut fresh = SimulationEngine::new(langton(), Lattice::Square);
        fresh.step_n(100).unwrap();
        assert_eq!(engine.ant(), fresh.ant());
        assert_eq!(engine.grid().snapshot(), fresh.grid().snapshot());
        assert_eq!(engine.steps_taken(), 100);
    }

    #[test]
    fn test_prerender_chunked() {
        let mut engine = SimulationEngine::new(langton(), Lattice::Square);
        let cancel = AtomicBool::new(false);
        let outcome = engine.prerender_chunked(1050, 100, &cancel).unwrap();
        assert_eq!(
            outcome,
            PrerenderOutcome {
                steps: 1050,
                cancelled: false
            }
        );

        let mut whole = SimulationEngine::new(langton(), Lattice::Square);
        whole.prerender(1050).unwrap();
        assert_eq!(engine.ant(), whole.ant());

        cancel.store(true, Ordering::Relaxed);
        let outcome = engine.prerender_chunked(1050, 100, &cancel).unwrap();
        assert!(outcome.cancelled);
        assert_eq!(outcome.steps, 0);
        assert!(engine.grid().is_empty());
    }

    #[test]
    fn test_reset_and_pending_lattice() {
        let mut engine = SimulationEngine::new(langton(), Lattice::Square);
        engine.step_n(10).unwrap();
        engine.set_lattice(Lattice::Hex);
        assert_eq!(engine.lattice(), Lattice::Square);

        engine.reset();
        assert_eq!(engine.lattice(), Lattice::Hex);
        assert_eq!(engine.ant(), AntState::initial());
        assert!(engine.grid().is_empty());
        assert_eq!(engine.steps_taken(), 0);
    }

    #[test]
    fn test_set_rules_applies_to_next_step() {
        let mut engine = SimulationEngine::new(langton(), Lattice::Square);
        engine.step().unwrap();
        engine.set_rules(RuleTable::new(&[RuleSpec::new("white", "green", "n", 2)]).unwrap());

        let change = engine.step().unwrap();
        assert_eq!(change.color, c("green"));
        assert_eq!(engine.ant().pos, Position::new(0, -3));
    }

    #[test]
    fn test_cell_color_defaults_to_primary() {
        let mut engine = SimulationEngine::new(langton(), Lattice::Square);
        assert_eq!(engine.cell_color(Position::new(99, -99)), c("white"));
        engine.set_cell_color(Position::new(99, -99), c("black"));
        assert_eq!(engine.cell_color(Position::new(99, -99)), c("black"));
    }

    #[test]
    fn test_coordinate_overflow_is_reported() {
        let rules = RuleTable::new(&[RuleSpec::new("white", "white", "n", u32::MAX)]).unwrap();
        let mut engine = SimulationEngine::new(rules, Lattice::Square);
        let err = engine.step().unwrap_err();
        assert!(matches!(err, AntError::CoordinateOverflow { .. }));
        assert!(engine.grid().is_empty());
    }
}
