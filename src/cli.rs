use crate::error::Result;
use crate::lattice::Lattice;
use crate::rules::{generate, parse_compact, parse_rules, presets, RuleTable};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Steps run when neither the command line nor the rule file says otherwise
pub const DEFAULT_STEPS: u64 = 11_000;

/// CLI arguments for the ant automaton
#[derive(Parser, Debug)]
#[command(name = "ant_automaton", about = "🐜 Generalised Langton's ant on square and hex lattices")]
#[command(group(ArgGroup::new("source").args(["rules", "preset", "compact", "random"])))]
pub struct Args {
    /// Path to a TOML rule file
    #[arg(short = 'r', long = "rules")]
    pub rules: Option<PathBuf>,

    /// Built-in rule set (langton, llrr, lrrl, hex-default)
    #[arg(short = 'p', long = "preset")]
    pub preset: Option<String>,

    /// Inline rules: on:next:rotation[:steps],...
    #[arg(long = "compact")]
    pub compact: Option<String>,

    /// Random cyclic rule set with this many colors
    #[arg(long)]
    pub random: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Lattice: square or hex (overrides the rule file)
    #[arg(short = 'l', long)]
    pub lattice: Option<String>,

    /// Steps to prerender (overrides the rule file)
    #[arg(short = 'n', long)]
    pub steps: Option<u64>,

    /// Print only the final ant line
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Log engine activity to stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Fully resolved run configuration
#[derive(Debug)]
pub struct RunConfig {
    pub table: RuleTable,
    pub lattice: Lattice,
    pub steps: u64,
}

impl Args {
    /// Load the selected rule source and merge overrides.
    ///
    /// Precedence: command line, then rule file, then defaults
    /// (Langton's rules, square lattice, [`DEFAULT_STEPS`]).
    pub fn resolve(&self) -> Result<RunConfig> {
        let (table, file_lattice, file_steps) = if let Some(path) = &self.rules {
            let set = parse_rules(path)?;
            (set.table, set.lattice, set.steps)
        } else if let Some(name) = &self.preset {
            (presets::by_name(name)?, None, None)
        } else if let Some(src) = &self.compact {
            (parse_compact(src)?, None, None)
        } else if let Some(count) = self.random {
            let mut rng = match self.seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            (generate::random_table(count, &mut rng)?, None, None)
        } else {
            (presets::by_name("langton")?, None, None)
        };

        let lattice = match &self.lattice {
            Some(name) => name.parse()?,
            None => file_lattice.unwrap_or_default(),
        };

        Ok(RunConfig {
            table,
            lattice,
            steps: self.steps.or(file_steps).unwrap_or(DEFAULT_STEPS),
        })
    }
}
