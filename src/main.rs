use ant_automaton::prelude::*;
use ant_automaton::report::print_summary;
use clap::Parser;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    // Load rules and fail fast on codes no step could apply
    let config = args.resolve()?;
    config.table.validate()?;

    // Prerender
    let mut engine = SimulationEngine::new(config.table, config.lattice);
    let start = Instant::now();
    engine.prerender(config.steps)?;
    let elapsed = start.elapsed();

    print_summary(&engine, elapsed, args.quiet);

    Ok(())
}
