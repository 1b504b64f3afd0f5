use crate::simulation::SimulationEngine;
use colored::Colorize;
use std::time::Duration;

/// Most colors listed in the summary before the rest are folded together
const MAX_LISTED_COLORS: usize = 8;

/// Unit vector the ant faces, as text
fn heading_vector(engine: &SimulationEngine) -> String {
    let (dx, dy) = engine.ant().heading(engine.lattice());
    format!("({}, {})", dx, dy)
}

/// One-line ant summary
pub fn ant_line(engine: &SimulationEngine) -> String {
    let ant = engine.ant();
    format!(
        "ant={} dir={} heading={} steps={} cells={}",
        ant.pos,
        ant.dir,
        heading_vector(engine),
        engine.steps_taken(),
        engine.grid().len()
    )
}

/// Print the run summary
pub fn print_summary(engine: &SimulationEngine, elapsed: Duration, quiet: bool) {
    if quiet {
        println!("{}", ant_line(engine));
        return;
    }

    println!(
        "{} {} {} {}",
        "🐜".yellow(),
        "Lattice:".green().bold(),
        engine.lattice().to_string().cyan(),
        format!("rules={}", engine.rules().len()).cyan()
    );

    match engine.grid().bounds() {
        Some(b) => println!(
            "{} x {}..={} y {}..={} {}",
            "📐 Bounds:".green().bold(),
            b.min_x,
            b.max_x,
            b.min_y,
            b.max_y,
            format!("({}x{})", b.width(), b.height()).dimmed()
        ),
        None => println!("{} {}", "📐 Bounds:".green().bold(), "empty".dimmed()),
    }

    let counts = engine.grid().color_counts();
    for (color, n) in counts.iter().take(MAX_LISTED_COLORS) {
        println!("   {} {}", format!("{:>10}", n).bright_white(), color);
    }
    if counts.len() > MAX_LISTED_COLORS {
        let rest: usize = counts[MAX_LISTED_COLORS..].iter().map(|(_, n)| n).sum();
        println!(
            "   {} {}",
            format!("{:>10}", rest).bright_white(),
            format!("({} more colors)", counts.len() - MAX_LISTED_COLORS).dimmed()
        );
    }

    println!(
        "\n{}\n{} {:.3} ms {} {}",
        "===".bright_blue().bold(),
        "⏱️  Prerender Latency:".green().bold(),
        elapsed.as_secs_f64() * 1000.0,
        "|".dimmed(),
        ant_line(engine).cyan(),
    );
}
