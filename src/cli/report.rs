//! Human-readable rendering for the CLI
//!
//! JSON goes to stdout; these tables go to stderr so the JSON stays pipeable.

use colored::Colorize;

use crate::config::Config;
use crate::problem::{LayerUpdate, Problem};
use crate::solution::Solution;
use crate::telemetry::TelemetryCollector;
use crate::validation::FeasibilityReport;

/// Per-layer allocation table
pub fn render_breakdown(solution: &Solution, problem: &Problem) -> String {
    let rows = solution.breakdown(problem);
    if rows.is_empty() {
        return format!("{}\n", "No feasible allocation".red());
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:>5}  {:>6}  {:>10}  {:>11}  {:>10}  {:>11}\n",
        "layer", "choice", "cost", "improvement", "cum. cost", "cum. impr."
    ));
    out.push_str(&format!("{}\n", "─".repeat(62)));
    for row in &rows {
        let line = format!(
            "{:>5}  {:>6}  {:>10.4}  {:>11.4}  {:>10.4}  {:>11.4}",
            row.layer,
            row.choice,
            row.cost,
            row.improvement,
            row.cumulative_cost,
            row.cumulative_improvement
        );
        if row.cost == 0.0 {
            out.push_str(&format!("{}\n", line.dimmed()));
        } else {
            out.push_str(&format!("{}\n", line));
        }
    }
    out.push_str(&format!(
        "Total: improvement {} at cost {} of {}\n",
        format!("{}", solution.total_improvement).green(),
        solution.total_cost,
        problem.budget()
    ));
    if let Some(loss) = &solution.precision_loss {
        out.push_str(&format!(
            "{} costs rounded to a {} grid (up to {} per option)\n",
            "⚠".yellow(),
            loss.grid_unit,
            loss.max_cost_rounding
        ));
    }
    out
}

/// Decoded sparse-update decisions, one line per layer
pub fn render_updates(updates: &[LayerUpdate]) -> String {
    let mut out = String::new();
    for (layer, update) in updates.iter().enumerate() {
        out.push_str(&format!(
            "  layer {}: bias {}, weights {:.1}%\n",
            layer,
            if update.bias { "updated".green() } else { "frozen".dimmed() },
            update.weight_ratio * 100.0
        ));
    }
    out
}

pub fn render_feasibility(report: &FeasibilityReport) -> String {
    let mut out = String::new();
    let verdict = if report.feasible {
        "feasible".green()
    } else {
        "infeasible".red()
    };
    out.push_str(&format!("Feasibility:       {}\n", verdict));
    out.push_str(&format!("Budget:            {}\n", report.budget));
    out.push_str(&format!("Minimum cost:      {}\n", report.min_cost));
    out.push_str(&format!("Slack:             {}\n", report.slack()));
    out.push_str(&format!("Max improvement:   {}\n", report.max_improvement));
    out.push_str(&format!("Configurations:    {}\n", report.configuration_count));
    if !report.all_skippable() {
        out.push_str(&format!(
            "{} layers without a skip option: {:?}\n",
            "⚠".yellow(),
            report.layers_without_noop
        ));
    }
    out
}

/// Display summary statistics
pub fn render_stats(telemetry: &TelemetryCollector) -> String {
    let stats = telemetry.get_stats();
    let mut out = String::new();
    out.push_str("\nSolve Summary\n");
    out.push_str("─────────────────────────────────────\n");
    out.push_str(&format!("Duration:          {:?}\n", telemetry.elapsed()));
    out.push_str(&format!("Solves:            {}\n", stats.solves_completed));
    out.push_str(&format!("Rejected early:    {}\n", stats.rejected_early));
    out.push_str(&format!("Configurations:    {}\n", stats.configurations_visited));
    out.push_str(&format!("DP cells:          {}\n", stats.cells_evaluated));
    out.push_str(&format!("Precision losses:  {}\n", stats.precision_losses));
    out.push_str(&format!("Solve time:        {}ms\n", stats.total_solve_ms));
    out
}

pub fn render_config(config: &Config) -> String {
    let mut out = String::new();
    out.push_str("layerbudget Configuration\n\n");
    out.push_str("Solver:\n");
    out.push_str(&format!("  Default:         {:?}\n", config.solver.default));
    out.push_str(&format!("  Auto threshold:  {}\n", config.solver.auto_threshold));
    out.push_str(&format!(
        "  Parallel:        {}\n",
        if config.solver.parallel { "enabled" } else { "disabled" }
    ));
    out.push_str(&format!("  Workers:         {}\n", config.worker_threads()));
    out.push_str("\nDynamic programming:\n");
    out.push_str(&format!("  Max decimals:    {}\n", config.dynamic.max_decimals));
    out.push_str(&format!("  Max cells:       {}\n", config.dynamic.max_budget_cells));
    out.push_str("\nExhaustive:\n");
    out.push_str(&format!(
        "  Cancel interval: {}\n",
        config.exhaustive.cancel_check_interval
    ));
    if let Some(path) = Config::default_path() {
        out.push_str(&format!("\nConfig file:       {}\n", path.display()));
    }
    out
}
