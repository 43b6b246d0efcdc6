//! layerbudget - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use layerbudget::{
    cli::{report, Args, Commands, Verbosity},
    config::Config,
    problem::{presets, SparseUpdateSpec},
    Allocator, Problem, SolverChoice,
};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity());

    let mut config = Config::load(args.config.clone()).context("loading configuration")?;
    if args.no_parallel {
        config.solver.parallel = false;
    }

    match &args.command {
        Commands::Solve {
            file,
            solver,
            budget,
            breakdown,
        } => {
            let mut problem = Problem::load(file)
                .with_context(|| format!("loading problem from {}", file.display()))?;
            if let Some(budget) = budget {
                problem = problem.with_budget(*budget)?;
            }
            run_solve(&args, config, &problem, *solver, *breakdown)?;
        }
        Commands::Check { file } => {
            let problem = Problem::load(file)
                .with_context(|| format!("loading problem from {}", file.display()))?;
            run_check(&args, config, &problem)?;
        }
        Commands::Reference { budget, emit } => {
            run_reference(&args, config, *budget, *emit)?;
        }
        Commands::Config => {
            show_config(&config)?;
        }
    }

    Ok(())
}

/// RUST_LOG wins over the verbosity flags when set
fn init_logging(verbosity: Verbosity) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(verbosity.log_level());
    builder.parse_default_env();
    builder.format_timestamp(None);
    builder.init();
}

fn run_solve(
    args: &Args,
    config: Config,
    problem: &Problem,
    choice: Option<SolverChoice>,
    breakdown: bool,
) -> Result<()> {
    let allocator = Allocator::with_config(config)?;
    let choice = choice.unwrap_or(allocator.config().solver.default);
    debug!(
        "{} layers, budget {}, solver {:?}",
        problem.layer_count(),
        problem.budget(),
        choice
    );

    let solution = allocator.solve_with(problem, choice)?;
    println!("{}", solution.to_json_pretty()?);

    let verbosity = args.verbosity();
    if breakdown && verbosity.show_summary() {
        eprint!("{}", report::render_breakdown(&solution, problem));
    }
    if verbosity.show_stats() {
        eprint!("{}", report::render_stats(allocator.telemetry()));
    }
    Ok(())
}

fn run_check(args: &Args, config: Config, problem: &Problem) -> Result<()> {
    let allocator = Allocator::with_config(config)?;
    let feasibility = allocator.check(problem);
    println!("{}", serde_json::to_string_pretty(&feasibility)?);

    if args.verbosity().show_summary() {
        eprint!("{}", report::render_feasibility(&feasibility));
    }
    Ok(())
}

fn run_reference(args: &Args, config: Config, budget: Option<f64>, emit: bool) -> Result<()> {
    let instance = match budget {
        Some(budget) => SparseUpdateSpec {
            budget,
            ..SparseUpdateSpec::default()
        }
        .build()?,
        None => presets::reference()?,
    };

    if emit {
        println!("{}", instance.problem().to_json_pretty()?);
        return Ok(());
    }

    let allocator = Allocator::with_config(config)?;
    let solution = allocator.solve(instance.problem())?;
    println!("{}", solution.to_json_pretty()?);

    let verbosity = args.verbosity();
    if verbosity.show_summary() {
        eprint!("{}", report::render_breakdown(&solution, instance.problem()));
        if let Some(updates) = solution.choices().and_then(|c| instance.decode(c)) {
            eprint!("{}", report::render_updates(&updates));
        }
    }
    if verbosity.show_stats() {
        eprint!("{}", report::render_stats(allocator.telemetry()));
    }
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    println!("{}", report::render_config(config));
    println!("{}", config.to_toml()?);
    Ok(())
}
