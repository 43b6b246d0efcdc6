//! Command-line argument parsing for layerbudget
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

use crate::solver::SolverChoice;

/// layerbudget - Allocate a layer-wise update budget for on-device training
#[derive(Parser, Debug)]
#[command(name = "layerbudget")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Pick one update option per layer to maximize improvement within a budget", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Run solvers on the calling thread only
    #[arg(long, global = true)]
    pub no_parallel: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve a problem file and print the solution as JSON
    Solve {
        /// Problem file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Solver to use (configured default when omitted)
        #[arg(long, value_enum)]
        solver: Option<SolverChoice>,

        /// Override the budget stored in the file
        #[arg(long)]
        budget: Option<f64>,

        /// Also print a per-layer allocation table
        #[arg(long)]
        breakdown: bool,
    },

    /// Print the feasibility report of a problem file
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Solve the built-in sparse-update reference instance
    Reference {
        /// Override the reference budget
        #[arg(long)]
        budget: Option<f64>,

        /// Print the instance as a problem file instead of solving it
        #[arg(long)]
        emit: bool,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Log level used when RUST_LOG is unset
    pub fn log_level(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Error,
            Verbosity::Normal => LevelFilter::Info,
            Verbosity::Verbose => LevelFilter::Debug,
            Verbosity::VeryVerbose => LevelFilter::Trace,
        }
    }

    /// Check if should show human-readable extras
    pub fn show_summary(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show telemetry statistics
    pub fn show_stats(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_quiet() {
        let args = parse(&["layerbudget", "-q", "config"]);
        assert_eq!(args.verbosity(), Verbosity::Quiet);
        assert_eq!(args.verbosity().log_level(), LevelFilter::Error);
    }

    #[test]
    fn test_verbosity_normal() {
        let args = parse(&["layerbudget", "config"]);
        assert_eq!(args.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        let args = parse(&["layerbudget", "-v", "config"]);
        assert_eq!(args.verbosity(), Verbosity::Verbose);
        assert_eq!(args.verbosity().log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_verbosity_very_verbose() {
        let args = parse(&["layerbudget", "config", "-vv"]);
        assert_eq!(args.verbosity(), Verbosity::VeryVerbose);
        assert_eq!(args.verbosity().log_level(), LevelFilter::Trace);
    }

    #[test]
    fn test_solve_arguments() {
        let args = parse(&[
            "layerbudget",
            "--no-parallel",
            "solve",
            "problem.json",
            "--solver",
            "dp",
            "--budget",
            "12.5",
            "--breakdown",
        ]);
        assert!(args.no_parallel);
        match args.command {
            Commands::Solve {
                file,
                solver,
                budget,
                breakdown,
            } => {
                assert_eq!(file, PathBuf::from("problem.json"));
                assert_eq!(solver, Some(SolverChoice::DynamicProgramming));
                assert_eq!(budget, Some(12.5));
                assert!(breakdown);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_solver_names() {
        for (name, expected) in [
            ("auto", SolverChoice::Auto),
            ("exhaustive", SolverChoice::Exhaustive),
            ("dynamic-programming", SolverChoice::DynamicProgramming),
        ] {
            let args = parse(&["layerbudget", "solve", "p.json", "--solver", name]);
            match args.command {
                Commands::Solve { solver, .. } => assert_eq!(solver, Some(expected)),
                other => panic!("unexpected command: {:?}", other),
            }
        }
    }

    #[test]
    fn test_solve_requires_file() {
        assert!(Args::try_parse_from(["layerbudget", "solve"]).is_err());
    }

    #[test]
    fn test_reference_flags() {
        let args = parse(&["layerbudget", "reference", "--emit"]);
        assert!(matches!(
            args.command,
            Commands::Reference {
                budget: None,
                emit: true
            }
        ));
    }

    #[test]
    fn test_verbosity_methods() {
        assert!(!Verbosity::Quiet.show_summary());
        assert!(Verbosity::Normal.show_summary());

        assert!(!Verbosity::Normal.show_stats());
        assert!(Verbosity::Verbose.show_stats());
        assert_eq!(Verbosity::VeryVerbose.as_str(), "very_verbose");
    }
}
