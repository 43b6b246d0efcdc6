//! MCKP solvers
//!
//! Both solvers return the same configuration for the same problem: they
//! share the total order in `ordering`. `Allocator` is the usual entry point:
//! it runs the feasibility check, picks a solver and records telemetry.

pub mod allocator;
pub mod cancel;
pub mod dynamic;
pub mod exhaustive;
pub mod grid;
pub mod ordering;
pub mod walker;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::problem::Problem;
use crate::solution::{Solution, SolverKind};

pub use allocator::Allocator;
pub use cancel::CancellationToken;
pub use dynamic::DynamicSolver;
pub use exhaustive::ExhaustiveSolver;
pub use grid::CostGrid;
pub use ordering::{compare_candidates, BestSoFar, Score};
pub use walker::{ConfigurationWalker, EvaluatedConfiguration};

/// What a solver hands back besides the solution
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub solution: Solution,
    /// Configurations visited (exhaustive) or table cells filled (DP)
    pub evaluated: u64,
}

/// A complete MCKP solver
pub trait Solver {
    fn kind(&self) -> SolverKind;

    fn solve(&self, problem: &Problem, cancel: &CancellationToken) -> Result<SolveOutcome>;
}

/// Caller-facing solver selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SolverChoice {
    Exhaustive,
    #[value(name = "dp", alias = "dynamic-programming")]
    DynamicProgramming,
    /// Exhaustive below the configured configuration count, DP above
    Auto,
}

impl SolverChoice {
    /// Resolve `Auto` against a problem's configuration count
    pub fn resolve(&self, problem: &Problem, auto_threshold: u64) -> SolverKind {
        match self {
            SolverChoice::Exhaustive => SolverKind::Exhaustive,
            SolverChoice::DynamicProgramming => SolverKind::DynamicProgramming,
            SolverChoice::Auto => {
                if problem.configuration_count() < auto_threshold {
                    SolverKind::Exhaustive
                } else {
                    SolverKind::DynamicProgramming
                }
            }
        }
    }
}
