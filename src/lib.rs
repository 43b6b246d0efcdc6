//! layerbudget - Layer-wise update budget allocation
//!
//! Chooses one update option per network layer so the total cost stays
//! within a budget and the total accuracy improvement is maximal (a
//! multiple-choice knapsack).
//!
//! # Architecture
//!
//! - **problem**: validated layers, option menus and fixtures
//! - **solver**: exhaustive and dynamic-programming solvers plus the `Allocator`
//! - **validation**: pre-solve feasibility report
//! - **telemetry**, **config**, **cli**: ambient plumbing for the binary

pub mod errors;
pub mod problem;
pub mod solution;
pub mod validation;
pub mod solver;

// Re-export commonly used types
pub use errors::{AllocatorError, Result};
pub use problem::{Layer, Problem, ProblemDefect, UpdateOption};
pub use solution::{Configuration, LayerAllocation, PrecisionLoss, Solution, SolverKind};
pub use solver::{Allocator, CancellationToken, SolverChoice};
pub use validation::FeasibilityReport;

pub mod telemetry;
pub mod config;
pub mod cli;
