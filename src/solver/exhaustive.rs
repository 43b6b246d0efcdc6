//! Exhaustive solver
//!
//! Reference implementation: walks the full configuration space, so it is
//! exact by construction and serves as the oracle for the DP solver. Only
//! practical for small instances.

use log::{debug, trace};
use rayon::prelude::*;

use crate::config::ExhaustiveConfig;
use crate::errors::{AllocatorError, Result};
use crate::problem::Problem;
use crate::solution::{Solution, SolverKind};
use crate::solver::cancel::CancellationToken;
use crate::solver::ordering::BestSoFar;
use crate::solver::walker::ConfigurationWalker;
use crate::solver::{SolveOutcome, Solver};

/// Enumerating solver
#[derive(Debug, Clone)]
pub struct ExhaustiveSolver {
    cancel_check_interval: u64,
    parallel: bool,
}

impl ExhaustiveSolver {
    /// Sequential solver with default configuration
    pub fn new() -> Self {
        Self::with_config(&ExhaustiveConfig::default(), false)
    }

    pub fn with_config(config: &ExhaustiveConfig, parallel: bool) -> Self {
        Self {
            cancel_check_interval: config.cancel_check_interval.max(1),
            parallel,
        }
    }

    /// Drain one walker into a best-so-far accumulator
    fn search(
        &self,
        problem: &Problem,
        mut walker: ConfigurationWalker<'_>,
        cancel: &CancellationToken,
    ) -> Result<(BestSoFar, u64)> {
        let mut best = BestSoFar::new();
        let mut visited: u64 = 0;

        while let Some(score) = walker.advance() {
            visited += 1;
            if visited % self.cancel_check_interval == 0 && cancel.is_cancelled() {
                return Err(AllocatorError::Cancelled { after: visited });
            }
            if problem.fits(score.cost) && best.offer(score, walker.choices()) {
                trace!(
                    "new best {:?}: improvement {} cost {}",
                    walker.choices(),
                    score.improvement,
                    score.cost
                );
            }
        }

        Ok((best, visited))
    }

    /// One walker per first-layer option, merged with the shared order
    fn search_parallel(
        &self,
        problem: &Problem,
        cancel: &CancellationToken,
    ) -> Result<(BestSoFar, u64)> {
        let first_layer = problem.layers()[0].len();
        debug!("exhaustive search split over {} subtrees", first_layer);

        let partials = (0..first_layer)
            .into_par_iter()
            .filter_map(|choice| ConfigurationWalker::pinned(problem, choice))
            .map(|walker| self.search(problem, walker, cancel))
            .collect::<Result<Vec<_>>>()?;

        Ok(partials
            .into_iter()
            .fold((BestSoFar::new(), 0), |(best, visited), (part, count)| {
                (best.merge(part), visited + count)
            }))
    }
}

impl Default for ExhaustiveSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for ExhaustiveSolver {
    fn kind(&self) -> SolverKind {
        SolverKind::Exhaustive
    }

    fn solve(&self, problem: &Problem, cancel: &CancellationToken) -> Result<SolveOutcome> {
        if cancel.is_cancelled() {
            return Err(AllocatorError::Cancelled { after: 0 });
        }

        let split = self.parallel && problem.layers()[0].len() > 1;
        let (best, visited) = if split {
            self.search_parallel(problem, cancel)?
        } else {
            self.search(problem, ConfigurationWalker::new(problem), cancel)?
        };
        debug!("exhaustive search visited {} configurations", visited);

        let solution = match best.into_inner() {
            Some((score, choices)) => {
                Solution::found(choices, score.cost, score.improvement, SolverKind::Exhaustive)
            }
            None => Solution::infeasible(Some(SolverKind::Exhaustive)),
        };

        Ok(SolveOutcome {
            solution,
            evaluated: visited,
        })
    }
}
