//! Allocator: validated, instrumented entry point over both solvers

use std::time::Instant;

use log::{debug, info, warn};

use crate::config::Config;
use crate::errors::{AllocatorError, Result};
use crate::problem::Problem;
use crate::solution::{Solution, SolverKind};
use crate::solver::cancel::CancellationToken;
use crate::solver::dynamic::DynamicSolver;
use crate::solver::exhaustive::ExhaustiveSolver;
use crate::solver::{SolveOutcome, Solver, SolverChoice};
use crate::telemetry::{SolveEvent, TelemetryCollector};
use crate::validation::{self, FeasibilityReport};

/// Budget allocator
pub struct Allocator {
    config: Config,
    exhaustive: ExhaustiveSolver,
    dynamic: DynamicSolver,
    /// `None` when parallel search is disabled
    pool: Option<rayon::ThreadPool>,
    telemetry: TelemetryCollector,
}

impl Allocator {
    /// Create allocator with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create allocator with custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let parallel = config.solver.parallel;
        let pool = if parallel {
            let threads = config.worker_threads();
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|idx| format!("layerbudget-{}", idx))
                .build()
                .map_err(|e| AllocatorError::ThreadPool(e.to_string()))?;
            debug!("allocator pool with {} workers", threads);
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            exhaustive: ExhaustiveSolver::with_config(&config.exhaustive, parallel),
            dynamic: DynamicSolver::with_config(&config.dynamic, parallel),
            config,
            pool,
            telemetry: TelemetryCollector::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn telemetry(&self) -> &TelemetryCollector {
        &self.telemetry
    }

    /// Pre-solve feasibility report
    pub fn check(&self, problem: &Problem) -> FeasibilityReport {
        validation::assess(problem)
    }

    /// Which solver `choice` maps to for this problem
    pub fn select(&self, problem: &Problem, choice: SolverChoice) -> SolverKind {
        choice.resolve(problem, self.config.solver.auto_threshold)
    }

    /// Solve with the configured default solver
    pub fn solve(&self, problem: &Problem) -> Result<Solution> {
        self.solve_with(problem, self.config.solver.default)
    }

    pub fn solve_with(&self, problem: &Problem, choice: SolverChoice) -> Result<Solution> {
        self.solve_cancellable(problem, choice, &CancellationToken::new())
    }

    /// Solve, polling `cancel` during the search
    pub fn solve_cancellable(
        &self,
        problem: &Problem,
        choice: SolverChoice,
        cancel: &CancellationToken,
    ) -> Result<Solution> {
        let report = self.check(problem);
        if !report.feasible {
            info!(
                "infeasible: cheapest configuration costs {} against budget {}",
                report.min_cost, report.budget
            );
            self.telemetry.record(SolveEvent::FeasibilityRejected {
                min_cost: report.min_cost,
                budget: report.budget,
                timestamp: Instant::now(),
            });
            return Ok(Solution::infeasible(None));
        }
        if !report.all_skippable() {
            debug!("layers without a skip option: {:?}", report.layers_without_noop);
        }

        let kind = self.select(problem, choice);
        debug!(
            "solving {} layers ({} configurations) with {}",
            problem.layer_count(),
            report.configuration_count,
            kind.as_str()
        );
        self.telemetry.record(SolveEvent::SolveStarted {
            solver: kind,
            layers: problem.layer_count(),
            configurations: report.configuration_count,
            timestamp: Instant::now(),
        });

        let start = Instant::now();
        let outcome = match self.run(kind, problem, cancel) {
            Ok(outcome) => outcome,
            Err(AllocatorError::Cancelled { after }) => {
                warn!("{} solve cancelled after {} evaluations", kind.as_str(), after);
                self.telemetry.record(SolveEvent::SolveCancelled {
                    solver: kind,
                    after,
                    timestamp: Instant::now(),
                });
                return Err(AllocatorError::Cancelled { after });
            }
            Err(e) => return Err(e),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        let SolveOutcome {
            solution,
            evaluated,
        } = outcome;
        if let Some(loss) = solution.precision_loss {
            self.telemetry.record(SolveEvent::PrecisionLoss {
                grid_unit: loss.grid_unit,
                max_cost_rounding: loss.max_cost_rounding,
                timestamp: Instant::now(),
            });
        }
        self.telemetry.record(SolveEvent::SolveCompleted {
            solver: kind,
            feasible: solution.feasible,
            evaluated,
            duration_ms,
            timestamp: Instant::now(),
        });
        info!(
            "{}: feasible={} improvement={} cost={} ({} evaluations, {}ms)",
            kind.as_str(),
            solution.feasible,
            solution.total_improvement,
            solution.total_cost,
            evaluated,
            duration_ms
        );

        Ok(solution)
    }

    fn run(
        &self,
        kind: SolverKind,
        problem: &Problem,
        cancel: &CancellationToken,
    ) -> Result<SolveOutcome> {
        let solve = || match kind {
            SolverKind::Exhaustive => self.exhaustive.solve(problem, cancel),
            SolverKind::DynamicProgramming => self.dynamic.solve(problem, cancel),
        };
        match &self.pool {
            Some(pool) => pool.install(solve),
            None => solve(),
        }
    }
}
