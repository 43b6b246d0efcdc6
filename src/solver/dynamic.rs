//! Dynamic-programming solver
//!
//! Runs in O(layers × options × budget cells). The table is built over
//! layer suffixes:
//!
//! ```text
//! best[n][b] = (0, 0)
//! best[i][b] = max over o with cost(o) <= b of
//!              (improvement(o), cost(o)) + best[i + 1][b - cost(o)]
//! ```
//!
//! under the shared score order. Building suffixes lets reconstruction walk
//! forward from layer 0 and take the lowest index that reproduces each cell,
//! which yields the lexicographically smallest optimal configuration.
//!
//! Every row is kept for reconstruction, so the table holds
//! `(layers + 1) × (budget cells + 1)` cells of 24 bytes each: about 24 MB
//! per layer at the default `max_budget_cells` of 1,000,000.

use std::cmp::Ordering;

use log::debug;
use rayon::prelude::*;

use crate::config::DynamicConfig;
use crate::errors::{AllocatorError, Result};
use crate::problem::{Problem, UpdateOption};
use crate::solution::{Solution, SolverKind};
use crate::solver::cancel::CancellationToken;
use crate::solver::grid::CostGrid;
use crate::solver::ordering::{BestSoFar, Score};
use crate::solver::{SolveOutcome, Solver};
use crate::validation;

/// Best suffix value reachable within a budget cell
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    improvement: f64,
    cost: u64,
}

impl Cell {
    const EMPTY_SUFFIX: Cell = Cell {
        improvement: 0.0,
        cost: 0,
    };

    fn score(&self) -> Score {
        Score::new(self.improvement, self.cost as f64)
    }
}

/// `None` marks a budget with no feasible completion
type Row = Vec<Option<Cell>>;

/// Value of taking option `cost`/`opt` at budget `b`, given the next row
fn transition(opt: &UpdateOption, cost: u64, next: &[Option<Cell>], b: usize) -> Option<Cell> {
    let cost_cells = usize::try_from(cost).ok()?;
    if cost_cells > b {
        return None;
    }
    let tail = next[b - cost_cells]?;
    Some(Cell {
        improvement: opt.improvement + tail.improvement,
        cost: cost + tail.cost,
    })
}

fn best_cell(options: &[UpdateOption], costs: &[u64], next: &[Option<Cell>], b: usize) -> Option<Cell> {
    let mut best: Option<Cell> = None;
    for (opt, &cost) in options.iter().zip(costs) {
        let Some(candidate) = transition(opt, cost, next, b) else {
            continue;
        };
        match best {
            // Earlier options win ties
            Some(current) if current.score().compare(&candidate.score()) != Ordering::Less => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Pseudo-polynomial MCKP solver
#[derive(Debug, Clone)]
pub struct DynamicSolver {
    max_decimals: u32,
    max_budget_cells: u64,
    parallel: bool,
}

impl DynamicSolver {
    /// Sequential solver with default configuration
    pub fn new() -> Self {
        Self::with_config(&DynamicConfig::default(), false)
    }

    pub fn with_config(config: &DynamicConfig, parallel: bool) -> Self {
        Self {
            max_decimals: config.max_decimals,
            max_budget_cells: config.max_budget_cells,
            parallel,
        }
    }

    fn build_row(&self, options: &[UpdateOption], costs: &[u64], next: &[Option<Cell>]) -> Row {
        let width = next.len();
        if self.parallel {
            (0..width)
                .into_par_iter()
                .map(|b| best_cell(options, costs, next, b))
                .collect()
        } else {
            (0..width).map(|b| best_cell(options, costs, next, b)).collect()
        }
    }

    /// Bytes held by a full table over `layers` layers
    pub fn table_bytes(layers: usize, budget_cells: u64) -> u64 {
        let cell = std::mem::size_of::<Option<Cell>>() as u64;
        (layers as u64)
            .saturating_add(1)
            .saturating_mul(budget_cells.saturating_add(1))
            .saturating_mul(cell)
    }

    /// Rows `0..=n`; row `n` is the empty suffix
    fn build_table(
        &self,
        problem: &Problem,
        grid: &CostGrid,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Row>, u64)> {
        let width = usize::try_from(grid.budget_cells())
            .map_err(|_| AllocatorError::Generic("budget grid exceeds address space".to_string()))?
            + 1;
        let layers = problem.layers();

        let mut rows: Vec<Row> = vec![Vec::new(); layers.len() + 1];
        rows[layers.len()] = vec![Some(Cell::EMPTY_SUFFIX); width];

        let mut evaluated: u64 = 0;
        for idx in (0..layers.len()).rev() {
            if cancel.is_cancelled() {
                return Err(AllocatorError::Cancelled { after: evaluated });
            }
            let row = self.build_row(layers[idx].options(), grid.layer_costs(idx), &rows[idx + 1]);
            rows[idx] = row;
            evaluated += width as u64;
        }

        Ok((rows, evaluated))
    }

    /// Walk forward taking the lowest option index that reproduces each cell
    fn reconstruct(problem: &Problem, grid: &CostGrid, rows: &[Row]) -> Option<Vec<usize>> {
        let mut b = usize::try_from(grid.budget_cells()).ok()?;
        let mut choices = Vec::with_capacity(problem.layer_count());

        for (idx, layer) in problem.layers().iter().enumerate() {
            let target = rows[idx][b]?;
            let costs = grid.layer_costs(idx);
            let choice = layer.options().iter().zip(costs).position(|(opt, &cost)| {
                transition(opt, cost, &rows[idx + 1], b)
                    .map(|c| c.score().compare(&target.score()) == Ordering::Equal)
                    .unwrap_or(false)
            })?;
            b -= usize::try_from(costs[choice]).ok()?;
            choices.push(choice);
        }

        Some(choices)
    }

    /// Rounded-up costs and a rounded-down budget can push every
    /// configuration off the grid, including the cheapest one the validator
    /// accepts. That configuration is always a valid floor for the result.
    fn offer_cheapest(problem: &Problem, best: &mut BestSoFar) {
        let report = validation::assess(problem);
        if !report.feasible {
            return;
        }
        let cheapest = report.cheapest_configuration;
        if let Some((cost, improvement)) = problem.evaluate(&cheapest) {
            if best.offer(Score::new(improvement, cost), &cheapest) {
                debug!("lossy grid: cheapest configuration {:?} replaces the dp result", cheapest);
            }
        }
    }
}

impl Default for DynamicSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for DynamicSolver {
    fn kind(&self) -> SolverKind {
        SolverKind::DynamicProgramming
    }

    fn solve(&self, problem: &Problem, cancel: &CancellationToken) -> Result<SolveOutcome> {
        let grid = CostGrid::build(problem, self.max_decimals, self.max_budget_cells);
        debug!(
            "dp grid: unit {}, {} budget cells, {} layers, {} table bytes",
            grid.unit(),
            grid.budget_cells(),
            problem.layer_count(),
            Self::table_bytes(problem.layer_count(), grid.budget_cells())
        );

        let (rows, evaluated) = self.build_table(problem, &grid, cancel)?;

        let mut best = BestSoFar::new();
        let budget_cells = usize::try_from(grid.budget_cells()).unwrap_or(usize::MAX);
        if rows[0].get(budget_cells).copied().flatten().is_some() {
            let choices = Self::reconstruct(problem, &grid, &rows).ok_or_else(|| {
                AllocatorError::Generic("dp reconstruction lost the optimal path".to_string())
            })?;
            let (cost, improvement) = problem.evaluate(&choices).ok_or_else(|| {
                AllocatorError::Generic("dp produced an out-of-range configuration".to_string())
            })?;
            best.offer(Score::new(improvement, cost), &choices);
        }
        if !grid.is_exact() || best.is_empty() {
            Self::offer_cheapest(problem, &mut best);
        }

        let solution = match best.into_inner() {
            Some((score, choices)) => Solution::found(
                choices,
                score.cost,
                score.improvement,
                SolverKind::DynamicProgramming,
            ),
            None => Solution::infeasible(Some(SolverKind::DynamicProgramming)),
        };

        Ok(SolveOutcome {
            solution: solution.with_precision_loss(grid.precision_loss()),
            evaluated,
        })
    }
}
