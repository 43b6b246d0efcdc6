//! Budget-axis discretization for the DP solver
//!
//! Costs are mapped onto an integer grid of unit `10^-k`, choosing the
//! smallest `k` that represents every cost exactly. If no such `k` exists
//! within `max_decimals`, or the grid would need more than
//! `max_budget_cells` cells, costs are rounded up and the budget down. Any
//! configuration that fits the grid then also fits the real budget.

use log::warn;

use crate::problem::Problem;
use crate::solution::PrecisionLoss;

/// Tolerance for treating a scaled cost as an integer
const INTEGRAL_TOLERANCE: f64 = 1e-9;

fn scaled_is_integral(value: f64, scale: f64) -> bool {
    let scaled = value * scale;
    (scaled - scaled.round()).abs() <= INTEGRAL_TOLERANCE * scaled.abs().max(1.0)
}

/// Round `value * scale` up, snapping values within tolerance of an integer
fn to_cells_ceil(value: f64, scale: f64) -> u64 {
    let scaled = value * scale;
    let nearest = scaled.round();
    if (scaled - nearest).abs() <= INTEGRAL_TOLERANCE * scaled.abs().max(1.0) {
        nearest as u64
    } else {
        scaled.ceil() as u64
    }
}

fn to_cells_floor(value: f64, scale: f64) -> u64 {
    let scaled = value * scale;
    let nearest = scaled.round();
    if (scaled - nearest).abs() <= INTEGRAL_TOLERANCE * scaled.abs().max(1.0) {
        nearest as u64
    } else {
        scaled.floor() as u64
    }
}

/// Integer costs and budget for one problem
#[derive(Debug, Clone)]
pub struct CostGrid {
    scale: f64,
    costs: Vec<Vec<u64>>,
    budget_cells: u64,
    precision_loss: Option<PrecisionLoss>,
}

impl CostGrid {
    pub fn build(problem: &Problem, max_decimals: u32, max_budget_cells: u64) -> Self {
        let all_costs = || problem.layers().iter().flat_map(|l| l.options().iter().map(|o| o.cost));

        let exact_scale = (0..=max_decimals)
            .map(|k| 10f64.powi(k as i32))
            .find(|&scale| all_costs().all(|c| scaled_is_integral(c, scale)));
        let mut scale = exact_scale.unwrap_or_else(|| 10f64.powi(max_decimals as i32));

        // Budgets beyond the most expensive configuration behave identically
        let reachable: f64 = problem.layers().iter().map(|l| l.max_cost()).sum();
        let effective_budget = problem.budget().min(reachable);

        let mut capped = false;
        let max_cells = max_budget_cells.max(1);
        if effective_budget * scale > max_cells as f64 {
            scale = max_cells as f64 / effective_budget;
            capped = true;
        }

        let costs: Vec<Vec<u64>> = problem
            .layers()
            .iter()
            .map(|l| l.options().iter().map(|o| to_cells_ceil(o.cost, scale)).collect())
            .collect();

        let reachable_cells: u64 = costs
            .iter()
            .map(|row| row.iter().copied().max().unwrap_or(0))
            .fold(0u64, |acc, c| acc.saturating_add(c));
        let budget_cells = to_cells_floor(problem.budget(), scale)
            .min(reachable_cells)
            .min(max_cells);

        let max_cost_rounding = problem
            .layers()
            .iter()
            .zip(&costs)
            .flat_map(|(layer, row)| {
                layer
                    .options()
                    .iter()
                    .zip(row)
                    .map(|(opt, &cells)| cells as f64 / scale - opt.cost)
            })
            .fold(0.0, f64::max);

        let precision_loss = if all_costs().all(|c| scaled_is_integral(c, scale)) {
            None
        } else {
            let loss = PrecisionLoss {
                grid_unit: 1.0 / scale,
                max_cost_rounding,
                budget_cells,
                capped,
            };
            warn!(
                "cost grid is inexact (unit {:.3e}, max rounding {:.3e}, capped: {}); result is a lower bound",
                loss.grid_unit, loss.max_cost_rounding, loss.capped
            );
            Some(loss)
        };

        Self {
            scale,
            costs,
            budget_cells,
            precision_loss,
        }
    }

    /// Grid cells per unit of real cost
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn unit(&self) -> f64 {
        1.0 / self.scale
    }

    /// Grid cost of every option of `layer`
    pub fn layer_costs(&self, layer: usize) -> &[u64] {
        &self.costs[layer]
    }

    pub fn budget_cells(&self) -> u64 {
        self.budget_cells
    }

    pub fn is_exact(&self) -> bool {
        self.precision_loss.is_none()
    }

    pub fn precision_loss(&self) -> Option<PrecisionLoss> {
        self.precision_loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Layer;

    fn problem(pairs: &[(f64, f64)], budget: f64) -> Problem {
        Problem::new(vec![Layer::from_pairs(pairs)], budget).unwrap()
    }

    #[test]
    fn test_integer_costs_use_unit_grid() {
        let grid = CostGrid::build(&problem(&[(0.0, 0.0), (5.0, 1.0), (20.0, 4.0)], 12.0), 6, 1_000_000);
        assert_eq!(grid.scale(), 1.0);
        assert_eq!(grid.layer_costs(0), &[0, 5, 20]);
        assert_eq!(grid.budget_cells(), 12);
        assert!(grid.is_exact());
    }

    #[test]
    fn test_decimal_costs_pick_finest_needed_grid() {
        let grid = CostGrid::build(&problem(&[(0.0, 0.0), (2.5, 0.5), (1.25, 0.3)], 5.0), 6, 1_000_000);
        assert_eq!(grid.scale(), 100.0);
        assert_eq!(grid.layer_costs(0), &[0, 250, 125]);
        assert_eq!(grid.budget_cells(), 250);
        assert!(grid.is_exact());
    }

    #[test]
    fn test_budget_clamped_to_reachable_cost() {
        let grid = CostGrid::build(&problem(&[(0.0, 0.0), (3.0, 1.0)], 1e12), 6, 1_000);
        assert_eq!(grid.budget_cells(), 3);
        assert!(grid.is_exact());
    }

    #[test]
    fn test_fractional_budget_floors() {
        let grid = CostGrid::build(&problem(&[(0.0, 0.0), (3.0, 1.0)], 2.9), 6, 1_000);
        assert_eq!(grid.budget_cells(), 2);
        assert!(grid.is_exact());
    }

    #[test]
    fn test_unrepresentable_cost_reports_loss() {
        let grid = CostGrid::build(&problem(&[(0.0, 0.0), (1.0 / 3.0, 1.0)], 1.0), 2, 1_000_000);
        assert_eq!(grid.scale(), 100.0);
        assert_eq!(grid.layer_costs(0), &[0, 34]);
        let loss = grid.precision_loss().unwrap();
        assert!(!loss.capped);
        assert!(loss.max_cost_rounding > 0.0 && loss.max_cost_rounding < 0.01);
    }

    #[test]
    fn test_huge_costs_saturate_reachable_cells() {
        let problem = Problem::new(
            vec![
                Layer::from_pairs(&[(0.0, 0.0), (1e19, 1.0)]),
                Layer::from_pairs(&[(0.0, 0.0), (1e19, 1.0)]),
            ],
            10.0,
        )
        .unwrap();
        let grid = CostGrid::build(&problem, 6, 1_000_000);
        assert_eq!(grid.budget_cells(), 10);
        assert_eq!(grid.layer_costs(1)[1], 10_000_000_000_000_000_000);
    }

    #[test]
    fn test_cell_cap_coarsens_grid() {
        let grid = CostGrid::build(&problem(&[(0.0, 0.0), (1.5, 1.0), (100.0, 2.0)], 100.0), 6, 50);
        assert!(grid.budget_cells() <= 50);
        assert!(grid.scale() < 10.0);
        let loss = grid.precision_loss().unwrap();
        assert!(loss.capped);
    }
}
