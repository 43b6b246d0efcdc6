//! Feasibility validator
//!
//! One pass over every option; runs before either solver so infeasible
//! problems are rejected without search.

use crate::problem::Problem;
use crate::validation::types::FeasibilityReport;

/// Build a `FeasibilityReport` for `problem`
pub fn assess(problem: &Problem) -> FeasibilityReport {
    let mut min_cost = 0.0;
    let mut max_improvement = 0.0;
    let mut cheapest_configuration = Vec::with_capacity(problem.layer_count());
    let mut layers_without_noop = Vec::new();

    for layer in problem.layers() {
        // Problem construction guarantees a non-empty menu
        if let Some((idx, opt)) = layer.cheapest() {
            min_cost += opt.cost;
            cheapest_configuration.push(idx);
        }
        max_improvement += layer.best_improvement();
        if !layer.has_noop() {
            layers_without_noop.push(layer.id());
        }
    }

    FeasibilityReport {
        min_cost,
        max_improvement,
        budget: problem.budget(),
        cheapest_configuration,
        layers_without_noop,
        configuration_count: problem.configuration_count(),
        feasible: problem.fits(min_cost),
    }
}
