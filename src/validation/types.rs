//! Feasibility report type definitions

use serde::Serialize;

/// Pre-solve summary of a problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityReport {
    /// Sum of each layer's cheapest option cost
    pub min_cost: f64,

    /// Sum of each layer's highest improvement, ignoring cost
    pub max_improvement: f64,

    pub budget: f64,

    /// Cheapest option per layer, lowest index among equal costs
    pub cheapest_configuration: Vec<usize>,

    /// Layers whose menus lack a zero-cost skip option
    pub layers_without_noop: Vec<usize>,

    /// Size of the configuration space, saturating
    pub configuration_count: u64,

    /// `min_cost <= budget`
    pub feasible: bool,
}

impl FeasibilityReport {
    /// Budget left after taking the cheapest option everywhere
    pub fn slack(&self) -> f64 {
        self.budget - self.min_cost
    }

    /// Every layer can be skipped
    pub fn all_skippable(&self) -> bool {
        self.layers_without_noop.is_empty()
    }
}
