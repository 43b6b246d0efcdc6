//! Solver output types

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::problem::Problem;

/// One option index per layer, in layer order
pub type Configuration = Vec<usize>;

/// Which algorithm produced a solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    Exhaustive,
    DynamicProgramming,
}

impl SolverKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverKind::Exhaustive => "exhaustive",
            SolverKind::DynamicProgramming => "dynamic_programming",
        }
    }
}

/// Attached when the DP grid could not represent every cost exactly.
///
/// Costs were rounded up and the budget down, so the configuration is
/// feasible but its improvement is only a lower bound on the optimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecisionLoss {
    /// Cost quantum of the grid actually used
    pub grid_unit: f64,

    /// Largest amount any single cost was rounded by
    pub max_cost_rounding: f64,

    /// Number of budget cells in the grid
    pub budget_cells: u64,

    /// Grid was coarsened to respect the cell limit
    pub capped: bool,
}

/// Result of a solve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub feasible: bool,
    pub total_cost: f64,
    pub total_improvement: f64,

    #[serde(rename = "choice_per_layer", skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,

    /// `None` when the feasibility check rejected the problem before any solver ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision_loss: Option<PrecisionLoss>,
}

/// Per-layer slice of a solution
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerAllocation {
    pub layer: usize,
    pub choice: usize,
    pub cost: f64,
    pub improvement: f64,
    pub cumulative_cost: f64,
    pub cumulative_improvement: f64,
}

impl Solution {
    /// A feasible solution with precomputed totals
    pub fn found(
        configuration: Configuration,
        total_cost: f64,
        total_improvement: f64,
        solver: SolverKind,
    ) -> Self {
        Self {
            feasible: true,
            total_cost,
            total_improvement,
            configuration: Some(configuration),
            solver: Some(solver),
            precision_loss: None,
        }
    }

    /// No configuration fits the budget
    pub fn infeasible(solver: Option<SolverKind>) -> Self {
        Self {
            feasible: false,
            total_cost: 0.0,
            total_improvement: 0.0,
            configuration: None,
            solver,
            precision_loss: None,
        }
    }

    pub fn with_precision_loss(mut self, loss: Option<PrecisionLoss>) -> Self {
        self.precision_loss = loss;
        self
    }

    pub fn choices(&self) -> Option<&[usize]> {
        self.configuration.as_deref()
    }

    pub fn is_exact(&self) -> bool {
        self.precision_loss.is_none()
    }

    /// Per-layer cost and improvement of the chosen configuration.
    ///
    /// Empty when infeasible or when the configuration does not belong to
    /// `problem`.
    pub fn breakdown(&self, problem: &Problem) -> Vec<LayerAllocation> {
        let Some(choices) = self.choices() else {
            return Vec::new();
        };
        if choices.len() != problem.layer_count() {
            return Vec::new();
        }

        let mut cumulative_cost = 0.0;
        let mut cumulative_improvement = 0.0;
        let mut rows = Vec::with_capacity(choices.len());
        for (layer, &choice) in problem.layers().iter().zip(choices) {
            let Some(opt) = layer.option(choice) else {
                return Vec::new();
            };
            cumulative_cost += opt.cost;
            cumulative_improvement += opt.improvement;
            rows.push(LayerAllocation {
                layer: layer.id(),
                choice,
                cost: opt.cost,
                improvement: opt.improvement,
                cumulative_cost,
                cumulative_improvement,
            });
        }
        rows
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
