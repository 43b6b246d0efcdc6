//! Problem model type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::Result;

/// Relative slack allowed when comparing a floating cost sum to the budget
pub const COST_TOLERANCE: f64 = 1e-9;

/// Check `cost <= budget`, forgiving accumulated rounding in `cost`
pub fn within_budget(cost: f64, budget: f64) -> bool {
    cost <= budget + COST_TOLERANCE * budget.abs().max(1.0)
}

/// Reason a problem failed validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemDefect {
    #[error("problem has no layers")]
    NoLayers,

    #[error("layer {layer} has no options")]
    EmptyLayer { layer: usize },

    #[error("layer {layer} option {option} has negative cost {cost}")]
    NegativeCost { layer: usize, option: usize, cost: f64 },

    #[error("layer {layer} option {option} has non-finite cost")]
    NonFiniteCost { layer: usize, option: usize },

    #[error("layer {layer} option {option} has non-finite improvement")]
    NonFiniteImprovement { layer: usize, option: usize },

    #[error("budget must be finite and non-negative, got {budget}")]
    InvalidBudget { budget: f64 },

    #[error("factor {factor} has no options")]
    EmptyFactor { factor: usize },
}

/// One selectable (cost, improvement) pair on a layer's menu
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateOption {
    /// Memory cost of taking this option
    pub cost: f64,

    /// Accuracy improvement gained by taking this option
    pub improvement: f64,
}

impl UpdateOption {
    pub fn new(cost: f64, improvement: f64) -> Self {
        Self { cost, improvement }
    }

    /// The zero-cost, zero-improvement skip option
    pub fn noop() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Zero cost with non-negative improvement
    pub fn is_noop(&self) -> bool {
        self.cost == 0.0 && self.improvement >= 0.0
    }
}

/// A layer and its menu of mutually exclusive options
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    id: usize,
    options: Vec<UpdateOption>,
}

impl Layer {
    /// Create a layer; its id is assigned when it joins a `Problem`
    pub fn new(options: Vec<UpdateOption>) -> Self {
        Self { id: 0, options }
    }

    /// Build a layer from `(cost, improvement)` pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().map(|&(c, i)| UpdateOption::new(c, i)).collect())
    }

    /// Append a skip option unless the menu already has one
    pub fn with_noop(mut self) -> Self {
        if !self.has_noop() {
            self.options.push(UpdateOption::noop());
        }
        self
    }

    /// Ordinal position within the owning problem
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn options(&self) -> &[UpdateOption] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&UpdateOption> {
        self.options.get(index)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn has_noop(&self) -> bool {
        self.options.iter().any(UpdateOption::is_noop)
    }

    /// Cheapest option, lowest index among equal costs
    pub fn cheapest(&self) -> Option<(usize, &UpdateOption)> {
        self.options
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, &UpdateOption)>, (idx, opt)| match best {
                Some((_, b)) if b.cost <= opt.cost => best,
                _ => Some((idx, opt)),
            })
    }

    /// Highest improvement on the menu, ignoring cost
    pub fn best_improvement(&self) -> f64 {
        self.options
            .iter()
            .map(|o| o.improvement)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn max_cost(&self) -> f64 {
        self.options.iter().map(|o| o.cost).fold(0.0, f64::max)
    }

    fn validate(&self, layer: usize) -> std::result::Result<(), ProblemDefect> {
        if self.options.is_empty() {
            return Err(ProblemDefect::EmptyLayer { layer });
        }
        for (option, opt) in self.options.iter().enumerate() {
            if !opt.cost.is_finite() {
                return Err(ProblemDefect::NonFiniteCost { layer, option });
            }
            if opt.cost < 0.0 {
                return Err(ProblemDefect::NegativeCost {
                    layer,
                    option,
                    cost: opt.cost,
                });
            }
            if !opt.improvement.is_finite() {
                return Err(ProblemDefect::NonFiniteImprovement { layer, option });
            }
        }
        Ok(())
    }
}

/// Immutable MCKP instance: layers with option menus plus a global budget
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    layers: Vec<Layer>,
    budget: f64,
}

impl Problem {
    /// Validate and build a problem. Layer ids are renumbered by position.
    pub fn new(layers: Vec<Layer>, budget: f64) -> Result<Self> {
        if layers.is_empty() {
            return Err(ProblemDefect::NoLayers.into());
        }
        if !budget.is_finite() || budget < 0.0 {
            return Err(ProblemDefect::InvalidBudget { budget }.into());
        }

        let mut layers = layers;
        for (idx, layer) in layers.iter_mut().enumerate() {
            layer.validate(idx)?;
            layer.id = idx;
        }

        Ok(Self { layers, budget })
    }

    /// Same layers under a different budget
    pub fn with_budget(&self, budget: f64) -> Result<Self> {
        Self::new(self.layers.clone(), budget)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Size of the full configuration space, saturating at `u64::MAX`
    pub fn configuration_count(&self) -> u64 {
        self.layers
            .iter()
            .fold(1u64, |acc, layer| acc.saturating_mul(layer.len() as u64))
    }

    /// Total `(cost, improvement)` of a configuration, summed in layer order
    pub fn evaluate(&self, choices: &[usize]) -> Option<(f64, f64)> {
        if choices.len() != self.layers.len() {
            return None;
        }
        let mut cost = 0.0;
        let mut improvement = 0.0;
        for (layer, &choice) in self.layers.iter().zip(choices) {
            let opt = layer.option(choice)?;
            cost += opt.cost;
            improvement += opt.improvement;
        }
        Some((cost, improvement))
    }

    pub fn fits(&self, cost: f64) -> bool {
        within_budget(cost, self.budget)
    }
}
