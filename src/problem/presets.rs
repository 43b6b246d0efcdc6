//! Sparse-update problem construction
//!
//! Each layer offers a bias decision (skip or update) and a weight update
//! ratio. Updating a ratio `r` of the weights costs `r * weight_cost` and
//! improves accuracy by `r * weight_improvement[layer]`.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::problem::factored::FactoredLayer;
use crate::problem::types::{Problem, UpdateOption};

/// Parameters of a sparse-update instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseUpdateSpec {
    pub bias_cost: f64,
    pub bias_improvement: f64,
    pub weight_cost: f64,
    /// Full-update improvement per layer; its length sets the layer count
    pub weight_improvements: Vec<f64>,
    pub ratios: Vec<f64>,
    pub budget: f64,
}

impl Default for SparseUpdateSpec {
    fn default() -> Self {
        Self {
            bias_cost: 5.0,
            bias_improvement: 1.0,
            weight_cost: 20.0,
            weight_improvements: vec![4.0, 3.0, 5.0, 2.0, 4.0],
            ratios: vec![0.0, 0.125, 0.25, 0.5, 1.0],
            budget: 80.0,
        }
    }
}

/// Per-layer decision decoded from a configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerUpdate {
    pub bias: bool,
    pub weight_ratio: f64,
}

/// A built sparse-update problem that can decode its own configurations
#[derive(Debug, Clone)]
pub struct SparseUpdateProblem {
    problem: Problem,
    factored: Vec<FactoredLayer>,
    ratios: Vec<f64>,
}

impl SparseUpdateSpec {
    pub fn build(&self) -> Result<SparseUpdateProblem> {
        let bias = vec![
            UpdateOption::noop(),
            UpdateOption::new(self.bias_cost, self.bias_improvement),
        ];

        let factored = self
            .weight_improvements
            .iter()
            .map(|&full| {
                let weights = self
                    .ratios
                    .iter()
                    .map(|&r| UpdateOption::new(r * self.weight_cost, r * full))
                    .collect();
                FactoredLayer::new(vec![bias.clone(), weights])
            })
            .collect::<Result<Vec<_>>>()?;

        let layers = factored.iter().map(FactoredLayer::to_layer).collect();
        let problem = Problem::new(layers, self.budget)?;

        Ok(SparseUpdateProblem {
            problem,
            factored,
            ratios: self.ratios.clone(),
        })
    }
}

impl SparseUpdateProblem {
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn into_problem(self) -> Problem {
        self.problem
    }

    /// Translate option indices back into bias/ratio decisions
    pub fn decode(&self, choices: &[usize]) -> Option<Vec<LayerUpdate>> {
        if choices.len() != self.factored.len() {
            return None;
        }
        choices
            .iter()
            .zip(&self.factored)
            .map(|(&choice, layer)| {
                let parts = layer.decompose(choice)?;
                Some(LayerUpdate {
                    bias: parts[0] == 1,
                    weight_ratio: *self.ratios.get(parts[1])?,
                })
            })
            .collect()
    }
}

/// The five-layer reference instance under an 80 KB budget
pub fn reference() -> Result<SparseUpdateProblem> {
    SparseUpdateSpec::default().build()
}
