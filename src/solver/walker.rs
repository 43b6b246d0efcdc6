//! Lazy configuration enumeration
//!
//! `ConfigurationWalker` is an odometer over option indices, last layer
//! fastest. It keeps prefix sums of cost and improvement, so a step only
//! recomputes the layers at or after the one that changed: O(1) amortized
//! per configuration, O(layers) memory.

use crate::problem::Problem;
use crate::solution::Configuration;
use crate::solver::ordering::Score;

/// A configuration together with its totals
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedConfiguration {
    pub choices: Configuration,
    pub total_cost: f64,
    pub total_improvement: f64,
}

/// Restartable depth-first walk over the configuration space
#[derive(Debug, Clone)]
pub struct ConfigurationWalker<'a> {
    problem: &'a Problem,
    /// Leading layers held fixed
    pinned: usize,
    initial: Configuration,
    choices: Configuration,
    prefix_cost: Vec<f64>,
    prefix_improvement: Vec<f64>,
    started: bool,
    exhausted: bool,
}

impl<'a> ConfigurationWalker<'a> {
    /// Walk every configuration of `problem`
    pub fn new(problem: &'a Problem) -> Self {
        Self::with_prefix(problem, 0, vec![0; problem.layer_count()])
    }

    /// Walk only configurations whose first layer takes `first_choice`.
    /// `None` if the index is out of range.
    pub fn pinned(problem: &'a Problem, first_choice: usize) -> Option<Self> {
        if first_choice >= problem.layers()[0].len() {
            return None;
        }
        let mut initial = vec![0; problem.layer_count()];
        initial[0] = first_choice;
        Some(Self::with_prefix(problem, 1, initial))
    }

    fn with_prefix(problem: &'a Problem, pinned: usize, initial: Configuration) -> Self {
        let layers = problem.layer_count();
        Self {
            problem,
            pinned,
            choices: initial.clone(),
            initial,
            prefix_cost: vec![0.0; layers + 1],
            prefix_improvement: vec![0.0; layers + 1],
            started: false,
            exhausted: false,
        }
    }

    /// Step to the next configuration and return its totals
    pub fn advance(&mut self) -> Option<Score> {
        if self.exhausted {
            return None;
        }

        if !self.started {
            self.started = true;
            self.recompute_from(0);
            return Some(self.score());
        }

        let problem = self.problem;
        let layers = problem.layers();
        for idx in (self.pinned..layers.len()).rev() {
            if self.choices[idx] + 1 < layers[idx].len() {
                self.choices[idx] += 1;
                for later in &mut self.choices[idx + 1..] {
                    *later = 0;
                }
                self.recompute_from(idx);
                return Some(self.score());
            }
        }

        self.exhausted = true;
        None
    }

    /// Current configuration; valid after `advance` returned `Some`
    pub fn choices(&self) -> &[usize] {
        &self.choices
    }

    pub fn score(&self) -> Score {
        let last = self.choices.len();
        Score::new(self.prefix_improvement[last], self.prefix_cost[last])
    }

    /// Start over from the first configuration
    pub fn reset(&mut self) {
        self.choices.copy_from_slice(&self.initial);
        self.started = false;
        self.exhausted = false;
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn recompute_from(&mut self, from: usize) {
        let problem = self.problem;
        let layers = problem.layers();
        for idx in from..layers.len() {
            let opt = &layers[idx].options()[self.choices[idx]];
            self.prefix_cost[idx + 1] = self.prefix_cost[idx] + opt.cost;
            self.prefix_improvement[idx + 1] = self.prefix_improvement[idx] + opt.improvement;
        }
    }
}

impl Iterator for ConfigurationWalker<'_> {
    type Item = EvaluatedConfiguration;

    fn next(&mut self) -> Option<Self::Item> {
        let score = self.advance()?;
        Some(EvaluatedConfiguration {
            choices: self.choices.clone(),
            total_cost: score.cost,
            total_improvement: score.improvement,
        })
    }
}
