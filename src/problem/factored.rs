//! Factored layer menus
//!
//! A layer's menu is often the product of independent decisions, e.g.
//! "update the bias or not" × "which fraction of the weights to update".
//! `FactoredLayer` flattens such a product into a plain option list and maps
//! flat indices back to per-factor choices.

use crate::errors::Result;
use crate::problem::types::{Layer, ProblemDefect, UpdateOption};

/// Cartesian product of factor menus, first factor most significant
#[derive(Debug, Clone, PartialEq)]
pub struct FactoredLayer {
    factors: Vec<Vec<UpdateOption>>,
}

impl FactoredLayer {
    /// An empty factor list yields a single zero-cost option.
    pub fn new(factors: Vec<Vec<UpdateOption>>) -> Result<Self> {
        if let Some(factor) = factors.iter().position(Vec::is_empty) {
            return Err(ProblemDefect::EmptyFactor { factor }.into());
        }
        Ok(Self { factors })
    }

    pub fn factors(&self) -> &[Vec<UpdateOption>] {
        &self.factors
    }

    /// Number of combined options
    pub fn option_count(&self) -> usize {
        self.factors.iter().map(Vec::len).product()
    }

    /// Split a combined option index into one index per factor
    pub fn decompose(&self, index: usize) -> Option<Vec<usize>> {
        if index >= self.option_count() {
            return None;
        }
        let mut rest = index;
        let mut parts = vec![0; self.factors.len()];
        for (slot, factor) in parts.iter_mut().zip(&self.factors).rev() {
            *slot = rest % factor.len();
            rest /= factor.len();
        }
        Some(parts)
    }

    /// Inverse of `decompose`
    pub fn compose(&self, parts: &[usize]) -> Option<usize> {
        if parts.len() != self.factors.len() {
            return None;
        }
        let mut index = 0;
        for (&part, factor) in parts.iter().zip(&self.factors) {
            if part >= factor.len() {
                return None;
            }
            index = index * factor.len() + part;
        }
        Some(index)
    }

    /// Flatten into a plain layer; option `i` sums the factors of `decompose(i)`
    pub fn to_layer(&self) -> Layer {
        let options = (0..self.option_count())
            .filter_map(|idx| self.decompose(idx))
            .map(|parts| {
                parts.iter().zip(&self.factors).fold(
                    UpdateOption::noop(),
                    |acc, (&part, factor)| {
                        let opt = factor[part];
                        UpdateOption::new(acc.cost + opt.cost, acc.improvement + opt.improvement)
                    },
                )
            })
            .collect();
        Layer::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bias_and_ratios() -> FactoredLayer {
        FactoredLayer::new(vec![
            vec![UpdateOption::noop(), UpdateOption::new(5.0, 1.0)],
            vec![
                UpdateOption::noop(),
                UpdateOption::new(2.5, 0.5),
                UpdateOption::new(20.0, 4.0),
            ],
        ])
        .unwrap()
    }

    #[test]
    fn test_option_count_is_product() {
        assert_eq!(bias_and_ratios().option_count(), 6);
    }

    #[test]
    fn test_first_factor_is_most_significant() {
        let layer = bias_and_ratios();
        assert_eq!(layer.decompose(0), Some(vec![0, 0]));
        assert_eq!(layer.decompose(2), Some(vec![0, 2]));
        assert_eq!(layer.decompose(3), Some(vec![1, 0]));
        assert_eq!(layer.decompose(5), Some(vec![1, 2]));
        assert_eq!(layer.decompose(6), None);
    }

    #[test]
    fn test_compose_inverts_decompose() {
        let layer = bias_and_ratios();
        for idx in 0..layer.option_count() {
            let parts = layer.decompose(idx).unwrap();
            assert_eq!(layer.compose(&parts), Some(idx));
        }
        assert_eq!(layer.compose(&[2, 0]), None);
        assert_eq!(layer.compose(&[0]), None);
    }

    #[test]
    fn test_flattened_options_sum_factors() {
        let layer = bias_and_ratios().to_layer();
        assert_eq!(layer.len(), 6);
        assert_eq!(layer.options()[4], UpdateOption::new(7.5, 1.5));
        assert_eq!(layer.options()[5], UpdateOption::new(25.0, 5.0));
        assert!(layer.has_noop());
    }

    #[test]
    fn test_empty_factor_rejected() {
        assert!(FactoredLayer::new(vec![vec![UpdateOption::noop()], vec![]]).is_err());
    }

    #[test]
    fn test_no_factors_is_single_noop() {
        let layer = FactoredLayer::new(vec![]).unwrap();
        assert_eq!(layer.option_count(), 1);
        assert_eq!(layer.to_layer().options(), &[UpdateOption::noop()]);
    }
}
