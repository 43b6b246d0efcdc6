//! Total order over candidate configurations
//!
//! Higher improvement wins; then lower cost; then the lexicographically
//! smaller option-index sequence. Both solvers, the parallel merge and the
//! DP cell update all go through this module.

use std::cmp::Ordering;

use crate::solution::Configuration;

/// Relative tolerance under which two totals count as equal
pub const SCORE_TOLERANCE: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= SCORE_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Totals of a configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub improvement: f64,
    pub cost: f64,
}

impl Score {
    pub const ZERO: Score = Score {
        improvement: 0.0,
        cost: 0.0,
    };

    pub fn new(improvement: f64, cost: f64) -> Self {
        Self { improvement, cost }
    }

    /// `Greater` means `self` is the better score
    pub fn compare(&self, other: &Score) -> Ordering {
        if !approx_eq(self.improvement, other.improvement) {
            return self.improvement.total_cmp(&other.improvement);
        }
        if !approx_eq(self.cost, other.cost) {
            return other.cost.total_cmp(&self.cost);
        }
        Ordering::Equal
    }
}

/// Full tie-broken order; `Greater` means `a` is preferred
pub fn compare_candidates(a: (&Score, &[usize]), b: (&Score, &[usize])) -> Ordering {
    a.0.compare(b.0).then_with(|| b.1.cmp(a.1))
}

/// Explicit best-so-far accumulator threaded through a search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BestSoFar {
    best: Option<(Score, Configuration)>,
}

impl BestSoFar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the candidate if it beats the current best. Copies the
    /// configuration only on improvement.
    pub fn offer(&mut self, score: Score, choices: &[usize]) -> bool {
        let better = match &self.best {
            None => true,
            Some((best, config)) => {
                compare_candidates((&score, choices), (best, config.as_slice()))
                    == Ordering::Greater
            }
        };
        if better {
            match &mut self.best {
                Some((best, config)) => {
                    *best = score;
                    config.clear();
                    config.extend_from_slice(choices);
                }
                None => self.best = Some((score, choices.to_vec())),
            }
        }
        better
    }

    /// Combine two disjoint searches
    pub fn merge(mut self, other: BestSoFar) -> BestSoFar {
        if let Some((score, config)) = other.best {
            self.offer(score, &config);
        }
        self
    }

    pub fn score(&self) -> Option<Score> {
        self.best.as_ref().map(|(s, _)| *s)
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }

    pub fn into_inner(self) -> Option<(Score, Configuration)> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improvement_dominates() {
        let a = Score::new(5.0, 100.0);
        let b = Score::new(4.0, 0.0);
        assert_eq!(a.compare(&b), Ordering::Greater);
        assert_eq!(b.compare(&a), Ordering::Less);
    }

    #[test]
    fn test_lower_cost_breaks_improvement_tie() {
        let a = Score::new(5.0, 10.0);
        let b = Score::new(5.0, 12.5);
        assert_eq!(a.compare(&b), Ordering::Greater);
    }

    #[test]
    fn test_rounding_noise_is_a_tie() {
        let a = Score::new(0.1 + 0.2, 1.0);
        let b = Score::new(0.3, 1.0);
        assert_eq!(a.compare(&b), Ordering::Equal);
    }

    #[test]
    fn test_lexicographic_tie_break() {
        let s = Score::new(3.0, 6.0);
        assert_eq!(
            compare_candidates((&s, &[0, 2, 1]), (&s, &[1, 0, 0])),
            Ordering::Greater
        );
        assert_eq!(
            compare_candidates((&s, &[1, 0, 0]), (&s, &[0, 2, 1])),
            Ordering::Less
        );
        assert_eq!(compare_candidates((&s, &[1, 1]), (&s, &[1, 1])), Ordering::Equal);
    }

    #[test]
    fn test_offer_keeps_best() {
        let mut best = BestSoFar::new();
        assert!(best.offer(Score::new(1.0, 1.0), &[0, 1]));
        assert!(!best.offer(Score::new(1.0, 2.0), &[0, 0]));
        assert!(best.offer(Score::new(1.0, 1.0), &[0, 0]));
        assert!(!best.offer(Score::new(0.5, 0.0), &[1, 1]));
        let (score, config) = best.into_inner().unwrap();
        assert_eq!(score, Score::new(1.0, 1.0));
        assert_eq!(config, vec![0, 0]);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let mut left = BestSoFar::new();
        left.offer(Score::new(2.0, 4.0), &[1, 0]);
        let mut right = BestSoFar::new();
        right.offer(Score::new(2.0, 4.0), &[0, 3]);

        let a = left.clone().merge(right.clone());
        let b = right.merge(left);
        assert_eq!(a, b);
        assert_eq!(a.into_inner().unwrap().1, vec![0, 3]);
    }

    #[test]
    fn test_merge_with_empty() {
        let mut left = BestSoFar::new();
        left.offer(Score::ZERO, &[0]);
        let merged = left.clone().merge(BestSoFar::new());
        assert_eq!(merged, left);
        assert!(BestSoFar::new().merge(BestSoFar::new()).is_empty());
    }
}
