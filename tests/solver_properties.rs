//! Property tests: DP against the exhaustive oracle on small random problems

use layerbudget::config::DynamicConfig;
use layerbudget::problem::Layer;
use layerbudget::solver::{DynamicSolver, ExhaustiveSolver, Solver};
use layerbudget::{validation, CancellationToken, Problem, Solution};
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;

/// Up to 6 layers of up to 5 options, costs on a 0.5 grid
#[derive(Debug, Clone)]
struct SmallProblem {
    menus: Vec<Vec<(f64, f64)>>,
    budget: f64,
}

impl SmallProblem {
    fn problem(&self) -> Problem {
        self.with_budget(self.budget)
    }

    fn with_budget(&self, budget: f64) -> Problem {
        let layers = self.menus.iter().map(|m| Layer::from_pairs(m)).collect();
        Problem::new(layers, budget).unwrap()
    }
}

impl Arbitrary for SmallProblem {
    fn arbitrary(g: &mut Gen) -> Self {
        let layer_count = 1 + (u8::arbitrary(g) % 6) as usize;
        let menus = (0..layer_count)
            .map(|_| {
                let options = 1 + (u8::arbitrary(g) % 5) as usize;
                (0..options)
                    .map(|_| {
                        let cost = (u8::arbitrary(g) % 21) as f64 * 0.5;
                        let improvement = ((u8::arbitrary(g) % 13) as f64 - 2.0) * 0.5;
                        (cost, improvement)
                    })
                    .collect()
            })
            .collect();
        let budget = (u8::arbitrary(g) % 61) as f64 * 0.5;
        SmallProblem { menus, budget }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.menus.len() < 2 {
            return quickcheck::empty_shrinker();
        }
        let budget = self.budget;
        let menus = self.menus.clone();
        Box::new((0..menus.len()).map(move |skip| {
            let mut menus = menus.clone();
            menus.remove(skip);
            SmallProblem { menus, budget }
        }))
    }
}

fn solve(solver: &impl Solver, problem: &Problem) -> Solution {
    solver
        .solve(problem, &CancellationToken::new())
        .unwrap()
        .solution
}

#[quickcheck]
fn prop_dp_matches_exhaustive(input: SmallProblem) -> bool {
    let problem = input.problem();
    let exact = solve(&ExhaustiveSolver::new(), &problem);
    let dp = solve(&DynamicSolver::new(), &problem);

    exact.feasible == dp.feasible
        && exact.total_cost == dp.total_cost
        && exact.total_improvement == dp.total_improvement
        && exact.configuration == dp.configuration
}

#[quickcheck]
fn prop_more_budget_never_hurts(input: SmallProblem, extra: u8) -> TestResult {
    let problem = input.problem();
    let larger = input.with_budget(input.budget + (extra % 20) as f64 * 0.5);

    let before = solve(&DynamicSolver::new(), &problem);
    if !before.feasible {
        return TestResult::discard();
    }
    let after = solve(&DynamicSolver::new(), &larger);
    TestResult::from_bool(after.feasible && after.total_improvement >= before.total_improvement)
}

#[quickcheck]
fn prop_feasible_iff_cheapest_fits(input: SmallProblem) -> bool {
    let problem = input.problem();
    let report = validation::assess(&problem);
    let solution = solve(&ExhaustiveSolver::new(), &problem);
    solution.feasible == report.feasible && report.feasible == (report.min_cost <= problem.budget())
}

#[quickcheck]
fn prop_solution_within_budget(input: SmallProblem) -> bool {
    let problem = input.problem();
    let solution = solve(&DynamicSolver::new(), &problem);
    if !solution.feasible {
        return solution.configuration.is_none() && solution.total_improvement == 0.0;
    }
    let choices = solution.configuration.clone().unwrap_or_default();
    problem.fits(solution.total_cost)
        && problem.evaluate(&choices) == Some((solution.total_cost, solution.total_improvement))
}

#[quickcheck]
fn prop_solving_is_idempotent(input: SmallProblem) -> bool {
    let problem = input.problem();
    let solver = DynamicSolver::new();
    let first = solve(&solver, &problem).to_json().unwrap();
    let second = solve(&solver, &problem).to_json().unwrap();
    first == second
}

#[quickcheck]
fn prop_cheapest_budget_is_feasible(input: SmallProblem) -> bool {
    let floor = validation::assess(&input.problem()).min_cost;
    let problem = input.with_budget(floor);
    let solution = solve(&DynamicSolver::new(), &problem);
    solution.feasible && solution.total_cost <= floor
}

#[test]
fn test_zero_budget_with_priced_options_is_infeasible() {
    let problem = Problem::new(
        vec![
            Layer::from_pairs(&[(0.5, 0.0), (1.0, 2.0)]),
            Layer::from_pairs(&[(2.0, 1.0)]),
        ],
        0.0,
    )
    .unwrap();
    for solution in [
        solve(&ExhaustiveSolver::new(), &problem),
        solve(&DynamicSolver::new(), &problem),
    ] {
        assert!(!solution.feasible);
        assert_eq!(solution.total_improvement, 0.0);
        assert_eq!(solution.configuration, None);
    }
}

/// Same menus with every cost divided by three, off any decimal grid
fn in_thirds(input: &SmallProblem, budget: f64) -> Problem {
    let layers = input
        .menus
        .iter()
        .map(|m| {
            let thirds: Vec<(f64, f64)> = m.iter().map(|&(c, i)| (c / 3.0, i)).collect();
            Layer::from_pairs(&thirds)
        })
        .collect();
    Problem::new(layers, budget).unwrap()
}

#[quickcheck]
fn prop_lossy_grid_agrees_with_validator(input: SmallProblem) -> bool {
    let coarse = DynamicSolver::with_config(
        &DynamicConfig {
            max_decimals: 2,
            ..DynamicConfig::default()
        },
        false,
    );
    let floor = validation::assess(&in_thirds(&input, 0.0)).min_cost;

    [floor, input.budget / 3.0].iter().all(|&budget| {
        let problem = in_thirds(&input, budget);
        let report = validation::assess(&problem);
        let solution = solve(&coarse, &problem);
        solution.feasible == report.feasible
            && (!solution.feasible || problem.fits(solution.total_cost))
    })
}
