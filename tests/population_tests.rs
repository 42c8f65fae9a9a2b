//! Tests for population management and parent selection.

use hgs_vrptw::config::PopulationParams;
use hgs_vrptw::cost_evaluator::CostEvaluator;
use hgs_vrptw::population::Population;
use hgs_vrptw::problem::{Node, ProblemData};
use hgs_vrptw::rng::RandomNumberGenerator;
use hgs_vrptw::solution::Solution;
use hgs_vrptw::Error;

/// Six clients around the depot with unit demand and capacity 3.
fn create_test_problem() -> ProblemData {
    let nodes = vec![
        Node::new(0.0, 0.0, 0.0),
        Node::new(10.0, 0.0, 1.0),
        Node::new(10.0, 10.0, 1.0),
        Node::new(0.0, 10.0, 1.0),
        Node::new(-10.0, 10.0, 1.0),
        Node::new(-10.0, 0.0, 1.0),
        Node::new(0.0, -10.0, 1.0),
    ];

    ProblemData::new("TestProblem".to_string(), nodes, 3.0, 3)
}

fn small_params() -> PopulationParams {
    PopulationParams::new()
        .with_min_pop_size(3)
        .with_generation_size(4)
        .with_nb_elite(1)
        .with_nb_close(2)
}

/// Shuffled clients cut into one to three routes; a single route is overloaded.
fn random_solution(data: &ProblemData, rng: &mut RandomNumberGenerator) -> Solution {
    let mut clients: Vec<usize> = data.clients().collect();
    rng.shuffle(&mut clients);

    let num_routes = 1 + rng.randint(3);
    let per_route = (clients.len() + num_routes - 1) / num_routes;
    let routes = clients.chunks(per_route).map(|c| c.to_vec()).collect();

    Solution::new(data, routes).unwrap()
}

#[test]
fn test_new_population_is_empty() {
    let population = Population::new(small_params()).unwrap();

    assert!(population.is_empty());
    assert_eq!(population.capacity(), 7);
    assert!(population.best_feasible().is_none());
}

#[test]
fn test_invalid_params_are_rejected() {
    let params = small_params().with_diversity_bounds(0.6, 0.4);
    assert!(matches!(
        Population::new(params),
        Err(Error::InvalidParameter { .. })
    ));

    let params = small_params().with_min_pop_size(0);
    assert!(Population::new(params).is_err());
}

#[test]
fn test_select_from_empty_population() {
    let mut population = Population::new(small_params()).unwrap();
    let cost_evaluator = CostEvaluator::new(10.0, 10.0);
    let mut rng = RandomNumberGenerator::new(42);

    let result = population.select(&mut rng, &cost_evaluator);
    assert!(matches!(result, Err(Error::EmptyPopulation)));
}

#[test]
fn test_subpopulations_stay_within_capacity() {
    let data = create_test_problem();
    let mut population = Population::new(small_params()).unwrap();
    let cost_evaluator = CostEvaluator::new(10.0, 10.0);
    let mut rng = RandomNumberGenerator::new(42);

    let mut best_added = f64::INFINITY;
    let mut added_infeasible = false;

    for _ in 0..40 {
        let solution = random_solution(&data, &mut rng);

        if solution.is_feasible() {
            best_added = best_added.min(cost_evaluator.penalised_cost(&solution));
        } else {
            added_infeasible = true;
        }

        population.add(solution, &cost_evaluator);

        assert!(population.num_feasible() <= population.capacity());
        assert!(population.num_infeasible() <= population.capacity());
    }

    assert!(added_infeasible);
    assert!(population.num_infeasible() > 0);

    // The cheapest feasible solution ever added is remembered and kept
    let best = population.best_feasible().unwrap();
    assert!((cost_evaluator.penalised_cost(best) - best_added).abs() < 1e-9);
    assert!(population.iter().any(|solution| solution == best));
}

#[test]
fn test_clones_are_purged_first() {
    let data = create_test_problem();
    let mut population = Population::new(small_params()).unwrap();
    let cost_evaluator = CostEvaluator::new(10.0, 10.0);

    let distinct =
        Solution::new(&data, vec![vec![1, 3, 5], vec![2, 4, 6]]).unwrap();
    let copy = Solution::new(&data, vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    assert!(distinct.is_feasible() && copy.is_feasible());
    assert!(cost_evaluator.penalised_cost(&distinct) > cost_evaluator.penalised_cost(&copy));

    population.add(distinct.clone(), &cost_evaluator);
    for _ in 0..7 {
        population.add(copy.clone(), &cost_evaluator);
    }

    // Eight members exceed the capacity of seven, so survivors are selected
    assert_eq!(population.num_feasible(), 3);
    assert!(population.iter().any(|solution| *solution == distinct));
    assert!(population.iter().any(|solution| *solution == copy));
}

#[test]
fn test_select_returns_distinct_parents() {
    let data = create_test_problem();
    let mut population = Population::new(small_params()).unwrap();
    let cost_evaluator = CostEvaluator::new(10.0, 10.0);
    let mut rng = RandomNumberGenerator::new(42);

    let first = Solution::new(&data, vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    let second = Solution::new(&data, vec![vec![1, 2, 3, 4, 5, 6]]).unwrap();
    population.add(first, &cost_evaluator);
    population.add(second, &cost_evaluator);

    for _ in 0..20 {
        let (a, b) = population.select(&mut rng, &cost_evaluator).unwrap();
        assert!(!std::ptr::eq(a, b));
    }
}

#[test]
fn test_single_member_is_selected_twice() {
    let data = create_test_problem();
    let mut population = Population::new(small_params()).unwrap();
    let cost_evaluator = CostEvaluator::new(10.0, 10.0);
    let mut rng = RandomNumberGenerator::new(42);

    let only = Solution::new(&data, vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    population.add(only.clone(), &cost_evaluator);

    let (a, b) = population.select(&mut rng, &cost_evaluator).unwrap();
    assert!(std::ptr::eq(a, b));
    assert!(*a == only);
}

#[test]
fn test_clear() {
    let data = create_test_problem();
    let mut population = Population::new(small_params()).unwrap();
    let cost_evaluator = CostEvaluator::new(10.0, 10.0);
    let mut rng = RandomNumberGenerator::new(42);

    for _ in 0..5 {
        population.add(random_solution(&data, &mut rng), &cost_evaluator);
    }
    assert!(!population.is_empty());

    population.clear();

    assert!(population.is_empty());
    assert!(population.best_feasible().is_none());
    assert!(population.iter().next().is_none());
}
