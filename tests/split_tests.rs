//! Tests for the Split algorithm and the crossover built on top of it.

use hgs_vrptw::cost_evaluator::CostEvaluator;
use hgs_vrptw::crossover::{Crossover, OrderedCrossover};
use hgs_vrptw::problem::{Node, ProblemData};
use hgs_vrptw::rng::RandomNumberGenerator;
use hgs_vrptw::solution::Solution;
use hgs_vrptw::split::Split;

/// Six clients on a line, one unit of demand each.
fn create_line_problem(num_vehicles: usize) -> ProblemData {
    let mut nodes = vec![Node::new(0.0, 0.0, 0.0)];

    for x in 1..=6 {
        nodes.push(Node::new(x as f64, 0.0, 1.0));
    }

    ProblemData::new("LineProblem".to_string(), nodes, 3.0, num_vehicles)
}

#[test]
fn test_split_respects_capacity() {
    let data = create_line_problem(3);
    let cost_evaluator = CostEvaluator::new(100.0, 100.0);

    let solution = Split::split(&[1, 2, 3, 4, 5, 6], &data, &cost_evaluator).unwrap();

    assert_eq!(solution.num_routes(), 2);
    assert_eq!(solution.routes()[0].visits(), &[1, 2, 3]);
    assert_eq!(solution.routes()[1].visits(), &[4, 5, 6]);
    assert!((solution.distance() - 18.0).abs() < 1e-9);
    assert!(solution.is_feasible());
}

#[test]
fn test_split_trades_distance_against_penalty() {
    let data = create_line_problem(3);

    // Without penalties a single route is shortest
    let free = CostEvaluator::new(0.0, 0.0);
    let solution = Split::split(&[1, 2, 3, 4, 5, 6], &data, &free).unwrap();

    assert_eq!(solution.num_routes(), 1);
    assert!((solution.distance() - 12.0).abs() < 1e-9);
    assert!((solution.excess_load() - 3.0).abs() < 1e-9);
}

#[test]
fn test_split_respects_fleet_size() {
    let data = create_line_problem(1);
    let cost_evaluator = CostEvaluator::new(100.0, 100.0);

    let solution = Split::split(&[6, 5, 4, 3, 2, 1], &data, &cost_evaluator).unwrap();

    assert_eq!(solution.num_routes(), 1);
    assert_eq!(solution.routes()[0].visits(), &[6, 5, 4, 3, 2, 1]);
    assert!(!solution.is_feasible());
}

#[test]
fn test_split_keeps_tour_order() {
    let data = create_line_problem(6);
    let cost_evaluator = CostEvaluator::new(100.0, 100.0);
    let tour = [4, 1, 6, 2, 5, 3];

    let solution = Split::split(&tour, &data, &cost_evaluator).unwrap();

    assert_eq!(solution.giant_tour(), tour.to_vec());
    assert!(solution.is_feasible());
}

#[test]
fn test_split_empty_tour() {
    let data = ProblemData::new(
        "DepotOnly".to_string(),
        vec![Node::new(0.0, 0.0, 0.0)],
        10.0,
        1,
    );
    let cost_evaluator = CostEvaluator::new(1.0, 1.0);

    let solution = Split::split(&[], &data, &cost_evaluator).unwrap();
    assert_eq!(solution.num_routes(), 0);
}

#[test]
fn test_ordered_crossover_keeps_slice_of_first_parent() {
    let first = vec![1, 2, 3, 4, 5, 6];
    let second = vec![6, 5, 4, 3, 2, 1];

    let offspring = OrderedCrossover::ordered_crossover(&first, &second, 1, 3);

    assert_eq!(&offspring[1..=3], &[2, 3, 4]);

    let mut sorted = offspring.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, first);
}

#[test]
fn test_ordered_crossover_produces_valid_offspring() {
    let data = create_line_problem(3);
    let cost_evaluator = CostEvaluator::new(10.0, 10.0);
    let mut rng = RandomNumberGenerator::new(42);

    let first = Solution::new(&data, vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    let second = Solution::new(&data, vec![vec![6, 1], vec![2, 5], vec![3, 4]]).unwrap();

    let mut crossover = OrderedCrossover;
    for _ in 0..20 {
        let offspring = crossover
            .crossover((&first, &second), &data, &cost_evaluator, &mut rng)
            .unwrap();

        assert_eq!(offspring.num_clients(), 6);
        assert!(offspring.num_routes() <= data.num_vehicles);
    }
}

#[test]
fn test_closure_as_crossover() {
    let data = create_line_problem(3);
    let cost_evaluator = CostEvaluator::new(10.0, 10.0);
    let mut rng = RandomNumberGenerator::new(1);

    let first = Solution::new(&data, vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    let second = Solution::new(&data, vec![vec![6, 5, 4, 3, 2, 1]]).unwrap();

    let mut resplit = |parents: (&Solution, &Solution),
                       data: &ProblemData,
                       cost_evaluator: &CostEvaluator,
                       _rng: &mut RandomNumberGenerator|
     -> hgs_vrptw::Result<Solution> {
        Split::split(&parents.1.giant_tour(), data, cost_evaluator)
    };

    let offspring = resplit
        .crossover((&first, &second), &data, &cost_evaluator, &mut rng)
        .unwrap();

    assert_eq!(offspring.giant_tour(), vec![6, 5, 4, 3, 2, 1]);
    assert!(offspring.is_feasible());
}
