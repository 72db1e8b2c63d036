use dcmst::parser::instance_from_file;
use dcmst::{check_benchmark, solve, solve_with_listener, solve_with_parameters, Cost, DcmstError, InstanceError, ObjectivePolicy, SearchEvent, SolveResult, SolverParameters};

use std::path::PathBuf;

fn check_result(filename: &str, result: &SolveResult, expected: Option<Cost>) {
    match (expected, result) {
        (Some(cost), SolveResult::Optimal(solution)) => assert_eq!(cost, solution.cost()),
        (None, SolveResult::ProvenInfeasible) => (),
        (expected, result) => panic!("{}: expected {:?}, got {}", filename, expected, result),
    }
}

macro_rules! integration_tests {
    ($dir:ident, $($name:ident: $value:expr,)*) => {
        $(
            paste::paste! {
                #[test]
                fn [<$dir _ $name _bottom_up>]() {
                    let filename = format!("tests/instances/{}/{}.txt", stringify!($dir), stringify!($name));
                    let instance = instance_from_file(PathBuf::from(&filename)).unwrap();
                    let result = solve(&instance, 60);
                    check_result(&filename, &result, $value);
                }

                #[test]
                fn [<$dir _ $name _top_down>]() {
                    let filename = format!("tests/instances/{}/{}.txt", stringify!($dir), stringify!($name));
                    let instance = instance_from_file(PathBuf::from(&filename)).unwrap();
                    let parameters = SolverParameters::new(60, 0, ObjectivePolicy::TopDown).with_statistics(true);
                    let report = solve_with_parameters(&instance, parameters);
                    assert!(report.exhausted);
                    assert!(report.statistics.nodes > 0 || report.result == SolveResult::ProvenInfeasible);
                    check_result(&filename, &report.result, $value);
                }
            }
        )*
    }
}

integration_tests! {
    feasible,
    triangle: Some(3),
    square_leaf: Some(3),
    random_6_0: Some(102),
    random_7_1: Some(73),
    random_8_2: Some(99),
    random_8_3: Some(200),
    random_9_4: Some(117),
    random_9_5: Some(165),
}

integration_tests! {
    infeasible,
    star_center_two: None,
    isolated_vertex: None,
    disconnected: None,
    leaves_only: None,
}

#[test]
fn invalid_instances_are_rejected() {
    let duplicate = instance_from_file("tests/instances/invalid/duplicate_edge.txt");
    assert!(matches!(duplicate, Err(InstanceError::DuplicateEdge { from: 1, to: 2 })));
    let order = instance_from_file("tests/instances/invalid/degree_out_of_order.txt");
    assert!(matches!(order, Err(InstanceError::DegreeOutOfOrder { expected: 2, found: 3, .. })));
    let negative = instance_from_file("tests/instances/invalid/negative_cost.txt");
    assert!(matches!(negative, Err(InstanceError::NegativeCost { cost: -1, .. })));
    let huge = instance_from_file("tests/instances/invalid/huge_cost.txt");
    assert!(matches!(huge, Err(InstanceError::CostOverflow { from: 1, to: 2, .. })));
    assert!(matches!(DcmstError::from(negative.unwrap_err()), DcmstError::InvalidInstance(_)));
}

#[test]
fn infeasible_benchmark_is_contradictory() {
    let instance = instance_from_file("tests/instances/infeasible/star_center_two.txt").unwrap();
    let report = solve_with_parameters(&instance, SolverParameters::default());
    assert!(matches!(check_benchmark(&report), Err(DcmstError::ContradictoryBenchmark { .. })));
    let instance = instance_from_file("tests/instances/feasible/triangle.txt").unwrap();
    let report = solve_with_parameters(&instance, SolverParameters::default());
    assert!(check_benchmark(&report).is_ok());
}

#[test]
fn solving_twice_gives_the_same_tree() {
    let instance = instance_from_file("tests/instances/feasible/random_8_3.txt").unwrap();
    let first = solve(&instance, 60);
    let second = solve(&instance, 60);
    assert_eq!(first.best().map(|s| s.edges().to_vec()), second.best().map(|s| s.edges().to_vec()));
}

#[test]
fn solutions_are_reported_while_solving() {
    let instance = instance_from_file("tests/instances/feasible/random_9_5.txt").unwrap();
    let parameters = SolverParameters::new(60, 0, ObjectivePolicy::TopDown);
    let mut costs = vec![];
    let report = solve_with_listener(&instance, parameters, |event| {
        if let SearchEvent::Solution { cost, .. } = event {
            costs.push(*cost);
        }
    });
    assert!(!costs.is_empty());
    assert!(costs.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(Some(165), costs.last().copied());
    let reported = report.events.iter().filter(|e| matches!(e, SearchEvent::Solution { .. })).count();
    assert_eq!(reported, costs.len());
}
