use std::collections::HashSet;

use groupalg::{
    build_cost_data, build_groups, explain,
    evolution::{optimize, Challenge, OptimizerOptions},
    make_partition, Dataset, Distribution, GroupingError, GroupingRequest, RandomNumberGenerator,
};

fn students(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("student{:02}", i)).collect()
}

#[test]
fn test_pairs_never_repeat_previous_pairs() {
    let names = students(8);
    let dataset = Dataset::new(names.clone())
        .with_labels("Projet1", &["g1", "g1", "g2", "g2", "g3", "g3", "g4", "g4"])
        .unwrap();

    let cost_data = build_cost_data(&dataset, &["Projet1"], &[]).unwrap();
    let initial = make_partition(8, &Distribution::GroupSize(2)).unwrap();
    let options = OptimizerOptions::builder().max_variants(1000).build();
    let mut rng = RandomNumberGenerator::from_seed(2024);

    let result = optimize(initial, &cost_data, &options, &mut rng).unwrap();
    assert!(result.is_optimal);
    assert_eq!(result.score, cost_data.minimal_cost());

    let previous: HashSet<(usize, usize)> = [(0, 1), (2, 3), (4, 5), (6, 7)].into_iter().collect();
    for group in result.partition.groups() {
        assert_eq!(group.len(), 2);
        assert!(!previous.contains(&(group[0], group[1])));
    }

    let report = explain(&result.partition, &cost_data, &names).unwrap();
    assert!(report.is_satisfied());
}

#[test]
fn test_class_of_thirty_with_two_previous_projects() {
    // Two earlier projects in groups of three, new groups of three
    let projet1: Vec<String> = (0..30).map(|i| format!("p1-{}", i / 3)).collect();
    let projet2: Vec<String> = (0..30).map(|i| format!("p2-{}", i % 10)).collect();
    let dataset = Dataset::new(students(30))
        .with_labels("Projet1", &projet1)
        .unwrap()
        .with_labels("Projet2", &projet2)
        .unwrap();

    let request = GroupingRequest::new(Distribution::GroupSize(3))
        .with_repulsion(["Projet1", "Projet2"])
        .with_options(OptimizerOptions::builder().max_variants(20_000).build());
    let mut rng = RandomNumberGenerator::from_seed(17);

    let outcome = build_groups(&dataset, &request, &mut rng).unwrap();

    assert_eq!(outcome.partition.group_sizes(), vec![3; 10]);
    assert!(outcome.score >= outcome.minimal_cost);
    assert_eq!(
        outcome.report.is_satisfied(),
        outcome.is_optimal,
        "the report agrees with the optimizer"
    );
    let cost_data = build_cost_data(&dataset, &["Projet1", "Projet2"], &[]).unwrap();
    assert_eq!(outcome.score, cost_data.score(&outcome.partition));
}

#[test]
fn test_affinity_keeps_pairs_together() {
    let binome = ["a", "a", "b", "b", "c", "c", "d", "d", "e", "e", "f", "f"];
    let dataset = Dataset::new(students(12))
        .with_labels("Binome", &binome)
        .unwrap();

    // Groups the size of an affinity class, so the optimum is reachable
    let request = GroupingRequest::new(Distribution::GroupSize(2))
        .with_affinity(["Binome"])
        .with_options(OptimizerOptions::builder().max_variants(10_000).build());
    let mut rng = RandomNumberGenerator::from_seed(5);

    let outcome = build_groups(&dataset, &request, &mut rng).unwrap();

    assert!(outcome.is_optimal);
    for k in 0..binome.len() / 2 {
        assert_eq!(
            outcome.partition.group_of(2 * k),
            outcome.partition.group_of(2 * k + 1)
        );
    }
}

#[test]
fn test_proportions_are_respected() {
    let dataset = Dataset::new(students(10));
    let request = GroupingRequest::new(Distribution::Proportions(vec![0.29, 0.35, 0.36]));
    let mut rng = RandomNumberGenerator::from_seed(1);

    let outcome = build_groups(&dataset, &request, &mut rng).unwrap();
    assert_eq!(outcome.partition.group_sizes(), vec![4, 3, 3]);
}

#[test]
fn test_missing_columns_are_all_reported() {
    let dataset = Dataset::new(students(4))
        .with_labels("Projet1", &["a", "a", "b", "b"])
        .unwrap();
    let request = GroupingRequest::new(Distribution::GroupSize(2))
        .with_repulsion(["Projet1", "Projet2"])
        .with_affinity(["Binome"]);
    let mut rng = RandomNumberGenerator::from_seed(1);

    match build_groups(&dataset, &request, &mut rng) {
        Err(error @ GroupingError::MissingColumns { .. }) => {
            let message = error.to_string();
            assert!(message.contains("Projet2"));
            assert!(message.contains("Binome"));
            assert!(message.contains("Projet1"));
        }
        other => panic!("Expected MissingColumns error, got {:?}", other),
    }
}

#[test]
fn test_empty_dataset_is_a_configuration_error() {
    let request = GroupingRequest::new(Distribution::GroupSize(2));
    let mut rng = RandomNumberGenerator::from_seed(1);

    let result = build_groups(&Dataset::default(), &request, &mut rng);
    assert!(matches!(result, Err(GroupingError::Configuration(_))));
}
