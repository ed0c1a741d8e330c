use groupalg::{
    build_groups, build_groups_by, Dataset, Distribution, GroupingRequest, OptimizerOptions,
    RandomNumberGenerator,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn dataset() -> Dataset {
    let names: Vec<String> = (0..6).map(|i| format!("student{}", i)).collect();
    Dataset::new(names)
        .with_labels("Projet1", &["p", "p", "p", "q", "q", "q"])
        .unwrap()
        .with_labels("Groupe", &["TD1", "TD1", "TD1", "TD2", "TD2", "TD2"])
        .unwrap()
}

#[test]
fn test_unsatisfiable_run_logs_and_reports() {
    init_tracing();

    // Each TD shares one project, and a single group per TD cannot avoid it
    let request = GroupingRequest::new(Distribution::NumGroups(1))
        .with_repulsion(["Projet1"])
        .with_options(OptimizerOptions::builder().max_variants(30).build());
    let mut rng = RandomNumberGenerator::from_seed(1);

    let subgroups = build_groups_by(&dataset(), "Groupe", &request, &mut rng).unwrap();

    assert_eq!(subgroups.len(), 2);
    for subgroup in &subgroups {
        assert!(!subgroup.outcome.is_optimal);
        assert_eq!(subgroup.outcome.report.total_violations(), 3);
    }
}

#[test]
fn test_satisfiable_run_with_debug_logging() {
    init_tracing();

    let request = GroupingRequest::new(Distribution::NumGroups(3)).with_repulsion(["Projet1"]);
    let mut rng = RandomNumberGenerator::from_seed(12);

    let outcome = build_groups(&dataset(), &request, &mut rng).unwrap();

    assert!(outcome.is_optimal);
    assert!(outcome.report.is_satisfied());
}
