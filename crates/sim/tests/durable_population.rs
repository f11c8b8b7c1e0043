//! Integration tests for the store-backed population.

use chromevo_sim::genome::{Chromosome, Organism};
use chromevo_sim::simulation::{
    GenerationReport, Population, RevivalMode, RunConfig, Runner,
};
use chromevo_sim::storage::{read_snapshot, DurablePopulation};

fn organisms(n: usize, len: usize) -> Vec<Organism> {
    (0..n)
        .map(|i| {
            let chr = Chromosome::new(vec![(i % 2) as u8; len], vec![1, 0], 0.0).unwrap();
            Organism::new(vec![chr]).unwrap()
        })
        .collect()
}

#[test]
fn test_durable_run_with_runner() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("population.sqlite");

    let mut pop = DurablePopulation::create(&db_path, 100.0, Some(3), organisms(4, 10))
        .unwrap()
        .with_seed(8);
    let runner = Runner::new(RunConfig {
        freeze_prefix: dir.path().join("pop").to_string_lossy().to_string(),
        stop_at_goal: false,
        ..RunConfig::default()
    });
    let mut reports: Vec<GenerationReport> = Vec::new();

    let summary = runner.run(&mut pop, &mut reports).unwrap();

    assert_eq!(summary.steps, 3);
    assert_eq!(pop.generation(), 3);
    assert_eq!(reports.last().unwrap().generation, 3);

    let last = summary.snapshots.last().unwrap();
    let frozen = read_snapshot::<u8>(last).unwrap();
    assert_eq!(frozen.generation, 3);
    assert_eq!(frozen.len(), pop.size().unwrap());
}

#[test]
fn test_durable_resume_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("population.sqlite");

    let mut pop = DurablePopulation::create(&db_path, 0.5, Some(4), organisms(4, 10))
        .unwrap()
        .with_seed(1);
    pop.run_for(2).unwrap();
    let size = pop.size().unwrap();
    pop.close().unwrap();

    let mut reopened = DurablePopulation::<u8>::open(&db_path).unwrap().with_seed(2);
    assert_eq!(reopened.generation(), 2);
    assert_eq!(reopened.size().unwrap(), size);

    let report = reopened.run_for(2).unwrap().unwrap();
    assert_eq!(report.generation, 4);
}

#[test]
fn test_memory_snapshot_into_store() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("mem").to_string_lossy().to_string();

    let mut memory = Population::new(1.0, None, organisms(12, 6)).with_seed(3);
    memory.generation_step().unwrap();
    let path = memory.freeze(&prefix, 1.0).unwrap();

    let mut store: DurablePopulation =
        DurablePopulation::create(dir.path().join("store.sqlite"), 1.0, None, Vec::new()).unwrap();
    let revived = store.revive(&path, RevivalMode::Replace).unwrap();

    assert_eq!(revived, memory.size());
    assert_eq!(store.size().unwrap(), memory.size());

    let mut expected: Vec<f64> = memory.fitness_values();
    let mut stored: Vec<f64> = store
        .fitness_values()
        .unwrap()
        .into_iter()
        .map(|(_, f)| f)
        .collect();
    expected.sort_by(f64::total_cmp);
    stored.sort_by(f64::total_cmp);
    assert_eq!(expected, stored);
}
