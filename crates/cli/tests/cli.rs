use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn chromevo(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("chromevo").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn init_small(dir: &Path) {
    chromevo(dir)
        .args([
            "init",
            "-n",
            "4",
            "-g",
            "3",
            "--goal",
            "100",
            "--random-length",
            "10",
            "--seed",
            "7",
        ])
        .assert()
        .success();
}

fn snapshots(dir: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "gap"))
        .collect()
}

#[test]
fn test_init_writes_config() {
    let temp = tempdir().unwrap();

    chromevo(temp.path())
        .args(["init", "--population-size", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Population size: 10"))
        .stdout(predicate::str::contains("Configuration written to"));

    let json = std::fs::read_to_string(temp.path().join("population.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["population_size"], 10);
    assert_eq!(value["goal"], 4.0);
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp = tempdir().unwrap();
    init_small(temp.path());

    chromevo(temp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    chromevo(temp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_init_rejects_zero_population() {
    let temp = tempdir().unwrap();

    chromevo(temp.path())
        .args(["init", "-n", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid population configuration"));
    assert!(!temp.path().join("population.json").exists());
}

#[test]
fn test_run_writes_reports_and_snapshot() {
    let temp = tempdir().unwrap();
    init_small(temp.path());

    chromevo(temp.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generations run: 3"))
        .stdout(predicate::str::contains("Goal reached: no"));

    let results = std::fs::read_to_string(temp.path().join("results.txt")).unwrap();
    let lines: Vec<&str> = results.lines().collect();
    assert_eq!(lines.len(), 3);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.starts_with(&format!("generation|{}|average fitness|", i + 1)));
        assert!(line.contains("|% to goal|"));
    }

    let frozen = snapshots(temp.path());
    assert_eq!(frozen.len(), 1);
    let name = frozen[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("pop3_"));
}

#[test]
fn test_run_json_reports() {
    let temp = tempdir().unwrap();
    init_small(temp.path());

    chromevo(temp.path())
        .args(["run", "--format", "json", "--no-final-freeze", "-r", "out.jsonl"])
        .assert()
        .success();

    let results = std::fs::read_to_string(temp.path().join("out.jsonl")).unwrap();
    let reports: Vec<serde_json::Value> = results
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[2]["generation"], 3);
    assert!(reports[0]["average_fitness"].is_number());
    assert!(snapshots(temp.path()).is_empty());
}

#[test]
fn test_run_generation_override() {
    let temp = tempdir().unwrap();
    init_small(temp.path());

    chromevo(temp.path())
        .args(["run", "-g", "1", "--no-final-freeze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generations run: 1"));

    let results = std::fs::read_to_string(temp.path().join("results.txt")).unwrap();
    assert_eq!(results.lines().count(), 1);
}

#[test]
fn test_run_durable_store() {
    let temp = tempdir().unwrap();
    init_small(temp.path());

    chromevo(temp.path())
        .args(["run", "--durable", "store.sqlite", "--no-final-freeze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Organisms stored in store.sqlite"))
        .stdout(predicate::str::contains("Generations run: 3"));

    assert!(temp.path().join("store.sqlite").exists());
    assert!(!temp.path().join("store.sqlite-wal").exists());
}

#[test]
fn test_run_revive_and_inspect() {
    let temp = tempdir().unwrap();
    init_small(temp.path());

    chromevo(temp.path()).arg("run").assert().success();
    let frozen = snapshots(temp.path()).remove(0);

    chromevo(temp.path())
        .arg("inspect")
        .arg(&frozen)
        .arg("--organisms")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generation: 3"))
        .stdout(predicate::str::contains("Goal: 100"))
        .stdout(predicate::str::contains("fitness"));

    chromevo(temp.path())
        .args(["run", "-g", "1", "--no-final-freeze", "--revive"])
        .arg(&frozen)
        .assert()
        .success()
        .stdout(predicate::str::contains("Revived"));
}

#[test]
fn test_run_missing_config() {
    let temp = tempdir().unwrap();

    chromevo(temp.path())
        .args(["run", "--config", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_inspect_rejects_garbage() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("bad.gap"), b"not a population").unwrap();

    chromevo(temp.path())
        .args(["inspect", "bad.gap"])
        .assert()
        .failure();
}

#[test]
fn test_unbounded_run_without_goal_stop_fails() {
    let temp = tempdir().unwrap();
    chromevo(temp.path())
        .args(["init", "-n", "4", "--random-length", "10"])
        .assert()
        .success();

    chromevo(temp.path())
        .args(["run", "--no-goal-stop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--no-goal-stop"));
}
