use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use forest_rotation_simulator::io::read_json;

fn rotation_sim() -> Command {
    Command::cargo_bin("rotation-sim").unwrap()
}

#[test]
fn test_help() {
    rotation_sim()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("trajectory"));
}

#[test]
fn test_simulate_defaults() {
    rotation_sim()
        .args(["simulate", "--stands", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation Summary"))
        .stdout(predicate::str::contains("Final Biomass Statistics"))
        .stdout(predicate::str::contains("Final Biomass by Species"));
}

#[test]
fn test_simulate_with_policies() {
    rotation_sim()
        .args([
            "simulate",
            "--horizon",
            "25",
            "--stands",
            "30",
            "--seed",
            "2024",
            "--pine",
            "11,22",
            "--pine",
            "12,24",
            "--eucalyptus",
            "11",
            "--eucalyptus",
            "12",
            "--show",
            "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(11, 22)"))
        .stdout(predicate::str::contains("57 more rows"));
}

#[test]
fn test_simulate_rejects_wrong_arity() {
    rotation_sim()
        .args(["simulate", "--eucalyptus", "8,16"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_simulate_rejects_policy_beyond_horizon() {
    rotation_sim()
        .args(["simulate", "--horizon", "10", "--pine", "8,16"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds horizon"));
}

#[test]
fn test_invalid_policy_syntax() {
    rotation_sim()
        .args(["simulate", "--pine", "eleven"])
        .assert()
        .failure();
}

#[test]
fn test_compare_presets() {
    rotation_sim()
        .args(["compare", "--stands", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategy Comparison"))
        .stdout(predicate::str::contains("Conservative"))
        .stdout(predicate::str::contains("Intensive"))
        .stdout(predicate::str::contains("Intermediate"))
        .stdout(predicate::str::contains("Best strategy:"));
}

#[test]
fn test_compare_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("strategies.toml");
    std::fs::write(
        &path,
        r#"
[[strategies]]
name = "Short"
pine_policies = [[8, 16]]
eucalyptus_policies = [[8]]

[[strategies]]
name = "Long"
pine_policies = [[12, 24]]
eucalyptus_policies = [[12]]
"#,
    )
    .unwrap();

    rotation_sim()
        .args(["compare", "--stands", "8", "--strategies"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Short"))
        .stdout(predicate::str::contains("Long"));
}

#[test]
fn test_compare_with_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sim.toml");
    std::fs::write(
        &path,
        r#"
horizon = 25
num_stands = 6
seed = 11
exhaustion = "continue"

[species_mix]
pine = 3.0
eucalyptus = 1.0

[growth.pine]
max_biomass = 500.0
rate = 0.1
shape = 2.4
"#,
    )
    .unwrap();

    rotation_sim()
        .args(["compare", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 stands, 25 years, seed 11"))
        .stdout(predicate::str::contains("Best strategy:"));

    rotation_sim()
        .args(["compare", "--stands", "4", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 stands, 25 years, seed 11"));
}

#[test]
fn test_compare_rejects_invalid_growth_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        "[growth.pine]\nmax_biomass = -1.0\nrate = 0.1\nshape = 2.0\n",
    )
    .unwrap();

    rotation_sim()
        .args(["compare", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_trajectory() {
    rotation_sim()
        .args([
            "trajectory",
            "--stands",
            "3",
            "--eucalyptus-weight",
            "0",
            "--stand",
            "1",
            "--policy",
            "8,16",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stand 1 (Pine)"))
        .stdout(predicate::str::contains("Biomass Trajectory"))
        .stdout(predicate::str::contains("Rotations: 2"));
}

#[test]
fn test_trajectory_unknown_stand() {
    rotation_sim()
        .args(["trajectory", "--stands", "3", "--stand", "99", "--policy", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no trajectory for stand 99"));
}

#[test]
fn test_growth() {
    rotation_sim()
        .args(["growth", "--species", "eucalyptus", "--years", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Eucalyptus Growth Curve"));
}

#[test]
fn test_growth_unknown_species() {
    rotation_sim()
        .args(["growth", "--species", "oak"])
        .assert()
        .failure();
}

#[test]
fn test_export_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.json");

    rotation_sim()
        .args(["export", "--stands", "5", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let results = read_json(&path).unwrap();
    assert_eq!(results.stands.len(), 5);
}

#[test]
fn test_export_csv_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("final.csv");

    rotation_sim()
        .args(["export", "--stands", "5", "--table", "final-biomass", "--output"])
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("stand_id,policy,final_biomass"));
    // 5 stands, 3 policies each
    assert_eq!(content.lines().count(), 1 + 15);
}

#[test]
fn test_export_all_csv_into_directory() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("tables");

    rotation_sim()
        .args(["export", "--stands", "4", "--output"])
        .arg(&out)
        .assert()
        .success();

    for name in ["trajectories", "summaries", "final_biomass", "estimation"] {
        assert!(out.join(format!("{name}.csv")).exists());
    }
}

#[test]
fn test_export_xlsx() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.xlsx");

    rotation_sim()
        .args(["export", "--stands", "4", "--output"])
        .arg(&path)
        .assert()
        .success();

    assert!(path.exists());
}

#[test]
fn test_export_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.parquet");

    rotation_sim()
        .args(["export", "--stands", "4", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported output format"));
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sim.toml");
    std::fs::write(
        &path,
        r#"
horizon = 25
num_stands = 12
seed = 7
pine_policies = [[11, 22]]
eucalyptus_policies = [[11]]
"#,
    )
    .unwrap();

    rotation_sim()
        .args(["simulate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("12 stands over 25 years"));
}
