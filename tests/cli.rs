use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn hubble(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hubble").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("HUBBLE_X_COLUMN")
        .env_remove("HUBBLE_Y_COLUMN")
        .env_remove("HUBBLE_SIGMA_COLUMN");
    cmd
}

#[test]
fn age_prints_hubble_time() {
    let dir = tempfile::tempdir().unwrap();
    hubble(dir.path())
        .args(["age", "70"])
        .assert()
        .success()
        .stdout(predicate::str::contains("13.988 Gyr"));
}

#[test]
fn age_rejects_non_positive_h0() {
    let dir = tempfile::tempdir().unwrap();
    hubble(dir.path()).args(["age", "-5"]).assert().code(3);
}

#[test]
fn simulate_fit_export_and_replot() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();

    hubble(p)
        .args(["simulate", "-o", "sim.csv", "-n", "40", "--seed", "7"])
        .assert()
        .success();

    hubble(p)
        .args([
            "fit",
            "sim.csv",
            "--plot",
            "--svg",
            "fit.svg",
            "--export-json",
            "fit.json",
            "--export-residuals",
            "res.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("b (slope)"))
        .stdout(predicate::str::contains("Plot: x=["));

    assert!(p.join("fit.svg").exists());
    let residuals = std::fs::read_to_string(p.join("res.csv")).unwrap();
    assert!(residuals.starts_with("x,y,sigma,y_fit,residual,pull"));
    assert_eq!(residuals.lines().count(), 41);

    hubble(p)
        .args(["plot", "--fit", "fit.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("n=40"));
}

#[test]
fn missing_input_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    hubble(dir.path())
        .args(["fit", "nope.csv"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn unfittable_data_exits_with_three() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("one.csv"), "x,y,sigma\n1,70,5\n").unwrap();
    hubble(dir.path())
        .args(["fit", "one.csv", "--svg", "never.svg"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not enough data"));
    assert!(!dir.path().join("never.svg").exists());
}

#[test]
fn ordinary_cannot_export_json() {
    let dir = tempfile::tempdir().unwrap();
    hubble(dir.path())
        .args(["fit", "x.csv", "--ordinary", "--export-json", "f.json"])
        .assert()
        .code(2);
}

#[test]
fn batch_reports_each_file_and_fails_overall() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    std::fs::write(p.join("good.csv"), "x,y,sigma\n1,70,5\n2,141,5\n3,209,5\n").unwrap();
    std::fs::write(p.join("bad.csv"), "x,y,sigma\n1,70,5\n2,141,0\n").unwrap();

    hubble(p)
        .args(["batch", "good.csv", "bad.csv"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("good.csv"))
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("1 fitted, 1 failed"));
}

#[test]
fn batch_counts_unreadable_files_in_footer() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    std::fs::write(p.join("good.csv"), "x,y,sigma\n1,70,5\n2,141,5\n3,209,5\n").unwrap();

    hubble(p)
        .args(["batch", "good.csv", "missing.csv"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("UNREADABLE"))
        .stdout(predicate::str::contains("1 fitted, 1 failed"));
}

#[test]
fn ordinary_fit_reads_table_without_sigma() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("xy.csv"),
        "x,y\n203,944\n303,1320\n505,2300\n607,2790\n704,3200\n",
    )
    .unwrap();
    hubble(dir.path())
        .args(["fit", "xy.csv", "--ordinary", "--plot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ordinary least-squares"));
}

#[test]
fn nebula_table_groups_and_fits() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();

    hubble(p).args(["sample", "-o", "nebulae.csv"]).assert().success();

    hubble(p)
        .args([
            "group",
            "nebulae.csv",
            "-o",
            "grouped.csv",
            "--label-column",
            "Group",
            "--x-column",
            "Distance (Mpc)",
            "--y-column",
            "Velocity (km/s)",
            "--drop-zero-spread",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("8 group(s) kept, dropped: 7"));

    hubble(p)
        .args(["fit", "grouped.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("H0 ="));
}
