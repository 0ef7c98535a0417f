use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn diff_cmd(category: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lmu-setup"));
    cmd.env("NO_COLOR", "1")
        .arg("diff")
        .arg(fixture("fixtures/hy_toyota_race.svm"))
        .arg(fixture("fixtures/hy_toyota_quali.svm"))
        .arg("--category")
        .arg(category);
    cmd
}

#[test]
fn diff_marks_changed_rows() {
    diff_cmd("powertrain")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Engine]"))
        .stdout(predicate::str::contains("~ Engine Mixture: Race | Qualifying"))
        .stdout(predicate::str::contains(
            "= Fuel Ratio: 16.0L (4.5 laps) | 16.0L (4.2 laps)",
        ))
        .stdout(predicate::str::contains("~ Virtual Energy: 89% (13.5 laps) | 40% (6.1 laps)"))
        .stdout(predicate::str::contains("compared=17 changed=2"));
}

#[test]
fn diff_summary_prints_counts_only() {
    diff_cmd("powertrain")
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("compared=17 changed=2"))
        .stdout(predicate::str::contains("[Engine]").not());
}

#[test]
fn diff_only_changed_hides_matching_rows() {
    diff_cmd("powertrain")
        .arg("--only-changed")
        .assert()
        .success()
        .stdout(predicate::str::contains("~ Engine Mixture"))
        .stdout(predicate::str::contains("Rev Limit").not())
        .stdout(predicate::str::contains("[Gearbox]").not());
}

#[test]
fn diff_ignores_tyre_wear() {
    diff_cmd("wheels_and_brakes")
        .assert()
        .success()
        .stdout(predicate::str::contains("= Compound: 92% Medium | 100% Medium"))
        .stdout(predicate::str::contains("changed=0"));
}

#[test]
fn diff_json_reports_flags_and_compound_colour() {
    let output = diff_cmd("wheels_and_brakes")
        .arg("--format")
        .arg("json")
        .output()
        .expect("run diff");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(json["category"], "wheels_and_brakes");
    assert_eq!(json["changed"], 0);
    assert_eq!(json["diff"]["Front Left::CompoundSetting"], false);

    let front_left = json["groups"]
        .as_array()
        .expect("groups array")
        .iter()
        .find(|group| group["name"] == "Front Left")
        .expect("front left group");
    assert_eq!(front_left["rows"][0]["compound_color"], "medium");
}

#[test]
fn diff_without_category_compares_every_section() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lmu-setup"));
    cmd.env("NO_COLOR", "1")
        .arg("diff")
        .arg(fixture("fixtures/hy_toyota_race.svm"))
        .arg(fixture("fixtures/hy_toyota_quali.svm"))
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("changed=4"));
}

#[test]
fn diff_between_cars_flags_missing_settings() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lmu-setup"));
    cmd.env("NO_COLOR", "1")
        .arg("diff")
        .arg(fixture("fixtures/hy_toyota_race.svm"))
        .arg(fixture("fixtures/lmgt3_bmw_race.svm"))
        .arg("--category")
        .arg("powertrain")
        .arg("--only-changed")
        .assert()
        .success()
        .stdout(predicate::str::contains("~ Regen Level: 200kW | (missing)"));
}
