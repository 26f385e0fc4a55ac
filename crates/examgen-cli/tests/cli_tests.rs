//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ALGEBRA: &str = "../../question-banks/algebra.toml";
const CONFIG: &str = "../../examgen.toml";

fn examgen() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("examgen").unwrap();
    cmd.env_remove("EXAMGEN_SEED").env_remove("EXAMGEN_RANDOMIZE");
    cmd
}

fn generate_json(args: &[&str]) -> serde_json::Value {
    let output = examgen()
        .arg("generate")
        .args(["--bank", ALGEBRA, "--config", CONFIG, "--format", "json"])
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

fn selected_ids(report: &serde_json::Value) -> Vec<String> {
    report["result"]["selected_questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn generate_satisfiable_distribution() {
    examgen()
        .arg("generate")
        .args(["--bank", ALGEBRA, "--config", CONFIG])
        .args(["--distribution", "../../distributions/midterm.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12 of 12 questions"))
        .stdout(predicate::str::contains("Distribution met."));
}

#[test]
fn generate_reports_shortfall() {
    examgen()
        .arg("generate")
        .args(["--bank", ALGEBRA, "--config", CONFIG])
        .args(["--distribution", "../../distributions/overdrawn.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("13 of 15 questions"))
        .stdout(predicate::str::contains("ESSAY/HARD: need 7, have 5"));
}

#[test]
fn fail_on_shortfall_sets_exit_code() {
    examgen()
        .arg("generate")
        .args(["--bank", ALGEBRA, "--config", CONFIG])
        .args(["--distribution", "../../distributions/overdrawn.toml"])
        .arg("--fail-on-shortfall")
        .assert()
        .failure()
        .stdout(predicate::str::contains("NOT met"));
}

#[test]
fn generate_from_template() {
    examgen()
        .arg("generate")
        .args(["--bank", ALGEBRA, "--config", CONFIG])
        .args(["--template", "algebra-quiz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("algebra-quiz"))
        .stdout(predicate::str::contains("alg-fb-01"))
        .stdout(predicate::str::contains("Distribution met."));
}

#[test]
fn unknown_template_is_an_error() {
    examgen()
        .arg("generate")
        .args(["--bank", ALGEBRA, "--config", CONFIG])
        .args(["--template", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("template 'nope' not found"));
}

#[test]
fn missing_distribution_is_an_error() {
    examgen()
        .arg("generate")
        .args(["--bank", ALGEBRA, "--config", CONFIG])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no distribution given"));
}

#[test]
fn seeded_generation_is_reproducible() {
    let args = [
        "--distribution",
        "../../distributions/midterm.toml",
        "--seed",
        "spring-2025",
    ];
    let first = generate_json(&args);
    let second = generate_json(&args);
    assert_eq!(selected_ids(&first), selected_ids(&second));
    assert_eq!(first["reproducible"], serde_json::Value::Bool(true));
    assert_eq!(first["randomize"], serde_json::Value::Bool(true));
}

#[test]
fn unseeded_shuffle_is_flagged() {
    let report = generate_json(&[
        "--distribution",
        "../../distributions/midterm.toml",
        "--randomize",
    ]);
    assert_eq!(report["reproducible"], serde_json::Value::Bool(false));
    assert_eq!(selected_ids(&report).len(), 12);
}

#[test]
fn json_distribution_file() {
    let report = generate_json(&["--distribution", "../../distributions/final.json"]);
    assert_eq!(report["template"], "final");
    assert_eq!(
        report["result"]["metadata"]["missing_categories"],
        serde_json::json!([])
    );
    assert_eq!(report["result"]["metadata"]["distribution_met"], true);
    assert_eq!(selected_ids(&report).len(), 18);
}

#[test]
fn bloom_buckets_constrain_selection() {
    let report = generate_json(&["--distribution", "../../distributions/bloom.toml"]);
    let metadata = &report["result"]["metadata"];
    assert_eq!(metadata["distribution_met"], false);
    assert_eq!(
        metadata["missing_categories"],
        serde_json::json!(["ESSAY/HARD/CREATE: need 1, have 0"])
    );
    assert_eq!(metadata["shortfalls"][0]["bloom_level"], "CREATE");
    assert_eq!(metadata["shortfalls"][0]["deficit"], 1);

    let selected = report["result"]["selected_questions"].as_array().unwrap();
    assert_eq!(selected.len(), 4);
    let essays: Vec<_> = selected
        .iter()
        .filter(|q| q["question_type"] == "ESSAY")
        .collect();
    assert_eq!(essays.len(), 2);
    assert!(essays.iter().all(|q| q["bloom_level"] == "EVALUATE"));
}

#[test]
fn shortfall_json_includes_deficit() {
    let report = generate_json(&["--distribution", "../../distributions/overdrawn.toml"]);
    let shortfall = &report["result"]["metadata"]["shortfalls"][0];
    assert_eq!(shortfall["requested"], 7);
    assert_eq!(shortfall["available"], 5);
    assert_eq!(shortfall["deficit"], 2);
}

#[test]
fn negative_count_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("negative.toml");
    std::fs::write(&path, "[distribution.ESSAY]\nHARD = -1\n").unwrap();

    examgen()
        .arg("generate")
        .args(["--bank", ALGEBRA, "--config", CONFIG])
        .arg("--distribution")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("negative count"));
}

#[test]
fn save_writes_report() {
    let dir = TempDir::new().unwrap();

    examgen()
        .arg("generate")
        .args(["--bank", ALGEBRA, "--config", CONFIG])
        .args(["--template", "algebra-quiz", "--save", "--output"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Report saved to"));

    let saved: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(saved.len(), 1);
    let content = std::fs::read_to_string(&saved[0]).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["bank"]["id"], "algebra-1");
}

#[test]
fn preview_shows_composition() {
    examgen()
        .arg("preview")
        .args(["--bank", ALGEBRA])
        .assert()
        .success()
        .stdout(predicate::str::contains("Algebra I (24 questions"))
        .stdout(predicate::str::contains("MULTIPLE_CHOICE"))
        .stdout(predicate::str::contains("EVALUATE"));
}

#[test]
fn preview_dry_run_reports_missing() {
    examgen()
        .arg("preview")
        .args(["--bank", ALGEBRA])
        .args(["--distribution", "../../distributions/overdrawn.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'overdrawn' cannot be fully satisfied"))
        .stdout(predicate::str::contains("ESSAY/HARD: need 7, have 5"));
}

#[test]
fn preview_dry_run_rejects_negative_count() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("negative.toml");
    std::fs::write(&path, "[distribution.ESSAY]\nHARD = -1\n").unwrap();

    examgen()
        .arg("preview")
        .args(["--bank", ALGEBRA])
        .arg("--distribution")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("negative count"));
}

#[test]
fn preview_json_output() {
    let output = examgen()
        .arg("preview")
        .args(["--bank", "../../question-banks", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["total_questions"], 33);
    assert!(json["shortfalls"].is_null());
}

#[test]
fn validate_bank_directory() {
    examgen()
        .arg("validate")
        .args(["--bank", "../../question-banks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Algebra I (24 questions)"))
        .stdout(predicate::str::contains("Introductory Biology (9 questions)"))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_rejects_duplicate_ids() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dupes.toml");
    std::fs::write(
        &path,
        r#"
[bank]
id = "dupes"
name = "Dupes"

[[questions]]
id = "same"
question_type = "ESSAY"
difficulty = "EASY"
bloom_level = "CREATE"

[[questions]]
id = "same"
question_type = "ESSAY"
difficulty = "HARD"
bloom_level = "CREATE"
"#,
    )
    .unwrap();

    examgen()
        .arg("validate")
        .arg("--bank")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("duplicate question ID: same"))
        .stderr(predicate::str::contains("1 error(s)"));
}

#[test]
fn validate_nonexistent_file() {
    examgen()
        .arg("validate")
        .args(["--bank", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    examgen()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created examgen.toml"))
        .stdout(predicate::str::contains("Created question-banks/example.toml"));

    assert!(dir.path().join("examgen.toml").exists());
    assert!(dir.path().join("question-banks/example.toml").exists());

    // The starter files work together.
    examgen()
        .current_dir(dir.path())
        .arg("generate")
        .args(["--bank", "question-banks/example.toml", "--template", "midterm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Distribution met."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    examgen().current_dir(dir.path()).arg("init").assert().success();

    examgen()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    examgen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Distribution-driven exam generator"));
}

#[test]
fn version_output() {
    examgen()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("examgen"));
}
