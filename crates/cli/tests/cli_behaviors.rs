use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;

fn scandalscope() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("scandalscope");
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("PERSPECTIVE_API_KEY")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_analyze_prints_machine_line_and_exits_0() {
    let mut cmd = scandalscope();
    cmd.args([
        "analyze",
        "--text",
        "I think pineapple on pizza is actually pretty good",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("risk_level=SAFE"))
        .stderr(predicate::str::contains("POST AT WILL"));
}

#[test]
fn cli_analyze_exits_2_when_fail_on_is_met() {
    let mut cmd = scandalscope();
    cmd.args([
        "analyze",
        "--text",
        "I hate everyone and everything is stupid and worst terrible awful",
        "--fail-on",
        "high",
    ]);

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("TOO SPICY"));
}

#[test]
fn cli_analyze_json_output_is_parseable() {
    let mut cmd = scandalscope();
    cmd.args([
        "analyze",
        "--text",
        "a calm note about the weather today",
        "--output-format",
        "json",
    ]);

    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).expect("stdout is json");
    assert_eq!(v["risk_level"], "SAFE");
    assert!(v["recommendations"].as_array().is_some_and(|r| !r.is_empty()));
}

#[test]
fn cli_analyze_rejects_short_text_with_exit_1() {
    let mut cmd = scandalscope();
    cmd.args(["analyze", "--text", "meh"]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("too short"));
}

#[test]
fn cli_analyze_records_history() {
    let dir = tempfile::tempdir().unwrap();
    let history = dir.path().join("nested").join("history.json");

    scandalscope()
        .args([
            "analyze",
            "--text",
            "cereal is technically a soup and I stand by it",
            "--history",
            history.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(history.exists());

    scandalscope()
        .args(["history", "--history", history.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("cereal is technically a soup"))
        .stderr(predicate::str::contains("1 entries"));

    scandalscope()
        .args(["history", "--history", history.to_str().unwrap(), "--clear"])
        .assert()
        .success();

    scandalscope()
        .args(["history", "--history", history.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn cli_roast_uses_mode_templates_offline() {
    let mut cmd = scandalscope();
    cmd.args([
        "roast",
        "--text",
        "socks with sandals are peak fashion",
        "--mode",
        "hr",
        "--output-format",
        "json",
    ]);

    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).expect("stdout is json");
    assert_eq!(v["mode"], "HR");
    assert_eq!(v["tags"][1], "template");
}

#[test]
fn cli_history_without_path_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = scandalscope();
    cmd.current_dir(dir.path()).args(["history"]);
    cmd.assert().failure().code(1);
}
