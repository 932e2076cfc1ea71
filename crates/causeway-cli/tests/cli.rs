use assert_cmd::Command;

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("causeway-cli"))
}

const SCRIPT: &str = r#"[
    {"op": "drop", "payload": "Severe drought ruins harvest (1987)"},
    {"op": "provideYear", "input": ""},
    {"op": "drop", "payload": "Export ban announced (1988)"},
    {"op": "provideYear", "input": ""},
    {"op": "link", "a": "drought", "b": "outcome"},
    {"op": "link", "a": "export ban", "b": "outcome"}
]"#;

#[test]
fn cases_lists_builtin_catalog() {
    let output = cli().arg("cases").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("grain-exchange"));
    assert!(stdout.contains("harbor-blackout"));
}

#[test]
fn apply_from_stdin_persists_and_show_reads_back() {
    let store = tempfile::tempdir().unwrap();
    let store_arg = store.path().to_string_lossy().to_string();

    let output = cli()
        .args(["apply", "grain-exchange", "--script", "-", "--store", &store_arg])
        .write_stdin(SCRIPT)
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(doc["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(doc["links"].as_array().unwrap().len(), 2);

    assert!(store.path().join("grain-exchange.json").exists());

    let output = cli()
        .args(["show", "grain-exchange", "--store", &store_arg])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Severe drought ruins harvest (1987)"));
    assert!(stdout.contains("\"lastUpdated\""));
}

#[test]
fn apply_summary_reports_readiness() {
    let store = tempfile::tempdir().unwrap();
    let store_arg = store.path().to_string_lossy().to_string();

    let output = cli()
        .args([
            "apply",
            "grain-exchange",
            "--script",
            "-",
            "--store",
            &store_arg,
            "--summary",
        ])
        .write_stdin(SCRIPT)
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["causeCount"], 2);
    assert_eq!(summary["linkCount"], 2);
    assert_eq!(summary["canFinalize"], false);
    assert_eq!(summary["causesNeeded"], 1);
}

#[test]
fn render_writes_svg_with_node_labels() {
    let store = tempfile::tempdir().unwrap();
    let store_arg = store.path().to_string_lossy().to_string();

    cli()
        .args(["apply", "grain-exchange", "--script", "-", "--store", &store_arg])
        .write_stdin(SCRIPT)
        .assert()
        .success();

    let out = store.path().join("map.svg");
    cli()
        .args([
            "render",
            "grain-exchange",
            "--store",
            &store_arg,
            "--selected",
            "drought",
            "--out",
            out.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains("Severe drought ruins harvest (1987)"));
    // The selected node's link picks up the highlight stroke.
    assert!(svg.contains("#fcd34d"));
}

#[test]
fn unknown_case_fails_with_exit_code_one() {
    let output = cli().args(["show", "no-such-case"]).assert().failure().code(1);
    let stderr = String::from_utf8(output.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("Unknown case"));
}

#[test]
fn bad_flag_prints_usage_with_exit_code_two() {
    let output = cli()
        .args(["render", "grain-exchange", "--bogus"])
        .assert()
        .failure()
        .code(2);
    let stderr = String::from_utf8(output.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("USAGE"));
}

#[test]
fn bad_script_op_reports_its_index() {
    let store = tempfile::tempdir().unwrap();
    let store_arg = store.path().to_string_lossy().to_string();

    let output = cli()
        .args(["apply", "grain-exchange", "--script", "-", "--store", &store_arg])
        .write_stdin(r#"[{"op": "click", "node": "nothing matches this"}]"#)
        .assert()
        .failure()
        .code(1);
    let stderr = String::from_utf8(output.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("script op #0"));
}
