use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "gouvernement-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_gouvernement-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("idle-government"));
}

#[test]
fn cli_smoke_run_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_gouvernement-tester");
    let output_path = temp_path("smoke");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "smoke",
            "--iterations",
            "1",
            "--seeds",
            "1,game-1735689600000-abc1234",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Gouvernement Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = results.as_array().expect("array of results");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_csv_report_has_one_row_per_run() {
    let exe = env!("CARGO_BIN_EXE_gouvernement-tester");
    let output_path = temp_path("csv");
    let status = Command::new(exe)
        .args([
            "--report",
            "csv",
            "--scenarios",
            "idle-government",
            "--iterations",
            "2",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines[0].starts_with("scenario,strategy,seed"));
    assert_eq!(lines.len(), 3);
}

#[test]
fn cli_rejects_a_missing_data_dir() {
    let exe = env!("CARGO_BIN_EXE_gouvernement-tester");
    let output = Command::new(exe)
        .args(["--data-dir", "/nonexistent/gouvernement-data", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("kpis.json"));
}
