//! Runs the `saf-read-cases` binary against a scratch add-on layout.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SETTINGS: &str = "ec_digit_saf_ta_settings.conf";

fn run_cli(app_root: &Path, splunk_home: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_saf-read-cases"))
        .env("SAF_APP_ROOT", app_root)
        .env("SPLUNK_HOME", splunk_home)
        .env_remove("RUST_LOG")
        .output()
        .expect("run saf-read-cases")
}

fn write_settings(dir: &Path, cases_folder: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(SETTINGS),
        format!(
            "[logging]\nmax_size_mb = 1\nmax_backup_files = 2\nlevel = 20\n\n[cases]\nfolder = {}\n",
            cases_folder.display()
        ),
    )
    .unwrap();
}

#[test]
fn test_cli_emits_json_lines_and_writes_state() {
    let temp = TempDir::new().unwrap();
    let app_root = temp.path().join("app");
    let splunk_home = temp.path().join("splunk");
    let cases = temp.path().join("cases");
    write_settings(&app_root.join("default"), &cases);
    fs::create_dir_all(cases.join("iphone-a")).unwrap();
    fs::write(
        cases.join("iphone-a").join("cases.json"),
        r#"{"17": {"date": "2025-01-02T03:04:05.123456+00:00", "name": "triage"}}"#,
    )
    .unwrap();

    let output = run_cli(&app_root, &splunk_home);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record["case_id"], "17");
    assert_eq!(record["host"], "iphone-a");
    assert_eq!(record["timestamp"].as_f64(), Some(1735787045.123456));

    let state = fs::read_to_string(app_root.join("local").join("cases_state.json")).unwrap();
    assert!(state.contains("\"17\""));

    let log = splunk_home.join("var/log/splunk/ec_digit_saf_ta_read_cases.log");
    let log_content = fs::read_to_string(log).unwrap();
    assert!(log_content.contains("Total cases files processed: 1"));

    let rerun = run_cli(&app_root, &splunk_home);
    assert!(rerun.status.success());
    assert!(rerun.stdout.is_empty());
}

#[test]
fn test_cli_local_settings_win() {
    let temp = TempDir::new().unwrap();
    let app_root = temp.path().join("app");
    let splunk_home = temp.path().join("splunk");
    let default_cases = temp.path().join("default-cases");
    let local_cases = temp.path().join("local-cases");
    write_settings(&app_root.join("default"), &default_cases);
    write_settings(&app_root.join("local"), &local_cases);
    for root in [&default_cases, &local_cases] {
        fs::create_dir_all(root.join("host")).unwrap();
    }
    fs::write(
        local_cases.join("host").join("cases.json"),
        r#"{"L": {"date": "2025-01-02T03:04:05.1+00:00"}}"#,
    )
    .unwrap();
    fs::write(
        default_cases.join("host").join("cases.json"),
        r#"{"D": {"date": "2025-01-02T03:04:05.1+00:00"}}"#,
    )
    .unwrap();

    let output = run_cli(&app_root, &splunk_home);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"case_id\":\"L\""));
    assert!(!stdout.contains("\"case_id\":\"D\""));
}

#[test]
fn test_cli_missing_settings_is_fatal() {
    let temp = TempDir::new().unwrap();
    let app_root = temp.path().join("app");
    let splunk_home = temp.path().join("splunk");

    let output = run_cli(&app_root, &splunk_home);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
    assert!(!app_root.join("local").join("cases_state.json").exists());
}
