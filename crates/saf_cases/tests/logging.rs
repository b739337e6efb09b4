//! Log records produced by a pass, captured through a `fmt` subscriber.

use saf_cases::{run_pass, IngestOptions};
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn run_captured(options: &IngestOptions) -> (usize, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let mut out: Vec<u8> = Vec::new();
    tracing::subscriber::with_default(subscriber, || {
        run_pass(options, &mut out);
    });
    let lines = String::from_utf8(out).unwrap().lines().count();
    (lines, logs.contents())
}

fn count_level(logs: &str, level: &str) -> usize {
    logs.lines()
        .filter(|line| line.split_whitespace().nth(1) == Some(level))
        .count()
}

fn options(temp: &TempDir) -> IngestOptions {
    IngestOptions {
        cases_root: temp.path().join("cases"),
        state_path: temp.path().join("local").join("cases_state.json"),
    }
}

fn write_cases(options: &IngestOptions, folder: &str, content: &str) {
    let dir = options.cases_root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("cases.json"), content).unwrap();
}

const TWO_CASES: &str = r#"{
    "A": {"date": "2025-01-02T03:04:05.123456+00:00"},
    "B": {"date": "2025-01-02T03:04:06.000001+00:00"}
}"#;

#[test]
fn test_malformed_file_logs_one_error() {
    let temp = TempDir::new().unwrap();
    let options = options(&temp);
    write_cases(&options, "broken", "{ this is not json");
    write_cases(&options, "healthy", TWO_CASES);

    let (emitted, logs) = run_captured(&options);

    assert_eq!(emitted, 2);
    assert_eq!(count_level(&logs, "ERROR"), 1, "logs:\n{logs}");
    assert!(logs.contains("Failed to process cases file"));
    assert!(logs.contains("broken"));
}

#[test]
fn test_rerun_logs_warning_per_duplicate() {
    let temp = TempDir::new().unwrap();
    let options = options(&temp);
    write_cases(&options, "iphone-a", TWO_CASES);

    let (first, _) = run_captured(&options);
    let (second, logs) = run_captured(&options);

    assert_eq!(first, 2);
    assert_eq!(second, 0);
    assert_eq!(count_level(&logs, "WARN"), 2, "logs:\n{logs}");
    assert_eq!(count_level(&logs, "ERROR"), 0);
    assert!(logs.contains("Processed 2 cases for iphone-a, newly added 0 cases."));
}
