//! Single pass over the cases folder: load state, emit new cases, persist state.

use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::discovery::{discover_case_files, folder_label, posix_source};
use crate::error::CaseFileError;
use crate::record::enrich_event;
use crate::state::{DedupState, StateFile};

/// Inputs of a pass.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Root scanned recursively for `cases.json`
    pub cases_root: PathBuf,
    /// Persisted dedup state
    pub state_path: PathBuf,
}

/// Counters for a whole pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub files_found: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub cases_emitted: usize,
    pub duplicates_skipped: usize,
}

/// Result of one successfully processed cases file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub folder: String,
    pub total_cases: usize,
    pub new_cases: usize,
    pub duplicates: usize,
}

/// Run one pass and write every new case to `out`, one JSON object per line.
///
/// Per-file failures are logged and skipped. If no file could be processed
/// the persisted state is reset to empty, which discards all dedup history.
pub fn run_pass<W: Write>(options: &IngestOptions, out: &mut W) -> PassSummary {
    let state_file = StateFile::new(&options.state_path);
    let mut state = state_file.load();

    let files = discover_case_files(&options.cases_root);
    let mut summary = PassSummary {
        files_found: files.len(),
        ..PassSummary::default()
    };

    for path in &files {
        info!(path = %path.display(), "Processing cases");
        match process_case_file(path, &mut state, out) {
            Ok(outcome) => {
                summary.files_processed += 1;
                summary.cases_emitted += outcome.new_cases;
                summary.duplicates_skipped += outcome.duplicates;
            }
            Err(err) => {
                summary.files_failed += 1;
                error!(path = %path.display(), error = %err, "Failed to process cases file");
            }
        }
    }

    info!(
        files_processed = summary.files_processed,
        files_failed = summary.files_failed,
        cases_emitted = summary.cases_emitted,
        "Total cases files processed: {}",
        summary.files_processed
    );

    if summary.files_processed > 0 {
        state_file.save(&state);
    } else {
        if !state.is_empty() {
            warn!(
                path = %state_file.path().display(),
                cases = state.len(),
                "No cases files processed, clearing dedup state"
            );
        }
        state_file.save(&DedupState::new());
    }

    summary
}

/// Process one `cases.json`.
///
/// Every new case is enriched before anything is written, so a file that
/// fails produces no output and leaves `state` untouched.
pub fn process_case_file<W: Write>(
    path: &Path,
    state: &mut DedupState,
    out: &mut W,
) -> Result<FileOutcome, CaseFileError> {
    let folder = folder_label(path);
    let source = posix_source(path);

    let content = fs::read_to_string(path)?;
    let cases: Map<String, Value> = serde_json::from_str(&content)?;
    let total_cases = cases.len();

    let mut pending: Vec<(String, String)> = Vec::new();
    let mut duplicates = 0;
    for (case_id, event) in cases {
        if state.contains(&folder, &case_id) {
            warn!(case_id = %case_id, folder = %folder, "Skipping already processed case id");
            duplicates += 1;
            continue;
        }
        let record = enrich_event(event, &folder, &case_id, &source)?;
        let line = serde_json::to_string(&record)?;
        pending.push((case_id, line));
    }

    for (_, line) in &pending {
        writeln!(out, "{line}").map_err(CaseFileError::Output)?;
    }
    out.flush().map_err(CaseFileError::Output)?;

    for (case_id, _) in &pending {
        state.insert(&folder, case_id);
    }

    let new_cases = pending.len();
    info!(
        folder = %folder,
        total = total_cases,
        new = new_cases,
        "Processed {} cases for {}, newly added {} cases.",
        total_cases,
        folder,
        new_cases
    );

    Ok(FileOutcome {
        folder,
        total_cases,
        new_cases,
        duplicates,
    })
}
