//! SAF case reader
//!
//! Turns the `cases.json` files written by the sysdiagnose analysis pipeline
//! into newline-delimited JSON for the indexer, emitting each case once.
//!
//! # Pass
//!
//! ```text
//! ┌────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │    Load    │────▶│  Scan & Process  │────▶│   Persist    │
//! │ dedup state│     │ cases.json files │     │ dedup state  │
//! └────────────┘     └──────────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      stdout (JSON lines)
//! ```
//!
//! # Core Concepts
//!
//! - **Folder label**: name of the directory holding a `cases.json`; the dedup namespace
//! - **Dedup state**: folder label → case ids already emitted, persisted between runs
//! - **Enrichment**: `timestamp`, `host`, `case_id` and `source` added to every record

pub mod discovery;
pub mod error;
pub mod ingest;
pub mod record;
pub mod state;

pub use discovery::{discover_case_files, folder_label, posix_source, CASES_FILE_NAME};
pub use error::{CaseFileError, StateError};
pub use ingest::{process_case_file, run_pass, FileOutcome, IngestOptions, PassSummary};
pub use record::{enrich_event, parse_case_date};
pub use state::{DedupState, StateFile};
