//! SAF add-on configuration
//!
//! Resolves the add-on installation layout and loads the INI settings file.
//!
//! # Layout
//!
//! ```text
//! <app_root>/
//! ├── bin/        executables
//! ├── default/    shipped settings (read-only)
//! └── local/      user overrides, dedup state
//! ```
//!
//! A settings file in `local/` shadows the one in `default/` entirely; the two
//! are never merged.

pub mod configuration;
pub mod error;
pub mod paths;
pub mod settings;

pub use configuration::{load_configuration, Configuration};
pub use error::{ConfigError, Result};
pub use paths::{splunk_home, splunk_log_path, AddonPaths};
pub use settings::{CasesSettings, LoggingSettings, Settings};
