//! Add-on installation layout and platform paths

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Settings file shipped with the add-on.
pub const SETTINGS_FILE_NAME: &str = "ec_digit_saf_ta_settings.conf";

/// Log file written by the case reader.
pub const READ_CASES_LOG_FILE_NAME: &str = "ec_digit_saf_ta_read_cases.log";

/// Persisted dedup state, kept under `local/`.
pub const CASES_STATE_FILE_NAME: &str = "cases_state.json";

const DEFAULT_SPLUNK_HOME: &str = "/opt/splunk";

/// Locations derived from the add-on installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonPaths {
    app_root: PathBuf,
}

impl AddonPaths {
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
        }
    }

    /// Resolve the installation root from the running executable.
    ///
    /// Binaries live in `<app_root>/bin/`, so the root is the executable's
    /// grandparent.
    pub fn from_current_exe() -> Result<Self> {
        let exe = std::env::current_exe().map_err(|e| ConfigError::AppRoot(e.to_string()))?;
        exe.parent()
            .and_then(Path::parent)
            .map(Self::new)
            .ok_or_else(|| {
                ConfigError::AppRoot(format!("executable has no grandparent: {}", exe.display()))
            })
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    /// User overrides: `<app_root>/local`
    pub fn local_dir(&self) -> PathBuf {
        self.app_root.join("local")
    }

    /// Shipped defaults: `<app_root>/default`
    pub fn default_dir(&self) -> PathBuf {
        self.app_root.join("default")
    }

    /// Dedup state: `<app_root>/local/cases_state.json`
    pub fn state_path(&self) -> PathBuf {
        self.local_dir().join(CASES_STATE_FILE_NAME)
    }
}

/// Resolve the platform installation directory.
///
/// Priority:
/// 1) SPLUNK_HOME
/// 2) /opt/splunk
pub fn splunk_home() -> PathBuf {
    match std::env::var_os("SPLUNK_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => PathBuf::from(DEFAULT_SPLUNK_HOME),
    }
}

/// Platform log file: `$SPLUNK_HOME/var/log/splunk/<file_name>`
pub fn splunk_log_path(file_name: &str) -> PathBuf {
    splunk_home()
        .join("var")
        .join("log")
        .join("splunk")
        .join(file_name)
}
