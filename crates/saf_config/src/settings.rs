//! Typed view over the settings file

use crate::configuration::Configuration;
use crate::error::Result;

const DEFAULT_MAX_SIZE_MB: i64 = 1;
const DEFAULT_MAX_BACKUP_FILES: i64 = 2;
const DEFAULT_LOG_LEVEL: &str = "20";
const DEFAULT_CASES_FOLDER: &str = "/cases";
/// Largest size whose byte count still fits a `u64`.
const MAX_SIZE_MB: u64 = u64::MAX >> 20;

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Rotation threshold in MiB, between 1 and `u64::MAX >> 20`
    pub max_size_mb: u64,
    /// Rolled files kept, at least 1
    pub max_backup_files: usize,
    /// Raw level, numeric (`20`) or named (`info`)
    pub level: String,
}

impl LoggingSettings {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }
}

/// `[cases]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasesSettings {
    /// Root scanned for `cases.json` files
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub cases: CasesSettings,
}

impl Settings {
    pub fn from_configuration(config: &Configuration) -> Result<Self> {
        let max_size_mb = config
            .get_int_or("logging", "max_size_mb", DEFAULT_MAX_SIZE_MB)?
            .max(1) as u64;
        let max_backup_files = config
            .get_int_or("logging", "max_backup_files", DEFAULT_MAX_BACKUP_FILES)?
            .max(1);

        Ok(Self {
            logging: LoggingSettings {
                max_size_mb: max_size_mb.min(MAX_SIZE_MB),
                max_backup_files: max_backup_files as usize,
                level: config
                    .get_or("logging", "level", DEFAULT_LOG_LEVEL)
                    .trim()
                    .to_string(),
            },
            cases: CasesSettings {
                folder: config
                    .get_or("cases", "folder", DEFAULT_CASES_FOLDER)
                    .to_string(),
            },
        })
    }
}
