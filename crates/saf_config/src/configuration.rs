//! INI settings file loading

use ini::{Ini, ParseOption};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::paths::AddonPaths;

/// Read-only key/value settings grouped into sections.
#[derive(Debug, Clone)]
pub struct Configuration {
    source: PathBuf,
    ini: Ini,
}

/// Load `name` from `local/`, falling back to `default/`.
///
/// Missing from both locations is fatal: the add-on cannot run unconfigured.
pub fn load_configuration(paths: &AddonPaths, name: &str) -> Result<Configuration> {
    let local = paths.local_dir().join(name);
    if local.is_file() {
        return Configuration::load(&local);
    }

    let default = paths.default_dir().join(name);
    if default.is_file() {
        return Configuration::load(&default);
    }

    Err(ConfigError::NotFound {
        name: name.to_string(),
        local,
        default,
    })
}

impl Configuration {
    /// Load a single INI file.
    pub fn load(path: &Path) -> Result<Self> {
        // Values are taken verbatim: backslashes (Windows paths) and quotes are
        // literal. Keys are case-insensitive through the `case-insensitive` feature.
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_file_opt(path, options).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_ini(path, ini))
    }

    pub fn from_ini(source: impl Into<PathBuf>, ini: Ini) -> Self {
        Self {
            source: source.into(),
            ini,
        }
    }

    /// File the settings were read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.ini.get_from(Some(section), key)
    }

    pub fn get_or<'a>(&'a self, section: &str, key: &str, fallback: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(fallback)
    }

    /// Integer lookup. An absent key yields `fallback`; a present but
    /// non-integer value is an error.
    pub fn get_int_or(&self, section: &str, key: &str, fallback: i64) -> Result<i64> {
        match self.get(section, key) {
            None => Ok(fallback),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue {
                    section: section.to_string(),
                    key: key.to_string(),
                    value: raw.to_string(),
                }),
        }
    }
}
