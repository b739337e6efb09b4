//! Logging sink for the SAF add-on binaries.
//!
//! Records go to a size-bounded rolling file (`<name>.log`, `<name>.log.1`, ...)
//! under the platform log directory. Standard output is left alone: it carries
//! the data stream consumed by the indexer.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logging configuration for a SAF binary.
pub struct LogConfig {
    pub sink: LogSink,
    pub level: LevelFilter,
    /// Mirror records to stderr as well.
    pub verbose: bool,
}

/// Initialize tracing with the rolling file sink and, when verbose, stderr output.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: LogConfig) -> Result<()> {
    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let console_layer = if config.verbose {
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(file_filter.clone()),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(config.sink)
                .with_ansi(false)
                .with_target(true)
                .with_filter(file_filter),
        )
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Build a rotating log sink at `path`.
///
/// Parent directories are created as needed. The active file rolls over once
/// the next record would push it past `max_size_bytes`; at most `max_backups`
/// rolled files are kept (never fewer than one).
pub fn build_log_sink(path: &Path, max_size_bytes: u64, max_backups: usize) -> Result<LogSink> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let appender = RollingFileAppender::new(path.to_path_buf(), max_backups, max_size_bytes)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok(LogSink {
        inner: Arc::new(Mutex::new(appender)),
    })
}

/// Parse a configured log level.
///
/// Accepts the numeric thresholds used by the add-on settings file
/// (10 debug, 20 info, 30 warning, 40 error, 50 critical) as well as level names.
pub fn parse_level(raw: &str) -> Result<LevelFilter> {
    let value = raw.trim();
    if let Ok(number) = value.parse::<i64>() {
        return Ok(match number {
            i64::MIN..=0 => LevelFilter::TRACE,
            1..=10 => LevelFilter::DEBUG,
            11..=20 => LevelFilter::INFO,
            21..=30 => LevelFilter::WARN,
            31..=40 => LevelFilter::ERROR,
            _ => LevelFilter::OFF,
        });
    }

    match value.to_ascii_lowercase().as_str() {
        "trace" | "notset" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        "critical" | "fatal" | "off" => Ok(LevelFilter::OFF),
        _ => anyhow::bail!("Unknown log level: {raw}"),
    }
}

struct RollingFileAppender {
    path: PathBuf,
    max_backups: usize,
    max_size: u64,
    file: Option<File>,
    current_size: u64,
}

impl RollingFileAppender {
    fn new(path: PathBuf, max_backups: usize, max_size: u64) -> io::Result<Self> {
        let mut appender = Self {
            path,
            max_backups: max_backups.max(1),
            max_size,
            file: None,
            current_size: 0,
        };
        let (file, size) = appender.open_current_file()?;
        appender.file = Some(file);
        appender.current_size = size;
        if appender.current_size >= appender.max_size {
            appender.rotate()?;
        }
        Ok(appender)
    }

    fn open_current_file(&self) -> io::Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let size = file.metadata()?.len();
        Ok((file, size))
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }

        self.rotate_files()?;

        let (file, size) = self.open_current_file()?;
        self.file = Some(file);
        self.current_size = size;
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let oldest = self.rotated_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for idx in (1..self.max_backups).rev() {
            let src = self.rotated_path(idx);
            if src.exists() {
                fs::rename(&src, self.rotated_path(idx + 1))?;
            }
        }

        if self.path.exists() {
            fs::rename(&self.path, self.rotated_path(1))?;
        }

        Ok(())
    }
}

impl Write for RollingFileAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.current_size > 0 && self.current_size + buf.len() as u64 > self.max_size {
            self.rotate()?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))?;
        let bytes = file.write(buf)?;
        self.current_size += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Shared handle to a rotating log file.
#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Mutex<RollingFileAppender>>,
}

impl LogSink {
    /// Path of the active log file.
    pub fn path(&self) -> Option<PathBuf> {
        self.inner.lock().ok().map(|appender| appender.path.clone())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogSink {
    type Writer = LogSinkHandle;

    fn make_writer(&'a self) -> Self::Writer {
        LogSinkHandle(Arc::clone(&self.inner))
    }
}

/// Per-event writer; each call takes the appender lock once.
pub struct LogSinkHandle(Arc<Mutex<RollingFileAppender>>);

impl LogSinkHandle {
    fn with_appender<T>(
        &self,
        op: impl FnOnce(&mut RollingFileAppender) -> io::Result<T>,
    ) -> io::Result<T> {
        let mut appender = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log appender lock poisoned"))?;
        op(&mut *appender)
    }
}

impl Write for LogSinkHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_appender(|appender| appender.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_appender(RollingFileAppender::flush)
    }
}
