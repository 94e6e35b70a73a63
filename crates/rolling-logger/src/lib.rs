//! Rolling Logger
//!
//! File logger built on `tracing-subscriber`:
//! - size-based rotation (`app.log`, `app.1.log`, ... up to `max_files`)
//! - in-memory circular buffer of the most recent lines
//! - `log` records are bridged into the same subscriber

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Directory holding the log files
    pub log_dir: PathBuf,
    /// Base file name (`<app_name>.log`)
    pub app_name: String,
    /// Rotate once the active file would grow past this size
    pub max_file_bytes: u64,
    /// Number of files kept, including the active one
    pub max_files: usize,
    /// Lines kept in the in-memory buffer
    pub buffer_lines: usize,
    pub level: log::LevelFilter,
}

impl LoggerConfig {
    pub fn new(log_dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            log_dir: log_dir.into(),
            app_name: app_name.to_string(),
            max_file_bytes: 1024 * 1024,
            max_files: 5,
            buffer_lines: 500,
            level: log::LevelFilter::Info,
        }
    }
}

static INSTALLED: OnceLock<RollingWriter> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Initialize the global logger with default settings.
///
/// Calling this again after a successful init is a no-op.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> io::Result<()> {
    init_with_config(LoggerConfig::new(log_dir.as_ref(), app_name))
}

/// Initialize the global logger
pub fn init_with_config(config: LoggerConfig) -> io::Result<()> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let writer = RollingWriter::new(RollingFile::open(&config)?);

    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_timer(LocalTimer)
        .with_max_level(to_tracing_level(config.level))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;

    let _ = INSTALLED.set(writer);
    tracing::info!(
        target: "rolling_logger",
        dir = %config.log_dir.display(),
        max_files = config.max_files,
        "logger installed"
    );
    Ok(())
}

/// Most recent formatted lines, oldest first
pub fn recent_lines() -> Vec<String> {
    INSTALLED
        .get()
        .map(|writer| writer.lock().buffer.iter().cloned().collect())
        .unwrap_or_default()
}

fn to_tracing_level(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

/// Local wall-clock timestamps (same format as the app's console output)
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

// ========================
// Rolling File
// ========================

/// Active log file plus rotation bookkeeping
struct RollingFile {
    dir: PathBuf,
    app_name: String,
    max_file_bytes: u64,
    max_files: usize,
    buffer_lines: usize,
    file: File,
    written: u64,
    buffer: VecDeque<String>,
}

impl RollingFile {
    fn open(config: &LoggerConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.log_dir)?;
        let path = file_path(&config.log_dir, &config.app_name, 0);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            dir: config.log_dir.clone(),
            app_name: config.app_name.clone(),
            max_file_bytes: config.max_file_bytes.max(1),
            max_files: config.max_files.max(1),
            buffer_lines: config.buffer_lines,
            file,
            written,
            buffer: VecDeque::with_capacity(config.buffer_lines),
        })
    }

    fn write_chunk(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_file_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;

        for line in String::from_utf8_lossy(buf).lines() {
            if line.is_empty() {
                continue;
            }
            if self.buffer_lines == 0 {
                break;
            }
            if self.buffer.len() == self.buffer_lines {
                self.buffer.pop_front();
            }
            self.buffer.push_back(line.to_string());
        }
        Ok(())
    }

    /// Shift `app.log -> app.1.log -> ...`, dropping the oldest file
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = file_path(&self.dir, &self.app_name, self.max_files - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (0..self.max_files - 1).rev() {
            let from = file_path(&self.dir, &self.app_name, index);
            if from.exists() {
                fs::rename(&from, file_path(&self.dir, &self.app_name, index + 1))?;
            }
        }

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(file_path(&self.dir, &self.app_name, 0))?;
        self.written = 0;
        Ok(())
    }
}

fn file_path(dir: &Path, app_name: &str, index: usize) -> PathBuf {
    if index == 0 {
        dir.join(format!("{}.log", app_name))
    } else {
        dir.join(format!("{}.{}.log", app_name, index))
    }
}

// ========================
// Writer
// ========================

/// Cloneable handle handed to the subscriber
#[derive(Clone)]
struct RollingWriter {
    inner: Arc<Mutex<RollingFile>>,
}

impl RollingWriter {
    fn new(file: RollingFile) -> Self {
        Self {
            inner: Arc::new(Mutex::new(file)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RollingFile> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write_chunk(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(dir: &Path) -> LoggerConfig {
        LoggerConfig {
            max_file_bytes: 32,
            max_files: 3,
            buffer_lines: 2,
            ..LoggerConfig::new(dir, "test")
        }
    }

    #[test]
    fn test_rotation_keeps_max_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = RollingFile::open(&small_config(dir.path())).unwrap();

        for i in 0..10 {
            file.write_chunk(format!("line number {:02} padded\n", i).as_bytes()).unwrap();
        }

        assert!(dir.path().join("test.log").exists());
        assert!(dir.path().join("test.1.log").exists());
        assert!(dir.path().join("test.2.log").exists());
        assert!(!dir.path().join("test.3.log").exists());

        let active = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert_eq!(active, "line number 09 padded\n");
    }

    #[test]
    fn test_buffer_is_circular() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = RollingFile::open(&small_config(dir.path())).unwrap();

        file.write_chunk(b"a\n").unwrap();
        file.write_chunk(b"b\n").unwrap();
        file.write_chunk(b"c\n").unwrap();

        let lines: Vec<_> = file.buffer.iter().cloned().collect();
        assert_eq!(lines, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_single_file_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig {
            max_files: 1,
            ..small_config(dir.path())
        };
        let mut file = RollingFile::open(&config).unwrap();

        file.write_chunk(b"first line that is long enough\n").unwrap();
        file.write_chunk(b"second\n").unwrap();

        let active = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert_eq!(active, "second\n");
        assert!(!dir.path().join("test.1.log").exists());
    }

    #[test]
    fn test_init_is_idempotent_and_captures_log_records() {
        let dir = tempfile::tempdir().unwrap();
        init_logger(dir.path(), "idempotent").unwrap();
        init_logger(dir.path(), "idempotent").unwrap();

        log::info!("first record after init");
        log::warn!("bridged log record");

        let lines = recent_lines();
        assert!(lines.iter().any(|l| l.contains("first record after init")));
        assert!(lines.iter().any(|l| l.contains("bridged log record")));
    }
}
