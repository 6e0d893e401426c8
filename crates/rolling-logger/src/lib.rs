//! Rolling Logger
//!
//! Daily-rotated log files plus an in-memory circular buffer of recent lines.
//! Installed as the global `tracing` subscriber; `log` records are bridged in.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Number of daily files kept on disk
pub const MAX_LOG_FILES: usize = 7;

/// Number of lines kept in memory
pub const BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

/// Appender writing `{app_name}.{YYYY-MM-DD}.log` under `dir`, keeping the newest `max_files`
pub fn daily_appender(
    dir: impl AsRef<Path>,
    app_name: &str,
    max_files: usize,
) -> Result<RollingFileAppender, String> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(app_name)
        .filename_suffix("log")
        .max_log_files(max_files.max(1))
        .build(dir.as_ref())
        .map_err(|e| format!("Failed to open log dir: {}", e))
}

/// Circular buffer of the most recent lines
pub struct LineBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

struct Inner {
    file: RollingFileAppender,
    buffer: LineBuffer,
    partial: String,
}

/// Shared sink behind the subscriber's writer
#[derive(Clone)]
pub struct LoggerHandle {
    inner: Arc<Mutex<Inner>>,
}

impl LoggerHandle {
    pub fn new(log_dir: impl AsRef<Path>, app_name: &str) -> Result<Self, String> {
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                file: daily_appender(log_dir, app_name, MAX_LOG_FILES)?,
                buffer: LineBuffer::new(BUFFER_LINES),
                partial: String::new(),
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic mid-write leaves at worst a partial line
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn recent_lines(&self) -> Vec<String> {
        self.lock().buffer.snapshot()
    }

    fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut inner = self.lock();
        inner.partial.push_str(&String::from_utf8_lossy(buf));

        while let Some(newline) = inner.partial.find('\n') {
            let line: String = inner.partial.drain(..=newline).collect();
            let line = line.trim_end_matches(['\n', '\r']).to_string();
            writeln!(inner.file, "{}", line)?;
            inner.buffer.push(line);
        }
        Ok(())
    }
}

/// Writer handed out per event by the subscriber
pub struct LogWriter {
    handle: LoggerHandle,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.handle.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.handle.lock().file.flush()
    }
}

impl<'a> MakeWriter<'a> for LoggerHandle {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter { handle: self.clone() }
    }
}

/// Install the global logger at INFO
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    init_logger_with_level(log_dir, app_name, LevelFilter::INFO)
}

/// Install the global logger with an explicit level
pub fn init_logger_with_level(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    level: LevelFilter,
) -> Result<(), String> {
    let handle = LoggerHandle::new(log_dir, app_name)?;

    tracing_subscriber::fmt()
        .with_writer(handle.clone())
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    LOGGER
        .set(handle)
        .map_err(|_| "Logger already initialized".to_string())
}

/// Lines kept in memory, oldest first; empty before init
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|h| h.recent_lines()).unwrap_or_default()
}

fn ensure_init() -> Result<(), String> {
    LOGGER
        .get()
        .map(|_| ())
        .ok_or_else(|| "Logger not initialized".to_string())
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_init()?;
    log::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_init()?;
    log::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_init()?;
    log::error!("{}", msg);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn log_files(dir: &Path, app_name: &str) -> Vec<PathBuf> {
        let prefix = format!("{}.", app_name);
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                let name = path.file_name().unwrap().to_str().unwrap();
                name.starts_with(&prefix) && name.ends_with(".log")
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_writes_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let handle = LoggerHandle::new(dir.path(), "Menu").unwrap();
        let mut writer = handle.make_writer();
        writer.write_all(b"first\nsecond\n").unwrap();
        writer.flush().unwrap();

        let files = log_files(dir.path(), "Menu");
        assert_eq!(files.len(), 1);
        // Menu.YYYY-MM-DD.log
        let name = files[0].file_name().unwrap().to_str().unwrap().to_string();
        assert_eq!(name.len(), "Menu.".len() + 10 + ".log".len());
        assert_eq!(fs::read_to_string(&files[0]).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_appender_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs").join("menu");
        let mut appender = daily_appender(&nested, "Menu", 2).unwrap();
        writeln!(appender, "line").unwrap();
        appender.flush().unwrap();
        assert_eq!(log_files(&nested, "Menu").len(), 1);
    }

    #[test]
    fn test_buffer_is_circular() {
        let mut buffer = LineBuffer::new(2);
        buffer.push("a".into());
        buffer.push("b".into());
        buffer.push("c".into());
        assert_eq!(buffer.snapshot(), vec!["b", "c"]);
    }

    #[test]
    fn test_writer_splits_lines() {
        let dir = tempfile::tempdir().unwrap();
        let handle = LoggerHandle::new(dir.path(), "Menu").unwrap();
        let mut writer = handle.make_writer();

        writer.write_all(b"hello ").unwrap();
        assert!(handle.recent_lines().is_empty());
        writer.write_all(b"world\nnext\n").unwrap();

        assert_eq!(handle.recent_lines(), vec!["hello world", "next"]);
    }

    #[test]
    fn test_helpers_require_init() {
        if LOGGER.get().is_none() {
            assert!(info("not yet").is_err());
        }
    }
}
