use crate::config::Config;
use crate::error::{Result, WatchError};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Directives for the log file: our own DEBUG events, INFO from dependencies
pub const FILE_DIRECTIVES: &str = "property_watch=debug,info";

/// Size-bounded log file settings
#[derive(Debug, Clone)]
pub struct LogFile {
    pub path: PathBuf,
    pub max_bytes: u64,
    pub backups: usize,
}

impl LogFile {
    pub fn from_config(config: &Config) -> Self {
        Self {
            path: config.log_path.clone(),
            max_bytes: config.log_max_bytes,
            backups: config.log_backups,
        }
    }
}

/// Appending file writer that rolls over to `<path>.1 .. <path>.<backups>`
/// once the next write would exceed `max_bytes`.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    pub fn open(settings: &LogFile) -> io::Result<Self> {
        if let Some(parent) = settings.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = open_append(&settings.path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path: settings.path.clone(),
            max_bytes: settings.max_bytes,
            backups: settings.backups,
            file,
            written,
        })
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backups == 0 {
            self.file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
        } else {
            for n in (1..self.backups).rev() {
                let from = self.backup_path(n);
                if from.exists() {
                    std::fs::rename(&from, self.backup_path(n + 1))?;
                }
            }
            std::fs::rename(&self.path, self.backup_path(1))?;
            self.file = open_append(&self.path)?;
        }
        self.written = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn file_filter() -> EnvFilter {
    EnvFilter::new(FILE_DIRECTIVES)
}

/// Console output filtered by `RUST_LOG` (default `info`), plus a rotating
/// plain-text copy when `log_file` is given.
pub fn init(log_file: Option<&LogFile>) -> Result<()> {
    let console = fmt::layer().with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );

    let file = match log_file {
        Some(settings) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(RotatingFile::open(settings)?))
                .with_filter(file_filter()),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| WatchError::Config(format!("failed to install logger: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn settings(dir: &Path, max_bytes: u64, backups: usize) -> LogFile {
        LogFile {
            path: dir.join("log").join("property.log"),
            max_bytes,
            backups,
        }
    }

    #[test]
    fn rolls_over_and_keeps_bounded_backups() {
        let dir = tempdir().unwrap();
        let settings = settings(dir.path(), 10, 2);
        let mut file = RotatingFile::open(&settings).unwrap();

        for line in ["first-000\n", "second-00\n", "third-000\n", "fourth-00\n"] {
            file.write_all(line.as_bytes()).unwrap();
        }
        file.flush().unwrap();

        let read = |p: &Path| std::fs::read_to_string(p).unwrap();
        let log = settings.path.clone();
        assert_eq!(read(&log), "fourth-00\n");
        assert_eq!(read(&file.backup_path(1)), "third-000\n");
        assert_eq!(read(&file.backup_path(2)), "second-00\n");
        assert!(!file.backup_path(3).exists());
    }

    #[test]
    fn reopening_counts_existing_size() {
        let dir = tempdir().unwrap();
        let settings = settings(dir.path(), 16, 1);
        std::fs::create_dir_all(settings.path.parent().unwrap()).unwrap();
        std::fs::write(&settings.path, "0123456789\n").unwrap();

        let mut file = RotatingFile::open(&settings).unwrap();
        file.write_all(b"abcdefghij\n").unwrap();
        file.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&settings.path).unwrap(), "abcdefghij\n");
        assert_eq!(
            std::fs::read_to_string(file.backup_path(1)).unwrap(),
            "0123456789\n"
        );
    }

    #[test]
    fn file_layer_drops_dependency_debug_events() {
        let dir = tempdir().unwrap();
        let settings = settings(dir.path(), 100_000, 10);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(RotatingFile::open(&settings).unwrap()))
            .with_filter(file_filter());
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "reqwest::connect", "starting new connection");
            tracing::debug!(target: "hyper::proto::h1::io", "flushed 185 bytes");
            tracing::info!(target: "hyper::client", "connection closed");
            tracing::debug!("fetched results page");
        });

        let log = std::fs::read_to_string(&settings.path).unwrap();
        assert!(!log.contains("starting new connection"));
        assert!(!log.contains("flushed 185 bytes"));
        assert!(log.contains("connection closed"));
        assert!(log.contains("fetched results page"));
    }
}
