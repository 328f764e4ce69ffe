use std::path::PathBuf;

/// Единый тип ошибок Monitora Rust Core.
///
/// Ни одна ошибка не фатальна для процесса: все они перехватываются на
/// границе операции (`Monitor`) и показываются пользователю либо молча
/// пропускаются (`MalformedLogLine`).
#[derive(thiserror::Error, Debug)]
pub enum MonitorError {
  #[error("Local data directory is not available on this OS/user")]
  LogDirNotFound,

  #[error("Invalid directory: {0:?}")]
  InvalidDirectory(PathBuf),

  #[error("No directory has been confirmed for monitoring")]
  NotConfigured,

  #[error("Watcher is already running")]
  WatcherAlreadyRunning,

  #[error("Watcher is not running")]
  WatcherNotRunning,

  #[error("Session is not open")]
  SessionNotOpen,

  #[error("Cannot append to log file {path:?}: {source}")]
  LogWrite {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Cannot read log file {path:?}: {source}")]
  LogRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Malformed log line: {0:?}")]
  MalformedLogLine(String),

  #[error("File no longer exists: {0:?}")]
  FileMissing(PathBuf),

  #[error("Cannot open {path:?}: {reason}")]
  OpenFailed { path: PathBuf, reason: String },

  #[error("Notification failed: {0}")]
  Notification(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Notify error: {0}")]
  Notify(#[from] notify::Error),

  #[error("Cannot determine file name for path: {0:?}")]
  FileNameMissing(PathBuf),
}
