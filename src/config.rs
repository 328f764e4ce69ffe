//! Конфигурация Monitora.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::MonitorError;

/// Переменная окружения для переопределения директории логов.
pub const LOG_DIR_ENV: &str = "MONITORA_LOG_DIR";

/// Имя директории логов внутри локальной data-директории пользователя.
pub const DEFAULT_LOG_FOLDER_NAME: &str = "Log_Monitora_Pasta";

pub const DEFAULT_RECENT_LIMIT: usize = 100;

#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Где лежат `monitoramento_log_*.txt`.
    pub log_dir: PathBuf,
    /// Сколько последних записей сегодняшнего лога грузить при старте и refresh.
    pub recent_limit: usize,
    pub notification_title: String,
    pub notification_duration: Duration,
}

impl MonitorConfig {
    pub fn with_log_dir(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            notification_title: "Monitoramento".to_string(),
            notification_duration: Duration::from_secs(10),
        }
    }

    /// `MONITORA_LOG_DIR`, иначе `<local data dir>/Log_Monitora_Pasta`.
    pub fn from_env() -> Result<Self, MonitorError> {
        let log_dir = match std::env::var_os(LOG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_log_dir()?,
        };
        Ok(Self::with_log_dir(log_dir))
    }
}

pub fn default_log_dir() -> Result<PathBuf, MonitorError> {
    let base = dirs::data_local_dir().ok_or(MonitorError::LogDirNotFound)?;
    Ok(base.join(DEFAULT_LOG_FOLDER_NAME))
}
