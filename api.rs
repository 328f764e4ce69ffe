//! API surface для UI-хоста.
//!
//! Должен оставаться тонким слоем: только функции, которые вызывает хост
//! (кнопки, поля фильтра, двойной клик по строке). Вся логика — в `src/*`
//! модулях.
//!
//! Контракт:
//! - одна активная сессия на процесс;
//! - хост периодически вызывает [`pump_events`] из UI-треда, чтобы
//!   применить живые события watcher'а;
//! - callbacks `UiBridge` вызываются под блокировкой сессии, поэтому из них
//!   нельзя вызывать функции этого модуля.

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::logging;
use crate::monitor::Monitor;
use crate::notifier::Notifier;
use crate::opener::FileOpener;
use crate::ui::{Row, UiBridge};
use crate::view_model::Filter;
use log::warn;

static SESSION: Lazy<Mutex<Option<Monitor>>> = Lazy::new(|| Mutex::new(None));

fn with_session<T>(f: impl FnOnce(&mut Monitor) -> Result<T, MonitorError>) -> Result<T, MonitorError> {
    // Примечание: recover from poisoned mutex - если предыдущий поток паниковал,
    // мы всё равно можем безопасно продолжить работу.
    let mut guard = SESSION.lock().unwrap_or_else(PoisonError::into_inner);
    let monitor = guard.as_mut().ok_or(MonitorError::SessionNotOpen)?;
    f(monitor)
}

/// Инициализация логирования в Rust.
///
/// Можно вызвать из хоста сразу после старта.
pub fn init_logging() {
    logging::init_logging();
}

/// Открыть сессию: хранилище логов, начальная загрузка, первая отрисовка.
///
/// Если сессия уже открыта, она закрывается (watcher останавливается) и
/// заменяется новой.
pub fn open_session(
    config: MonitorConfig,
    ui: Box<dyn UiBridge>,
    notifier: Box<dyn Notifier>,
    opener: Box<dyn FileOpener>,
) -> Result<(), MonitorError> {
    logging::init_logging();

    let monitor = Monitor::open(config, ui, notifier, opener)?;
    let previous = SESSION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(monitor);
    if previous.is_some() {
        warn!("open_session called while previous session is still open; closing previous session");
    }
    // previous дропается здесь, вне блокировки.
    drop(previous);
    Ok(())
}

/// Закрыть сессию (graceful shutdown watcher'а).
pub fn close_session() {
    let previous = SESSION.lock().unwrap_or_else(PoisonError::into_inner).take();
    drop(previous);
    log::debug!("Session closed");
}

pub fn select_directory(path: String) -> Result<(), MonitorError> {
    with_session(|m| {
        m.select_directory(path);
        Ok(())
    })
}

/// Возвращает подтверждённый абсолютный путь (для отображения в UI).
pub fn confirm_directory() -> Result<String, MonitorError> {
    with_session(|m| m.confirm_directory().map(|p| p.to_string_lossy().to_string()))
}

pub fn start_monitoring() -> Result<String, MonitorError> {
    with_session(|m| m.start_monitoring().map(|p| p.to_string_lossy().to_string()))
}

pub fn stop_monitoring() -> Result<(), MonitorError> {
    with_session(Monitor::stop_monitoring)
}

/// Применить накопленные живые события. Не блокирует.
pub fn pump_events() -> Result<usize, MonitorError> {
    with_session(|m| Ok(m.process_pending()))
}

/// Список файлов логов для диалога «Carregar Logs Antigos».
pub fn historical_log_files() -> Result<Vec<String>, MonitorError> {
    with_session(|m| {
        m.historical_log_files()
            .map(|files| files.iter().map(|p| p.to_string_lossy().to_string()).collect())
    })
}

/// Возвращает число загруженных записей.
pub fn load_historical(files: Vec<String>) -> Result<usize, MonitorError> {
    let files: Vec<PathBuf> = files.into_iter().map(PathBuf::from).collect();
    with_session(|m| Ok(m.load_historical(&files).loaded))
}

pub fn refresh() -> Result<usize, MonitorError> {
    with_session(Monitor::refresh)
}

pub fn clear() -> Result<(), MonitorError> {
    with_session(|m| {
        m.clear();
        Ok(())
    })
}

pub fn apply_filter(filter: Filter) -> Result<usize, MonitorError> {
    with_session(|m| Ok(m.apply_filter(filter)))
}

/// Двойной клик по строке.
pub fn open_row(row: Row) -> Result<(), MonitorError> {
    with_session(|m| m.open_row(&row))
}
