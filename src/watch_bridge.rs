//! Watch Bridge: событие `notify` → запись в лог → очередь для UI-треда.
//!
//! Тред watcher'а не трогает View Model. Он строит `EventRecord`,
//! дописывает его в лог и кладёт `WatchUpdate` в канал. UI-тред забирает
//! обновления в порядке поступления (`Monitor::process_pending`).

use std::path::Path;
use std::sync::mpsc;

use chrono::{Local, NaiveDateTime};
use log::{debug, warn};

use crate::error::MonitorError;
use crate::file_watcher::{self, WatchEvent, WatcherHandle};
use crate::log_store::LogStore;
use crate::record::EventRecord;

/// Одно живое событие, готовое для View Model.
#[derive(Debug)]
pub struct WatchUpdate {
    pub record: EventRecord,
    /// Ошибка записи в лог. Событие всё равно показывается (best-effort).
    pub log_error: Option<MonitorError>,
}

/// Подписаться на директорию и направлять события в `updates`.
pub fn start(
    watch_dir: &Path,
    store: LogStore,
    updates: mpsc::Sender<WatchUpdate>,
) -> Result<WatcherHandle, MonitorError> {
    file_watcher::start_watcher(watch_dir, move |event| {
        let Some(update) = handle_event(&store, &event, Local::now().naive_local()) else {
            return;
        };
        // Получатель закрыт только если сессия уже завершена.
        if updates.send(update).is_err() {
            debug!("Watch update dropped (receiver closed)");
        }
    })
}

/// Построить запись и дописать её в лог. Повторов нет.
fn handle_event(store: &LogStore, event: &WatchEvent, now: NaiveDateTime) -> Option<WatchUpdate> {
    let record = match EventRecord::from_path(now, event.kind, &event.path) {
        Ok(record) => record,
        Err(err) => {
            warn!("Cannot build EventRecord: {err}");
            return None;
        }
    };

    let log_error = match store.append(&record) {
        Ok(_) => None,
        Err(err) => {
            warn!("Log append failed, event kept in memory only: {err}");
            Some(err)
        }
    };

    Some(WatchUpdate { record, log_error })
}
