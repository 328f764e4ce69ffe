//! View Model: упорядоченная коллекция всех известных записей.
//!
//! Источники записей:
//! - `load_recent` — хвост лога за сегодня, с дедупликацией;
//! - `load_historical` — выбранные пользователем файлы, без дедупликации;
//! - `add_record` — живые события watcher'а, без дедупликации.
//!
//! `clear_view` очищает только то, что сейчас отрисовано. Коллекция
//! остаётся целой, и следующий фильтр или refresh работают с ней.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::MonitorError;
use crate::log_store::LogStore;
use crate::record::{EventKind, EventRecord};
use crate::ui::{Row, RowStyle};

/// Четыре независимых фильтра по подстроке, без учёта регистра.
/// Пустой фильтр совпадает со всем.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub timestamp: String,
    pub event: String,
    pub directory: String,
    pub file_name: String,
}

impl Filter {
    pub fn new(
        timestamp: impl Into<String>,
        event: impl Into<String>,
        directory: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            event: event.into(),
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        [&self.timestamp, &self.event, &self.directory, &self.file_name]
            .iter()
            .all(|f| f.trim().is_empty())
    }

    pub fn matches(&self, record: &EventRecord) -> bool {
        contains_ci(&record.formatted_timestamp(), &self.timestamp)
            && contains_ci(record.kind().label(), &self.event)
            && contains_ci(record.directory(), &self.directory)
            && contains_ci(record.file_name(), &self.file_name)
    }
}

fn contains_ci(field: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || field.to_lowercase().contains(&needle.to_lowercase())
}

/// Итог загрузки исторических файлов: файлы с ошибкой чтения пропущены,
/// остальные загружены.
#[derive(Debug, Default)]
pub struct HistoricalLoad {
    pub loaded: usize,
    pub failures: Vec<MonitorError>,
}

/// Тег стиля строки: подсветка для удалённых файлов.
pub fn render_row_style(record: &EventRecord) -> RowStyle {
    match record.kind() {
        EventKind::Deleted => RowStyle::Highlight,
        EventKind::Added => RowStyle::Normal,
    }
}

#[derive(Debug, Default)]
pub struct ViewModel {
    records: Vec<EventRecord>,
    /// Всё, что есть в `records`; нужен только для дедупликации `load_recent`.
    seen: HashSet<EventRecord>,
    filter: Filter,
    cleared: bool,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Вся коллекция в порядке вставки.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn active_filter(&self) -> &Filter {
        &self.filter
    }

    /// Живое событие: всегда новое, добавляется безусловно.
    pub fn add_record(&mut self, record: EventRecord) {
        self.push(record);
        self.cleared = false;
    }

    /// Хвост файла (до `max` записей), новые первыми. Запись, уже
    /// присутствующая в коллекции, повторно не добавляется.
    ///
    /// Возвращает число добавленных записей.
    pub fn load_recent(&mut self, store: &LogStore, log_file: &Path, max: usize) -> Result<usize, MonitorError> {
        let mut added = 0;
        for record in store.read_tail(log_file, max)? {
            if !self.seen.contains(&record) {
                self.push(record);
                added += 1;
            }
        }
        self.cleared = false;
        Ok(added)
    }

    /// Все записи выбранных файлов, файл за файлом, в порядке файла.
    ///
    /// Дедупликации здесь нет: одинаковая запись из двух файлов попадёт в
    /// коллекцию дважды. Нечитаемый файл пропускается, остальные грузятся.
    pub fn load_historical(&mut self, store: &LogStore, files: &[PathBuf]) -> HistoricalLoad {
        let mut result = HistoricalLoad::default();
        for file in files {
            match store.read_all(file) {
                Ok(records) => {
                    result.loaded += records.len();
                    for record in records {
                        self.push(record);
                    }
                }
                Err(err) => {
                    log::warn!("Skipping historical log {}: {err}", file.display());
                    result.failures.push(err);
                }
            }
        }
        self.cleared = false;
        result
    }

    /// Подпоследовательность коллекции, подходящая под фильтр.
    pub fn filtered(&self, filter: &Filter) -> Vec<&EventRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Сделать фильтр активным и вернуть отфильтрованные записи.
    pub fn apply_filter(&mut self, filter: Filter) -> Vec<EventRecord> {
        self.filter = filter;
        self.cleared = false;
        self.filtered(&self.filter).into_iter().cloned().collect()
    }

    pub fn reset_filter(&mut self) {
        self.filter = Filter::default();
        self.cleared = false;
    }

    /// Очистить только отрисовку; коллекция и логи не трогаются.
    pub fn clear_view(&mut self) {
        self.cleared = true;
    }

    /// Текущий снимок для отрисовки.
    pub fn rows(&self) -> Vec<Row> {
        if self.cleared {
            return Vec::new();
        }
        self.filtered(&self.filter).into_iter().map(Row::from).collect()
    }

    fn push(&mut self, record: EventRecord) {
        self.seen.insert(record.clone());
        self.records.push(record);
    }
}
