//! Внутренние типы событий file_watcher.
//!
//! Это «сырые» события от `notify`, уже отфильтрованные до файлов,
//! лежащих непосредственно в наблюдаемой директории. Преобразование в
//! `EventRecord` происходит в `watch_bridge`.

use std::path::PathBuf;

use crate::record::EventKind;

/// Внутреннее событие: файл создан или удалён.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchEvent {
    /// Added или Deleted.
    pub kind: EventKind,
    /// Полный путь к файлу.
    pub path: PathBuf,
}
