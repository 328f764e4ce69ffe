//! Event Record: каноническое представление одного изменения в папке.
//!
//! Формат строки лога (UTF-8, одна запись на строку):
//!
//! ```text
//! 19-10-2026 14:03:27 - Adicionado - /home/user/drop - a.txt
//! ```
//!
//! Разделитель полей — ровно `" - "`. Если путь сам содержит эту
//! последовательность, строка при чтении не разберётся на 4 поля и будет
//! пропущена (известное ограничение строчного формата).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDateTime, SubsecRound};

use crate::error::MonitorError;

/// Разделитель полей в строке лога.
pub const FIELD_SEPARATOR: &str = " - ";

/// Формат временной метки: `DD-MM-YYYY HH:MM:SS`, локальное время.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Тип события файловой системы.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Added,
    Deleted,
}

impl EventKind {
    /// Человекочитаемая метка, которая пишется в лог и показывается в таблице.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Added => "Adicionado",
            EventKind::Deleted => "Excluído",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Adicionado" => Some(EventKind::Added),
            "Excluído" => Some(EventKind::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Одна запись журнала. Неизменяемое значение; равенство структурное по всем
/// четырём полям.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventRecord {
    timestamp: NaiveDateTime,
    kind: EventKind,
    directory: String,
    file_name: String,
}

impl EventRecord {
    /// Метка времени обрезается до секунд, чтобы запись совпадала с тем, что
    /// будет прочитано из лога.
    pub fn new(
        timestamp: NaiveDateTime,
        kind: EventKind,
        directory: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(0),
            kind,
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    /// Построить запись из полного пути затронутого файла.
    pub fn from_path(
        timestamp: NaiveDateTime,
        kind: EventKind,
        path: &Path,
    ) -> Result<Self, MonitorError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| MonitorError::FileNameMissing(path.to_path_buf()))?
            .to_string_lossy()
            .into_owned();
        let directory = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(timestamp, kind, directory, file_name))
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Полный путь файла, к которому относится запись.
    pub fn full_path(&self) -> std::path::PathBuf {
        Path::new(&self.directory).join(&self.file_name)
    }

    /// Строка для дозаписи в лог, с завершающим `\n`.
    pub fn to_log_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.formatted_timestamp(),
            self.kind.label(),
            self.directory,
            self.file_name,
            sep = FIELD_SEPARATOR
        )
    }
}

impl FromStr for EventRecord {
    type Err = MonitorError;

    /// Разбор одной строки лога. Любое отклонение от формата (не 4 поля,
    /// неизвестная метка, нечитаемая дата) — `MalformedLogLine`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let malformed = || MonitorError::MalformedLogLine(line.to_string());

        let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let [timestamp, label, directory, file_name] = parts.as_slice() else {
            return Err(malformed());
        };

        let timestamp =
            NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT).map_err(|_| malformed())?;
        let kind = EventKind::from_label(label).ok_or_else(malformed)?;

        Ok(Self {
            timestamp,
            kind,
            directory: (*directory).to_string(),
            file_name: (*file_name).to_string(),
        })
    }
}
