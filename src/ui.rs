//! Граница с UI-хостом.
//!
//! Окна, таблицы и диалоги живут во внешнем тулките. Ядро отдаёт ему
//! упорядоченный список строк после каждой операции, меняющей состояние,
//! и сообщения для пользователя.

use crate::error::MonitorError;
use crate::record::EventRecord;
use crate::view_model::render_row_style;

/// Стиль строки таблицы.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowStyle {
    Normal,
    /// Удалённые файлы подсвечиваются.
    Highlight,
}

impl RowStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            RowStyle::Normal => "normal",
            RowStyle::Highlight => "highlight",
        }
    }
}

/// Строка для отображения: 4 колонки + тег стиля.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub timestamp: String,
    pub event: String,
    pub directory: String,
    pub file_name: String,
    pub style: RowStyle,
}

impl From<&EventRecord> for Row {
    fn from(record: &EventRecord) -> Self {
        Self {
            timestamp: record.formatted_timestamp(),
            event: record.kind().label().to_string(),
            directory: record.directory().to_string(),
            file_name: record.file_name().to_string(),
            style: render_row_style(record),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Сообщение пользователю (messagebox в UI-хосте).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserMessage {
    pub level: MessageLevel,
    pub title: String,
    pub text: String,
}

impl UserMessage {
    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            title: title.into(),
            text: text.into(),
        }
    }

    /// Ошибка записи в лог — предупреждение, остальные ошибки — ошибки.
    pub fn from_error(err: &MonitorError) -> Self {
        let (level, title) = match err {
            MonitorError::LogWrite { .. } => (MessageLevel::Warning, "Aviso"),
            _ => (MessageLevel::Error, "Erro"),
        };
        Self {
            level,
            title: title.to_string(),
            text: err.to_string(),
        }
    }
}

/// То, что должен уметь UI-хост.
///
/// Вызывается из треда, который владеет `Monitor` (UI-тред). Из этих
/// методов нельзя повторно входить в `api`: сессия в этот момент заблокирована.
pub trait UiBridge: Send {
    /// Полная перерисовка таблицы.
    fn render(&mut self, rows: &[Row]);

    fn report(&mut self, message: UserMessage);
}
