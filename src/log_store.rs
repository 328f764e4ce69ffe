//! Append-only журнал событий, разбитый по календарным дням.
//!
//! Один файл на день: `<log_dir>/monitoramento_log_<DD-MM-YYYY>.txt`.
//! Записи только дописываются в конец, никогда не изменяются и не удаляются.
//! Повторов при ошибках нет: ошибка ввода-вывода возвращается вызывающему.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::debug;

use crate::error::MonitorError;
use crate::record::EventRecord;

pub const LOG_FILE_PREFIX: &str = "monitoramento_log_";
pub const LOG_FILE_EXTENSION: &str = ".txt";
const LOG_FILE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Хранилище логов в фиксированной директории.
#[derive(Clone, Debug)]
pub struct LogStore {
    dir: PathBuf,
}

impl LogStore {
    /// Открыть хранилище. Директория создаётся при отсутствии (idempotent).
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, MonitorError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Детерминированное отображение даты в путь файла лога.
    pub fn log_file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{LOG_FILE_PREFIX}{}{LOG_FILE_EXTENSION}",
            date.format(LOG_FILE_DATE_FORMAT)
        ))
    }

    /// Файл лога за сегодня (локальное время).
    pub fn today_file(&self) -> PathBuf {
        self.log_file_for(Local::now().date_naive())
    }

    /// Дописать одну строку в файл дня, к которому относится запись.
    ///
    /// Запись создаётся в момент события, поэтому это файл текущего дня.
    /// Возвращает путь файла, в который была произведена запись.
    pub fn append(&self, record: &EventRecord) -> Result<PathBuf, MonitorError> {
        let path = self.log_file_for(record.timestamp().date());
        let write_err = |source| MonitorError::LogWrite {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_err)?;
        file.write_all(record.to_log_line().as_bytes())
            .map_err(write_err)?;

        debug!("Appended to {}: {record}", path.display());
        Ok(path)
    }

    /// Последние `max_lines` строк файла, самые свежие первыми.
    ///
    /// Сначала берётся хвост из `max_lines` строк, затем отбрасываются
    /// некорректные строки, поэтому результат может быть короче `max_lines`.
    pub fn read_tail(&self, path: &Path, max_lines: usize) -> Result<Vec<EventRecord>, MonitorError> {
        let lines = read_lines(path)?;
        let start = lines.len().saturating_sub(max_lines);

        Ok(lines[start..]
            .iter()
            .rev()
            .filter_map(|line| line.parse().ok())
            .collect())
    }

    /// Все корректные записи файла в порядке файла (старые первыми).
    pub fn read_all(&self, path: &Path) -> Result<Vec<EventRecord>, MonitorError> {
        Ok(read_lines(path)?
            .iter()
            .filter_map(|line| line.parse().ok())
            .collect())
    }

    /// Файлы логов в директории хранилища, по возрастанию даты.
    ///
    /// Используется как список по умолчанию для выбора исторических файлов.
    pub fn list_log_files(&self) -> Result<Vec<PathBuf>, MonitorError> {
        let mut dated: Vec<(NaiveDate, PathBuf)> = fs::read_dir(&self.dir)
            .map_err(|source| MonitorError::LogRead {
                path: self.dir.clone(),
                source,
            })?
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                let date = date_from_file_name(path.file_name()?.to_str()?)?;
                Some((date, path))
            })
            .collect();

        dated.sort();
        Ok(dated.into_iter().map(|(_, path)| path).collect())
    }
}

/// Дата из имени `monitoramento_log_<DD-MM-YYYY>.txt`.
fn date_from_file_name(name: &str) -> Option<NaiveDate> {
    let date = name
        .strip_prefix(LOG_FILE_PREFIX)?
        .strip_suffix(LOG_FILE_EXTENSION)?;
    NaiveDate::parse_from_str(date, LOG_FILE_DATE_FORMAT).ok()
}

/// Строки файла без `\n`.
///
/// Строка, не являющаяся UTF-8, декодируется как Windows-1252: так пишут
/// текстовые файлы Windows-программы без явной кодировки, и метка
/// `Excluído` в таких логах — байт `0xED`.
fn read_lines(path: &Path) -> Result<Vec<String>, MonitorError> {
    let bytes = fs::read(path).map_err(|source| MonitorError::LogRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines: Vec<String> = bytes.split(|&b| b == b'\n').map(decode_line).collect();
    // Завершающий `\n` не порождает пустую строку, как у `str::lines`.
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    Ok(lines)
}

fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(line) => line.to_owned(),
        Err(_) => bytes.iter().map(|&b| cp1252_char(b)).collect(),
    }
}

/// Windows-1252 отличается от Latin-1 только диапазоном 0x80..=0x9F.
fn cp1252_char(byte: u8) -> char {
    const HIGH: [char; 32] = [
        '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
        '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
        '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
        '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
    ];
    match byte {
        0x80..=0x9F => HIGH[usize::from(byte - 0x80)],
        _ => char::from(byte),
    }
}
