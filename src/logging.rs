//! Нормализованное диагностическое логирование для Monitora Rust Core.
//!
//! Не путать с журналом событий (`log_store`): здесь пишется то, что
//! происходит внутри ядра, а не изменения в наблюдаемой папке.
//!
//! ## Уровни логов
//! - `ERROR`: сбои, после которых операция не выполнена
//! - `WARN`:  восстановленные ошибки (запись в лог, уведомление, чтение файла)
//! - `INFO`:  жизненный цикл (сессия, старт/стоп watcher'а, выбор директории)
//! - `DEBUG`: отдельные события и записи
//! - `TRACE`: максимально детальный вывод
//!
//! ## Использование
//! ```ignore
//! use monitora_rust::logging::init_logging;
//!
//! init_logging(); // можно вызывать сколько угодно раз
//! log::info!("Starting watcher");
//! ```

use std::io::Write;
use std::sync::Once;

use log::{Level, LevelFilter};

static INIT: Once = Once::new();

/// Инициализировать логирование (idempotent).
///
/// Управление уровнем логов: переменная окружения `RUST_LOG`.
/// Примеры:
/// - `RUST_LOG=info` — только INFO и выше
/// - `RUST_LOG=monitora_rust=debug` — DEBUG для нашего crate
/// - `RUST_LOG=trace` — максимально детальный вывод
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::new()
            .format(|buf, record| {
                let level = match record.level() {
                    Level::Error => "E",
                    Level::Warn => "W",
                    Level::Info => "I",
                    Level::Debug => "D",
                    Level::Trace => "T",
                };

                // Формат: [timestamp] [LEVEL] [target] message
                writeln!(
                    buf,
                    "[{}] [{}] [{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    level,
                    record.target(),
                    record.args()
                )
            })
            .filter_module("monitora_rust", LevelFilter::Info)
            .filter_module("monitora", LevelFilter::Info)
            .filter_module("notify", LevelFilter::Warn)
            // RUST_LOG применяется последним и перекрывает дефолты.
            .parse_env("RUST_LOG")
            .try_init();
    });
}
