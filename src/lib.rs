//! Monitora Rust Core
//!
//! Этот crate содержит логику наблюдения за одной папкой: события
//! создания/удаления файлов, дневной append-only журнал и фильтруемую
//! таблицу последних событий. Окна, toast-уведомления и диалоги живут во
//! внешнем UI-хосте; ядро общается с ним через трейты из `ui`, `notifier`
//! и `opener`.

pub mod config;
pub mod error;
pub mod file_watcher;
pub mod log_store;
pub mod logging;
pub mod monitor;
pub mod notifier;
pub mod opener;
pub mod record;
pub mod ui;
pub mod view_model;
pub mod watch_bridge;

// API surface лежит в корне crate (`api.rs`), рядом с Cargo.toml.
// Подключаем его как модуль, чтобы он участвовал в сборке crate.
#[path = "../api.rs"]
pub mod api;

pub use api::*;
