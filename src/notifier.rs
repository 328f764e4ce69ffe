//! Десктоп-уведомления (fire-and-forget).

use std::time::Duration;

use log::info;

use crate::error::MonitorError;

/// Внешний сервис уведомлений. Не должен блокировать вызывающего дольше,
/// чем нужно на отправку запроса. Ошибки вызывающий игнорирует.
pub trait Notifier: Send {
    fn notify(&self, title: &str, body: &str, duration: Duration) -> Result<(), MonitorError>;
}

/// Уведомления в диагностический лог: для headless-запуска и хостов без
/// системных toast'ов.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str, duration: Duration) -> Result<(), MonitorError> {
        info!(target: "monitora_rust::notification", "{title}: {body} ({}s)", duration.as_secs());
        Ok(())
    }
}
