//! Модуль мониторинга файловой системы.
//!
//! Отвечает за:
//! - проверку наблюдаемой директории
//! - запуск `notify` watcher (non-recursive)
//! - сведение событий к созданию/удалению записей (файлов и поддиректорий)
//! - graceful shutdown с гарантией, что после `stop()` callback больше не вызывается

mod events;

pub use events::WatchEvent;

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};
use notify::{
  event::{ModifyKind, RenameMode},
  EventKind as NotifyKind, RecommendedWatcher, RecursiveMode, Watcher,
};

use crate::error::MonitorError;
use crate::record::EventKind;

/// Период опроса сигнала остановки.
const TICK: Duration = Duration::from_millis(250);

/// Handle запущенного watcher'а.
pub struct WatcherHandle {
  stop_tx: mpsc::Sender<()>,
  join: Option<thread::JoinHandle<()>>,
  watch_dir: PathBuf,
}

impl WatcherHandle {
  pub fn watch_dir(&self) -> &Path {
    &self.watch_dir
  }

  /// Остановить watcher и дождаться завершения треда.
  ///
  /// `notify` watcher принадлежит треду и дропается до его завершения,
  /// поэтому после возврата из `stop()` callback уже не будет вызван.
  pub fn stop(mut self) -> Result<(), MonitorError> {
    let _ = self.stop_tx.send(());
    if let Some(join) = self.join.take() {
      if join.join().is_err() {
        error!("Watcher thread panicked");
      }
    }
    Ok(())
  }
}

/// Запустить watcher для одной директории (без поддиректорий).
///
/// `on_event`: callback, вызываемый в треде watcher'а для каждого
/// созданного или удалённого файла.
///
/// `notify` watcher создаётся до запуска треда: ошибка подписки
/// возвращается вызывающему, а не только пишется в лог.
pub fn start_watcher(
  watch_dir: &Path,
  on_event: impl Fn(WatchEvent) + Send + 'static,
) -> Result<WatcherHandle, MonitorError> {
  if !watch_dir.is_dir() {
    return Err(MonitorError::InvalidDirectory(watch_dir.to_path_buf()));
  }
  let watch_dir = watch_dir.to_path_buf();

  info!("Starting watcher for: {}", watch_dir.display());

  let (stop_tx, stop_rx) = mpsc::channel::<()>();
  let (event_tx, event_rx) = mpsc::channel::<Result<notify::Event, notify::Error>>();

  let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
    // best-effort send; если receiver уже закрыт — просто игнорируем.
    let _ = event_tx.send(res);
  })?;
  watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

  // macOS FSEvents отдаёт канонические пути (/private/var/...), поэтому
  // сравниваем родителя события с обеими формами директории.
  let scope = WatchScope {
    canonical: std::fs::canonicalize(&watch_dir).unwrap_or_else(|_| watch_dir.clone()),
    dir: watch_dir.clone(),
  };
  let join = thread::spawn(move || {
    // Держим watcher живым ровно столько, сколько живёт тред.
    let _watcher = watcher;

    loop {
      // 1) graceful shutdown
      if stop_rx.try_recv().is_ok() {
        info!("Watcher shutdown requested");
        break;
      }

      // 2) обработка событий notify
      match event_rx.recv_timeout(TICK) {
        Ok(Ok(event)) => {
          debug!("notify event: {:?}", event.kind);
          for e in classify(&scope, &event) {
            on_event(e);
          }
        }
        Ok(Err(err)) => {
          warn!("notify error: {err}");
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
          // тик
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
          warn!("notify channel disconnected");
          break;
        }
      }
    }

    info!("Watcher thread finished");
  });

  Ok(WatcherHandle {
    stop_tx,
    join: Some(join),
    watch_dir,
  })
}

/// Наблюдаемая директория в исходной и канонической форме.
struct WatchScope {
  dir: PathBuf,
  canonical: PathBuf,
}

impl WatchScope {
  fn contains_directly(&self, path: &Path) -> bool {
    path
      .parent()
      .is_some_and(|parent| parent == self.dir || parent == self.canonical)
  }
}

/// Свести событие `notify` к списку событий создания/удаления.
///
/// Поддиректории считаются так же, как файлы, в обе стороны: удалённую
/// директорию уже нельзя проверить через `is_dir`, а Windows отдаёт любое
/// удаление как `RemoveKind::Any`.
///
/// Перемещение внутрь папки — `Added`, наружу — `Deleted`. Переименование
/// внутри папки даёт пару `Deleted` + `Added`.
fn classify(scope: &WatchScope, event: &notify::Event) -> Vec<WatchEvent> {
  event
    .paths
    .iter()
    .filter(|path| scope.contains_directly(path))
    .filter_map(|path| {
      let kind = map_kind(&event.kind, path)?;
      Some(WatchEvent {
        kind,
        path: path.clone(),
      })
    })
    .collect()
}

fn map_kind(kind: &NotifyKind, path: &Path) -> Option<EventKind> {
  match kind {
    NotifyKind::Create(_) => Some(EventKind::Added),
    NotifyKind::Remove(_) => Some(EventKind::Deleted),
    NotifyKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(EventKind::Added),
    NotifyKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(EventKind::Deleted),
    // FSEvents не различает сторону переименования: смотрим, есть ли путь.
    NotifyKind::Modify(ModifyKind::Name(RenameMode::Any)) => Some(if path.exists() {
      EventKind::Added
    } else {
      EventKind::Deleted
    }),
    // `Both` дублирует уже пришедшие `From`/`To`; изменения содержимого
    // не отслеживаются.
    NotifyKind::Modify(_) => None,
    NotifyKind::Access(_) => None,
    NotifyKind::Other => None,
    NotifyKind::Any => None,
  }
}
