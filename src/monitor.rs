//! Контроллер: принимает действия пользователя из UI-хоста и после каждой
//! операции, меняющей состояние, отдаёт ему новый список строк.
//!
//! `Monitor` живёт в UI-треде и единолично владеет View Model. Живые
//! события приходят из треда watcher'а через канал и применяются только в
//! `process_pending`, поэтому мьютекс вокруг коллекции не нужен.
//!
//! Ни одна ошибка не фатальна: она показывается пользователю через
//! `UiBridge::report` и возвращается вызывающему.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use log::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::file_watcher::WatcherHandle;
use crate::log_store::LogStore;
use crate::notifier::Notifier;
use crate::opener::FileOpener;
use crate::ui::{Row, UiBridge, UserMessage};
use crate::view_model::{Filter, HistoricalLoad, ViewModel};
use crate::watch_bridge::{self, WatchUpdate};

pub struct Monitor {
    config: MonitorConfig,
    store: LogStore,
    view: ViewModel,
    /// Введённый или выбранный в диалоге путь, ещё не подтверждённый.
    candidate_dir: String,
    /// Подтверждённая директория для наблюдения.
    watch_dir: Option<PathBuf>,
    watcher: Option<WatcherHandle>,
    updates_tx: mpsc::Sender<WatchUpdate>,
    updates_rx: mpsc::Receiver<WatchUpdate>,
    ui: Box<dyn UiBridge>,
    notifier: Box<dyn Notifier>,
    opener: Box<dyn FileOpener>,
}

impl Monitor {
    /// Открыть хранилище логов, загрузить хвост сегодняшнего лога и
    /// отрисовать его.
    pub fn open(
        config: MonitorConfig,
        ui: Box<dyn UiBridge>,
        notifier: Box<dyn Notifier>,
        opener: Box<dyn FileOpener>,
    ) -> Result<Self, MonitorError> {
        let store = LogStore::open(&config.log_dir)?;
        let (updates_tx, updates_rx) = mpsc::channel();

        info!("Session opened, logs in {}", store.dir().display());

        let mut monitor = Self {
            config,
            store,
            view: ViewModel::new(),
            candidate_dir: String::new(),
            watch_dir: None,
            watcher: None,
            updates_tx,
            updates_rx,
            ui,
            notifier,
            opener,
        };

        // Нечитаемый лог за сегодня не мешает работе: сообщили и едем дальше.
        let _ = monitor.replay_today();
        monitor.render();
        Ok(monitor)
    }

    pub fn log_store(&self) -> &LogStore {
        &self.store
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn rows(&self) -> Vec<Row> {
        self.view.rows()
    }

    pub fn candidate_directory(&self) -> &str {
        &self.candidate_dir
    }

    pub fn watch_dir(&self) -> Option<&Path> {
        self.watch_dir.as_deref()
    }

    pub fn is_monitoring(&self) -> bool {
        self.watcher.is_some()
    }

    /// Запомнить путь из поля ввода или диалога выбора папки.
    pub fn select_directory(&mut self, path: impl Into<String>) {
        self.candidate_dir = path.into();
    }

    /// Проверить выбранный путь и сделать его директорией наблюдения.
    ///
    /// Уже запущенный watcher продолжает смотреть в старую директорию до
    /// `stop_monitoring`.
    pub fn confirm_directory(&mut self) -> Result<PathBuf, MonitorError> {
        let result = validate_directory(&self.candidate_dir);
        let dir = self.reported(result)?;

        info!("Directory confirmed: {}", dir.display());
        self.watch_dir = Some(dir.clone());
        self.ui
            .report(UserMessage::info("Sucesso", "Diretório salvo com sucesso!"));
        Ok(dir)
    }

    /// Подписаться на подтверждённую директорию.
    pub fn start_monitoring(&mut self) -> Result<PathBuf, MonitorError> {
        let result = self.try_start();
        let dir = self.reported(result)?;
        self.ui
            .report(UserMessage::info("Monitoramento", "Monitoramento iniciado!"));
        Ok(dir)
    }

    fn try_start(&mut self) -> Result<PathBuf, MonitorError> {
        if self.watcher.is_some() {
            return Err(MonitorError::WatcherAlreadyRunning);
        }
        let dir = self.watch_dir.clone().ok_or(MonitorError::NotConfigured)?;

        let handle = watch_bridge::start(&dir, self.store.clone(), self.updates_tx.clone())?;
        self.watcher = Some(handle);
        Ok(dir)
    }

    /// Отписаться. После возврата новых событий от watcher'а не будет;
    /// уже поставленные в очередь будут применены следующим `process_pending`.
    pub fn stop_monitoring(&mut self) -> Result<(), MonitorError> {
        let result = match self.watcher.take() {
            Some(handle) => handle.stop(),
            None => Err(MonitorError::WatcherNotRunning),
        };
        self.reported(result)?;
        info!("Monitoring stopped");
        Ok(())
    }

    /// Применить все события, пришедшие от watcher'а, в порядке поступления.
    ///
    /// Возвращает число применённых событий.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            let WatchUpdate { record, log_error } = update;
            if let Some(err) = log_error {
                self.ui.report(UserMessage::from_error(&err));
            }

            let body = format!("Arquivo {}: {}", record.kind().label(), record.file_name());
            debug!("Live event: {record}");
            self.view.add_record(record);
            self.render();

            if let Err(err) = self.notifier.notify(
                &self.config.notification_title,
                &body,
                self.config.notification_duration,
            ) {
                debug!("Notification dropped: {err}");
            }
            processed += 1;
        }
        processed
    }

    /// Файлы логов, которые можно предложить в диалоге выбора истории.
    pub fn historical_log_files(&mut self) -> Result<Vec<PathBuf>, MonitorError> {
        let result = self.store.list_log_files();
        self.reported(result)
    }

    /// Догрузить выбранные файлы целиком. О каждом нечитаемом файле
    /// сообщается отдельно, остальные загружаются.
    pub fn load_historical(&mut self, files: &[PathBuf]) -> HistoricalLoad {
        let result = self.view.load_historical(&self.store, files);
        for err in &result.failures {
            self.ui.report(UserMessage::from_error(err));
        }
        info!(
            "Loaded {} historical records from {} file(s)",
            result.loaded,
            files.len() - result.failures.len()
        );
        self.render();
        result
    }

    /// Перечитать хвост сегодняшнего лога (без дублей), сбросить фильтр и
    /// показать всю коллекцию.
    pub fn refresh(&mut self) -> Result<usize, MonitorError> {
        self.view.reset_filter();
        let result = self.replay_today();
        self.render();
        result
    }

    pub fn clear(&mut self) {
        self.view.clear_view();
        self.render();
    }

    /// Возвращает число показанных строк.
    pub fn apply_filter(&mut self, filter: Filter) -> usize {
        let shown = self.view.apply_filter(filter).len();
        self.render();
        shown
    }

    /// Открыть файл строки приложением по умолчанию, если он ещё существует.
    pub fn open_row(&mut self, row: &Row) -> Result<(), MonitorError> {
        let path = Path::new(&row.directory).join(&row.file_name);
        let result = if path.exists() {
            self.opener.open(&path)
        } else {
            Err(MonitorError::FileMissing(path))
        };
        self.reported(result)
    }

    fn replay_today(&mut self) -> Result<usize, MonitorError> {
        let today = self.store.today_file();
        if !today.exists() {
            return Ok(0);
        }
        let result = self
            .view
            .load_recent(&self.store, &today, self.config.recent_limit);
        self.reported(result)
    }

    fn render(&mut self) {
        let rows = self.view.rows();
        self.ui.render(&rows);
    }

    fn reported<T>(&mut self, result: Result<T, MonitorError>) -> Result<T, MonitorError> {
        if let Err(err) = &result {
            warn!("{err}");
            self.ui.report(UserMessage::from_error(err));
        }
        result
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if let Some(handle) = self.watcher.take() {
            let _ = handle.stop();
        }
    }
}

fn validate_directory(candidate: &str) -> Result<PathBuf, MonitorError> {
    let candidate = candidate.trim();
    let path = PathBuf::from(candidate);
    if candidate.is_empty() || !path.is_dir() {
        return Err(MonitorError::InvalidDirectory(path));
    }
    Ok(std::path::absolute(&path)?)
}
