//! Интеграционные тесты контроллера: от события в папке до строки в таблице.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use monitora_rust::config::MonitorConfig;
use monitora_rust::error::MonitorError;
use monitora_rust::monitor::Monitor;
use monitora_rust::notifier::Notifier;
use monitora_rust::opener::FileOpener;
use monitora_rust::record::{EventKind, EventRecord};
use monitora_rust::ui::{MessageLevel, Row, RowStyle, UiBridge, UserMessage};
use monitora_rust::view_model::Filter;

/// Всё, что ядро отдало хосту.
#[derive(Default)]
struct HostLog {
    renders: Vec<Vec<Row>>,
    messages: Vec<UserMessage>,
    notifications: Vec<String>,
    opened: Vec<PathBuf>,
}

#[derive(Clone, Default)]
struct FakeHost {
    log: Arc<Mutex<HostLog>>,
}

impl FakeHost {
    fn last_rows(&self) -> Vec<Row> {
        self.log.lock().unwrap().renders.last().cloned().unwrap_or_default()
    }

    fn render_count(&self) -> usize {
        self.log.lock().unwrap().renders.len()
    }

    fn messages(&self) -> Vec<UserMessage> {
        self.log.lock().unwrap().messages.clone()
    }

    fn notifications(&self) -> Vec<String> {
        self.log.lock().unwrap().notifications.clone()
    }

    fn opened(&self) -> Vec<PathBuf> {
        self.log.lock().unwrap().opened.clone()
    }
}

impl UiBridge for FakeHost {
    fn render(&mut self, rows: &[Row]) {
        self.log.lock().unwrap().renders.push(rows.to_vec());
    }

    fn report(&mut self, message: UserMessage) {
        self.log.lock().unwrap().messages.push(message);
    }
}

impl Notifier for FakeHost {
    fn notify(&self, title: &str, body: &str, _duration: Duration) -> Result<(), MonitorError> {
        self.log.lock().unwrap().notifications.push(format!("{title}|{body}"));
        // Ошибка уведомления не должна ничего ломать.
        Err(MonitorError::Notification("toast service unavailable".to_string()))
    }
}

impl FileOpener for FakeHost {
    fn open(&self, path: &Path) -> Result<(), MonitorError> {
        self.log.lock().unwrap().opened.push(path.to_path_buf());
        Ok(())
    }
}

struct Fixture {
    _temp: TempDir,
    watched: PathBuf,
    logs: PathBuf,
    host: FakeHost,
    monitor: Monitor,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let watched = temp.path().join("drop");
    let logs = temp.path().join("logs");
    fs::create_dir(&watched).unwrap();

    let host = FakeHost::default();
    let monitor = Monitor::open(
        MonitorConfig::with_log_dir(&logs),
        Box::new(host.clone()),
        Box::new(host.clone()),
        Box::new(host.clone()),
    )
    .expect("Failed to open monitor");

    Fixture {
        _temp: temp,
        watched,
        logs,
        host,
        monitor,
    }
}

/// Крутит `process_pending`, пока не наберётся `min` событий.
fn pump_until(monitor: &mut Monitor, min: usize, timeout: Duration) -> usize {
    let start = Instant::now();
    let mut total = 0;
    while start.elapsed() < timeout {
        total += monitor.process_pending();
        if total >= min {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }
    total
}

fn same_dir(a: &str, b: &Path) -> bool {
    fs::canonicalize(a).unwrap() == fs::canonicalize(b).unwrap()
}

#[test]
fn test_created_file_is_logged_and_shown_once() {
    let mut fx = fixture();
    fx.monitor.select_directory(fx.watched.to_string_lossy());
    fx.monitor.confirm_directory().unwrap();
    fx.monitor.start_monitoring().unwrap();
    thread::sleep(Duration::from_millis(200));

    File::create(fx.watched.join("a.txt")).unwrap();

    assert_eq!(pump_until(&mut fx.monitor, 1, Duration::from_secs(5)), 1);
    thread::sleep(Duration::from_millis(300));
    assert_eq!(fx.monitor.process_pending(), 0);

    // View Model
    let records = fx.monitor.view().records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.kind(), EventKind::Added);
    assert_eq!(record.file_name(), "a.txt");
    assert!(same_dir(record.directory(), &fx.watched));

    // Log Store: ровно одна строка в сегодняшнем файле
    let today = fx.monitor.log_store().today_file();
    assert!(today.starts_with(&fx.logs));
    let content = fs::read_to_string(&today).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert_eq!(content.parse::<EventRecord>().unwrap(), *record);

    // UI + уведомление
    let rows = fx.host.last_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event, "Adicionado");
    assert_eq!(rows[0].style, RowStyle::Normal);
    assert_eq!(fx.host.notifications(), vec!["Monitoramento|Arquivo Adicionado: a.txt".to_string()]);

    fx.monitor.stop_monitoring().unwrap();
}

#[test]
fn test_deleted_file_row_is_highlighted() {
    let mut fx = fixture();
    let doomed = fx.watched.join("b.txt");
    File::create(&doomed).unwrap();

    fx.monitor.select_directory(fx.watched.to_string_lossy());
    fx.monitor.confirm_directory().unwrap();
    fx.monitor.start_monitoring().unwrap();
    thread::sleep(Duration::from_millis(200));

    fs::remove_file(&doomed).unwrap();
    assert_eq!(pump_until(&mut fx.monitor, 1, Duration::from_secs(5)), 1);

    let rows = fx.host.last_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event, "Excluído");
    assert_eq!(rows[0].style, RowStyle::Highlight);
}

#[test]
fn test_log_write_failure_warns_and_still_shows_event() {
    let mut fx = fixture();
    // Директория на месте сегодняшнего лога: дозапись невозможна.
    fs::create_dir(fx.monitor.log_store().today_file()).unwrap();

    fx.monitor.select_directory(fx.watched.to_string_lossy());
    fx.monitor.confirm_directory().unwrap();
    fx.monitor.start_monitoring().unwrap();
    thread::sleep(Duration::from_millis(200));

    File::create(fx.watched.join("unlogged.txt")).unwrap();
    assert_eq!(pump_until(&mut fx.monitor, 1, Duration::from_secs(5)), 1);

    let warnings: Vec<_> = fx
        .host
        .messages()
        .into_iter()
        .filter(|m| m.level == MessageLevel::Warning)
        .collect();
    assert_eq!(warnings.len(), 1, "Expected one warning, got {:?}", warnings);
    assert_eq!(warnings[0].title, "Aviso");

    let rows = fx.host.last_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].file_name, "unlogged.txt");
    assert_eq!(fx.host.notifications().len(), 1);
    assert_eq!(fx.monitor.view().len(), 1);

    fx.monitor.stop_monitoring().unwrap();
}

#[test]
fn test_refresh_does_not_duplicate_live_events() {
    let mut fx = fixture();
    fx.monitor.select_directory(fx.watched.to_string_lossy());
    fx.monitor.confirm_directory().unwrap();
    fx.monitor.start_monitoring().unwrap();
    thread::sleep(Duration::from_millis(200));

    File::create(fx.watched.join("c.txt")).unwrap();
    assert_eq!(pump_until(&mut fx.monitor, 1, Duration::from_secs(5)), 1);

    assert_eq!(fx.monitor.refresh().unwrap(), 0);
    assert_eq!(fx.monitor.refresh().unwrap(), 0);
    assert_eq!(fx.monitor.view().len(), 1);
    assert_eq!(fx.host.last_rows().len(), 1);
}

#[test]
fn test_start_without_confirmed_directory_is_not_configured() {
    let mut fx = fixture();
    let err = fx.monitor.start_monitoring().unwrap_err();
    assert!(matches!(err, MonitorError::NotConfigured));
    assert!(!fx.monitor.is_monitoring());

    let messages = fx.host.messages();
    assert_eq!(messages.last().unwrap().level, MessageLevel::Error);
}

#[test]
fn test_confirm_rejects_invalid_directory() {
    let mut fx = fixture();

    fx.monitor.select_directory(fx.watched.join("missing").to_string_lossy());
    assert!(matches!(fx.monitor.confirm_directory(), Err(MonitorError::InvalidDirectory(_))));

    fx.monitor.select_directory("   ");
    assert!(matches!(fx.monitor.confirm_directory(), Err(MonitorError::InvalidDirectory(_))));

    assert!(fx.monitor.watch_dir().is_none());
    // Неподтверждённая директория не даёт запустить мониторинг.
    assert!(matches!(fx.monitor.start_monitoring(), Err(MonitorError::NotConfigured)));
}

#[test]
fn test_start_twice_is_rejected_and_restart_after_stop_works() {
    let mut fx = fixture();
    fx.monitor.select_directory(fx.watched.to_string_lossy());
    fx.monitor.confirm_directory().unwrap();

    fx.monitor.start_monitoring().unwrap();
    assert!(matches!(fx.monitor.start_monitoring(), Err(MonitorError::WatcherAlreadyRunning)));

    fx.monitor.stop_monitoring().unwrap();
    assert!(matches!(fx.monitor.stop_monitoring(), Err(MonitorError::WatcherNotRunning)));

    fx.monitor.start_monitoring().unwrap();
    thread::sleep(Duration::from_millis(200));
    File::create(fx.watched.join("d.txt")).unwrap();

    // Один callback на событие, несмотря на повторные старты.
    assert_eq!(pump_until(&mut fx.monitor, 1, Duration::from_secs(5)), 1);
    thread::sleep(Duration::from_millis(300));
    assert_eq!(fx.monitor.process_pending(), 0);
    assert_eq!(fx.monitor.view().len(), 1);
}

#[test]
fn test_startup_replays_today_log_newest_first() {
    let temp = TempDir::new().unwrap();
    let logs = temp.path().join("logs");
    fs::create_dir(&logs).unwrap();

    let now = chrono::Local::now().naive_local();
    let records: Vec<EventRecord> = (0..150)
        .map(|i| EventRecord::new(now, EventKind::Added, "/d", format!("f{i}")))
        .collect();
    let today = monitora_rust::log_store::LogStore::open(&logs).unwrap().today_file();
    let content: String = records.iter().map(EventRecord::to_log_line).collect();
    fs::write(&today, content).unwrap();

    let host = FakeHost::default();
    let monitor = Monitor::open(
        MonitorConfig::with_log_dir(&logs),
        Box::new(host.clone()),
        Box::new(host.clone()),
        Box::new(host.clone()),
    )
    .unwrap();

    assert_eq!(monitor.view().len(), 100);
    let rows = host.last_rows();
    assert_eq!(rows.len(), 100);
    assert_eq!(rows[0].file_name, "f149");
    assert_eq!(rows[99].file_name, "f50");
}

#[test]
fn test_historical_load_filter_and_clear() {
    let mut fx = fixture();
    let old = fx.logs.join("monitoramento_log_01-01-2024.txt");
    let other = fx.logs.join("monitoramento_log_02-01-2024.txt");
    let shared = "01-01-2024 10:00:00 - Excluído - /srv/drop - shared.txt\n";
    fs::write(&old, format!("01-01-2024 09:00:00 - Adicionado - /srv/drop - Invoice.PDF\n{shared}")).unwrap();
    fs::write(&other, shared).unwrap();

    assert_eq!(fx.monitor.historical_log_files().unwrap(), vec![old.clone(), other.clone()]);

    let result = fx.monitor.load_historical(&[old, fx.logs.join("gone.txt"), other]);
    assert_eq!(result.loaded, 3);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(fx.host.last_rows().len(), 3);
    assert!(fx
        .host
        .messages()
        .iter()
        .any(|m| m.level == MessageLevel::Error && m.text.contains("gone.txt")));

    assert_eq!(fx.monitor.apply_filter(Filter::new("", "", "", "invoice")), 1);
    assert_eq!(fx.host.last_rows()[0].file_name, "Invoice.PDF");

    fx.monitor.clear();
    assert!(fx.host.last_rows().is_empty());
    assert_eq!(fx.monitor.view().len(), 3);

    assert_eq!(fx.monitor.apply_filter(Filter::new("", "excluído", "", "")), 2);
    assert_eq!(fx.host.last_rows().len(), 2);
}

#[test]
fn test_open_row_checks_existence() {
    let mut fx = fixture();
    let present = fx.watched.join("here.txt");
    File::create(&present).unwrap();

    let row = |name: &str| Row {
        timestamp: "01-01-2024 00:00:00".to_string(),
        event: "Adicionado".to_string(),
        directory: fx.watched.to_string_lossy().to_string(),
        file_name: name.to_string(),
        style: RowStyle::Normal,
    };

    fx.monitor.open_row(&row("here.txt")).unwrap();
    assert_eq!(fx.host.opened(), vec![present]);

    let err = fx.monitor.open_row(&row("gone.txt")).unwrap_err();
    assert!(matches!(err, MonitorError::FileMissing(_)));
    assert_eq!(fx.host.opened().len(), 1);
}

#[test]
fn test_every_state_change_renders() {
    let mut fx = fixture();
    let before = fx.host.render_count();
    fx.monitor.clear();
    fx.monitor.apply_filter(Filter::default());
    fx.monitor.refresh().unwrap();
    fx.monitor.load_historical(&[]);
    assert_eq!(fx.host.render_count(), before + 4);
}
