//! Консольный хост: та же сессия, что и у GUI, но таблица печатается в stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::error;

use monitora_rust::config::{MonitorConfig, LOG_DIR_ENV};
use monitora_rust::notifier::LogNotifier;
use monitora_rust::opener::SystemOpener;
use monitora_rust::ui::{MessageLevel, Row, RowStyle, UiBridge, UserMessage};
use monitora_rust::view_model::Filter;

/// Период, с которым применяются живые события.
const PUMP_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "monitora", about = "Watch a folder for created and deleted files")]
struct Cli {
    /// Directory to watch (non-recursive)
    #[arg(short, long)]
    dir: String,

    /// Where daily log files are written
    #[arg(long, env = LOG_DIR_ENV)]
    log_dir: Option<PathBuf>,

    /// Historical log files to load before monitoring starts
    #[arg(long, num_args = 1..)]
    history: Vec<String>,

    /// Number of recent records to load from today's log
    #[arg(long, default_value_t = 100)]
    recent: usize,

    #[arg(long, default_value = "")]
    filter_date: String,

    #[arg(long, default_value = "")]
    filter_event: String,

    #[arg(long, default_value = "")]
    filter_dir: String,

    #[arg(long, default_value = "")]
    filter_file: String,

    /// Stop after this many seconds (runs until killed otherwise)
    #[arg(long)]
    run_for: Option<u64>,
}

/// Печатает таблицу целиком при каждой перерисовке.
struct ConsoleUi;

impl UiBridge for ConsoleUi {
    fn render(&mut self, rows: &[Row]) {
        println!("{:<20} {:<11} {:<40} {}", "Data", "Evento", "Diretório", "Arquivo");
        for row in rows {
            let marker = match row.style {
                RowStyle::Highlight => '!',
                RowStyle::Normal => ' ',
            };
            println!(
                "{:<20} {:<11} {:<40} {}{marker}",
                row.timestamp, row.event, row.directory, row.file_name
            );
        }
        println!();
    }

    fn report(&mut self, message: UserMessage) {
        match message.level {
            MessageLevel::Info => println!("[{}] {}", message.title, message.text),
            MessageLevel::Warning | MessageLevel::Error => {
                eprintln!("[{}] {}", message.title, message.text)
            }
        }
    }
}

fn main() -> ExitCode {
    monitora_rust::init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), monitora_rust::error::MonitorError> {
    let mut config = match cli.log_dir {
        Some(dir) => MonitorConfig::with_log_dir(dir),
        None => MonitorConfig::from_env()?,
    };
    config.recent_limit = cli.recent;

    monitora_rust::open_session(
        config,
        Box::new(ConsoleUi),
        Box::new(LogNotifier),
        Box::new(SystemOpener),
    )?;

    if !cli.history.is_empty() {
        monitora_rust::load_historical(cli.history)?;
    }

    let filter = Filter::new(cli.filter_date, cli.filter_event, cli.filter_dir, cli.filter_file);
    if !filter.is_empty() {
        monitora_rust::apply_filter(filter)?;
    }

    monitora_rust::select_directory(cli.dir)?;
    monitora_rust::confirm_directory()?;
    monitora_rust::start_monitoring()?;

    let deadline = cli.run_for.map(|secs| Instant::now() + Duration::from_secs(secs));
    while deadline.map_or(true, |d| Instant::now() < d) {
        monitora_rust::pump_events()?;
        thread::sleep(PUMP_INTERVAL);
    }

    monitora_rust::stop_monitoring()?;
    monitora_rust::pump_events()?;
    monitora_rust::close_session();
    Ok(())
}
