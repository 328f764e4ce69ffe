//! Открытие файла приложением по умолчанию.

use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use crate::error::MonitorError;

pub trait FileOpener: Send {
    fn open(&self, path: &Path) -> Result<(), MonitorError>;
}

/// Системный обработчик: `xdg-open` / `open` / `cmd /C start`.
///
/// Процесс запускается без ожидания завершения.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemOpener;

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> Result<(), MonitorError> {
        let mut cmd = system_command(path);
        debug!("Opening {} with {:?}", path.display(), cmd.get_program());

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MonitorError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        // Забираем статус в фоне, чтобы не оставлять зомби.
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

#[cfg(target_os = "windows")]
fn system_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    // Пустой заголовок окна: иначе путь в кавычках станет заголовком.
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(target_os = "macos")]
fn system_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn system_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}
