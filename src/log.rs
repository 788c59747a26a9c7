//! Simple file-based logging
//!
//! Nothing is written until [`init`] has opened a log file, so library users
//! and tests that never call it stay silent.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

static LOG_FILE: Mutex<Option<File>> = parking_lot::const_mutex(None);

/// Get the directory where the executable is located
pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .unwrap_or_else(|_| PathBuf::from("backdrop.exe"))
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default log location: `backdrop.log` next to the executable
pub fn default_log_path() -> PathBuf {
    exe_dir().join("backdrop.log")
}

/// Initialize logging to the given file, truncating it
pub fn init(path: &Path) {
    if let Ok(file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        *LOG_FILE.lock() = Some(file);
    }

    log("=== Backdrop Log Started ===");
}

/// Whether a log file is currently open
pub fn is_enabled() -> bool {
    LOG_FILE.lock().is_some()
}

/// Log a message to the file
pub fn log(msg: &str) {
    let mut guard = LOG_FILE.lock();
    if let Some(ref mut file) = *guard {
        let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] {}", ts, msg);
        let _ = file.flush();
    }
}

/// Log a formatted message
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::log::log(&format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_after_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backdrop.log");

        init(&path);
        assert!(is_enabled());
        crate::log!("surface {} ready", 7);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("=== Backdrop Log Started ==="));
        assert!(contents.contains("surface 7 ready"));
    }
}
