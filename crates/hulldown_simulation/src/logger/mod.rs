//! Pluggable simulation logger.
//!
//! The simulation never prints through engine APIs directly. A host embedding
//! the crate installs its own [`LogPrinter`] (routing to the engine console);
//! headless runs fall back to stdout via [`init_logger`].

use once_cell::sync::Lazy;
use std::sync::Mutex;

static PRINTER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));
static MIN_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

/// Sink for simulation log lines. Implemented by the host glue layer.
pub trait LogPrinter: Send + Sync {
    fn print(&self, level: LogLevel, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Replace the active printer.
pub fn set_printer(printer: Box<dyn LogPrinter>) {
    *PRINTER.lock().unwrap() = Some(printer);
}

/// Install a printer only if none was configured yet (idempotent init).
pub fn set_printer_if_needed(printer: Box<dyn LogPrinter>) {
    let mut guard = PRINTER.lock().unwrap();
    if guard.is_none() {
        *guard = Some(printer);
    }
}

/// Lines below this level are dropped before reaching the printer.
pub fn set_min_level(level: LogLevel) {
    *MIN_LEVEL.lock().unwrap() = level;
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    if level < *MIN_LEVEL.lock().unwrap() {
        return;
    }
    // Timestamp is added here, not in the printer, so every sink formats alike.
    if let Some(printer) = PRINTER.lock().unwrap().as_ref() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        printer.print(level, &format!("[{}] {}", timestamp, message));
    }
}

/// Stdout printer for headless runs and tests.
pub struct ConsolePrinter;

impl LogPrinter for ConsolePrinter {
    fn print(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_logger() {
    set_printer_if_needed(Box::new(ConsolePrinter));
}
