use chrono::Local;
use std::sync::OnceLock;

static LOG_PREFIX: OnceLock<Option<String>> = OnceLock::new();

/// Sets the prefix used by all subsequent `log!` calls. May be called once;
/// later calls are ignored.
pub fn init_logger(prefix: Option<String>) {
    let _ = LOG_PREFIX.set(prefix);
}

pub fn log(message: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    match LOG_PREFIX.get() {
        Some(Some(prefix)) => println!("[{}][{}] {}", timestamp, prefix, message),
        _ => println!("[{}] {}", timestamp, message),
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}
