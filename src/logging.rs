/// Log setup.
///
/// The terminal belongs to the renderer, so logs go to a file named by
/// `QUESTFOLIO_LOG`. Filtering follows `RUST_LOG` (default `info`).
/// Without the variable no subscriber is installed and `tracing` macros
/// cost next to nothing.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "QUESTFOLIO_LOG";

pub fn init() {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return;
    };
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", path.to_string_lossy());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
