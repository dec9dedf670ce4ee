/// Application-level errors.
///
/// Navigation and the starfield are total and never fail. Only the
/// terminal itself can: raw mode, the alternate screen, writes to stdout.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}
