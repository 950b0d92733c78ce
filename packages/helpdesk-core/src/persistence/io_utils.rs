//! I/O helpers for snapshot reads and writes.

use std::io::ErrorKind;

use crate::error::DeskError;

/// Maps an I/O error onto `TransientIoError` when a retry may help, `IoError` otherwise.
pub fn classify_io_error(error: std::io::Error, context: &str) -> DeskError {
    match error.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
            DeskError::TransientIoError(format!("{}: {}", context, error))
        }
        _ => DeskError::IoError(format!("{}: {}", context, error)),
    }
}

/// Runs `operation`, retrying it after transient I/O errors.
///
/// # Arguments
/// * `operation` - Fallible operation to run
/// * `max_retries` - Retries allowed after the first attempt
/// * `retry_delay_ms` - Pause before each retry
/// * `context` - Operation name used in log lines
pub fn retry_io_operation<F, T>(
    operation: F,
    max_retries: u32,
    retry_delay_ms: u64,
    context: &str,
) -> Result<T, DeskError>
where
    F: Fn() -> Result<T, DeskError>,
{
    let mut attempt = 0;
    loop {
        match operation() {
            Ok(result) => return Ok(result),
            Err(DeskError::TransientIoError(message)) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    "Transient I/O error in {} (attempt {}/{}): {}",
                    context,
                    attempt,
                    max_retries,
                    message
                );
                if retry_delay_ms > 0 {
                    std::thread::sleep(std::time::Duration::from_millis(retry_delay_ms));
                }
            }
            Err(err) => return Err(err),
        }
    }
}
