//! Logging to stderr.
//!
//! Only records from this crate are printed, dependencies stay silent.

use std::io::{self, Write};
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Target prefix shared by the library and the binary.
const LOG_TARGET_PREFIX: &str = "secure_fixup";

/// Install the logger and set the initial level.
pub fn initialize(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(Logger::new()))?;
    log::set_max_level(level);
    Ok(())
}

struct Logger {
    start: Instant,
}

impl Logger {
    fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level() && metadata.target().starts_with(LOG_TARGET_PREFIX)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.start.elapsed();
        let message = format!(
            "[{}.{:0>9}s] [{:<5}] [{}] {}\n",
            elapsed.as_secs(),
            elapsed.subsec_nanos(),
            record.level(),
            record.target(),
            record.args(),
        );

        let _ = io::stderr().lock().write_all(message.as_bytes());
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}
