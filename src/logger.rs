use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::errors::SimulationError;

/// Environment variable holding the log level for the console logger.
pub const LOG_LEVEL_VAR: &str = "HAB_SIM_LOG";

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Colour-tagged, timestamped `log` backend writing to stdout.
pub struct ConsoleLogger;

impl ConsoleLogger {
    fn tag(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m[ERROR]",
            Level::Warn => "\x1b[35m[WARN] ",
            Level::Info => "\x1b[32m[INFO] ",
            Level::Debug => "\x1b[33m[DEBUG]",
            Level::Trace => "\x1b[36m[TRACE]",
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!(
                "{}[{}]\x1b[0m {}",
                Self::tag(record.level()),
                Utc::now().format("%H:%M:%S"),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Parses a level name, falling back to `Info` for anything unrecognised.
pub fn parse_level(name: Option<&str>) -> LevelFilter {
    name.and_then(|name| name.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Installs [`ConsoleLogger`] with the level from [`LOG_LEVEL_VAR`].
///
/// Fails if a logger is already installed for this process.
pub fn init() -> Result<(), SimulationError> {
    let level = parse_level(std::env::var(LOG_LEVEL_VAR).ok().as_deref());
    log::set_logger(&LOGGER).map_err(|e| SimulationError::LoggerError(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}
