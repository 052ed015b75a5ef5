use colored::Colorize;
use log::{Level, LevelFilter, Metadata, Record};

/// Logger writing every record to stderr, so stdout only carries results.
pub struct MinimalLogger;

static LOGGER: MinimalLogger = MinimalLogger;

impl MinimalLogger {
    /// Install as the global logger; later calls only change the level.
    pub fn init(level: LevelFilter) {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(level);
    }
}

impl log::Log for MinimalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_string = match record.level() {
            Level::Error => record.level().to_string().red(),
            Level::Warn => record.level().to_string().yellow(),
            Level::Info => record.level().to_string().cyan(),
            Level::Debug => record.level().to_string().purple(),
            Level::Trace => record.level().to_string().normal(),
        };

        eprintln!("{:<5} {}", level_string, record.args());
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_level_filtering() {
        MinimalLogger::init(LevelFilter::Warn);
        MinimalLogger::init(LevelFilter::Warn);

        let warn = Metadata::builder().level(Level::Warn).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(MinimalLogger.enabled(&warn));
        assert!(!MinimalLogger.enabled(&debug));
    }
}
