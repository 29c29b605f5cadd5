//! Named loggers.
//!
//! Each component asks [`get_logger`] for a logger by name. Loggers carry
//! their own threshold on top of whatever filter the installed subscriber
//! applies, and forward enabled messages as `tracing` events with the
//! target [`LOG_TARGET`] and a `logger` field holding the logger name.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::level::Level;

/// Target of every event emitted through a [`NamedLogger`]
pub const LOG_TARGET: &str = "cascade";

static LOGGERS: Lazy<DashMap<String, Arc<NamedLogger>>> = Lazy::new(DashMap::new);

/// A leveled logger
pub trait Logger: Send + Sync {
    /// Name the logger was registered under
    fn name(&self) -> &str;

    /// Current threshold
    fn level(&self) -> Level;

    /// Change the threshold
    fn set_log_level(&self, level: Level);

    /// Emit `message` at `level` when the threshold allows it
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    fn debug_enabled(&self) -> bool {
        self.level() <= Level::Debug
    }

    fn info_enabled(&self) -> bool {
        self.level() <= Level::Info
    }

    fn warn_enabled(&self) -> bool {
        self.level() <= Level::Warn
    }

    fn error_enabled(&self) -> bool {
        self.level() <= Level::Error
    }
}

/// Logger forwarding to `tracing`
#[derive(Debug)]
pub struct NamedLogger {
    name: String,
    level: AtomicU8,
}

impl NamedLogger {
    /// Create an unregistered logger at level `Info`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: AtomicU8::new(Level::Info as u8),
        }
    }
}

impl Logger for NamedLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    fn set_log_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    fn log(&self, level: Level, message: &str) {
        if level < self.level() {
            return;
        }

        let logger = self.name.as_str();
        match level {
            Level::Debug => tracing::debug!(target: LOG_TARGET, logger, "{}", message),
            Level::Info => tracing::info!(target: LOG_TARGET, logger, "{}", message),
            Level::Warn => tracing::warn!(target: LOG_TARGET, logger, "{}", message),
            Level::Error => tracing::error!(target: LOG_TARGET, logger, "{}", message),
        }
    }
}

/// Fetch the logger registered under `name`, creating it on first use
pub fn get_logger(name: &str) -> Arc<NamedLogger> {
    if let Some(logger) = LOGGERS.get(name) {
        return Arc::clone(logger.value());
    }

    LOGGERS
        .entry(name.to_string())
        .or_insert_with(|| Arc::new(NamedLogger::new(name)))
        .value()
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_info() {
        let logger = NamedLogger::new("defaults");
        assert_eq!(logger.level(), Level::Info);
        assert!(!logger.debug_enabled());
        assert!(logger.info_enabled());
        assert!(logger.error_enabled());
    }

    #[test]
    fn test_set_log_level() {
        let logger = NamedLogger::new("levels");

        logger.set_log_level(Level::Error);
        assert!(!logger.warn_enabled());
        assert!(logger.error_enabled());

        logger.set_log_level(Level::Debug);
        assert!(logger.debug_enabled());
    }

    #[test]
    fn test_registry_returns_same_instance() {
        let first = get_logger("registry-test");
        let second = get_logger("registry-test");

        assert!(Arc::ptr_eq(&first, &second));

        first.set_log_level(Level::Warn);
        assert_eq!(second.level(), Level::Warn);
        assert!(!Arc::ptr_eq(&first, &get_logger("registry-other")));
    }
}
