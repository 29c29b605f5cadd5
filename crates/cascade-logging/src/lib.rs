//! # Cascade Logging
//!
//! Named, individually leveled loggers on top of `tracing`, the single-line
//! output format used across Cascade services, and subscriber installation
//! driven by [`LoggingConfig`].
//!
//! ```
//! use cascade_logging::{get_logger, Level, Logger};
//!
//! let logger = get_logger("trigger.rest");
//! logger.set_log_level(Level::Debug);
//! assert!(logger.debug_enabled());
//! logger.info("Trigger started");
//! ```

mod config;
mod format;
mod level;
mod logger;

pub use config::{
    init_logging, init_test_tracing, LogFormat, LoggingConfig, LOG_FILTER_ENV, LOG_FORMAT_ENV,
};
pub use format::{strip_brackets, LineFormat, TIMESTAMP_FORMAT};
pub use level::{Level, LevelParseError};
pub use logger::{get_logger, Logger, NamedLogger, LOG_TARGET};
