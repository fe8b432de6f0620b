//! Logging
//!
//! The pipeline reports what it skipped and rewrote through a `Logger`.
//! Hosts that do not care pass a `NullLogger`.

mod console_logger;
mod logger;

pub use console_logger::ConsoleLogger;
pub use logger::{LogLevel, Logger, NullLogger};
