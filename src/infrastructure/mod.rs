//! Infrastructure layer: configuration, logging and the outbound adapters.
//!
//! The CSV sink and the bot notifier implement the application's
//! `RecordSink` and `Notifier` seams.

pub mod config;
pub mod logging;
pub mod notification;
pub mod persistence;

pub use config::*;
pub use logging::*;
pub use notification::*;
pub use persistence::*;
