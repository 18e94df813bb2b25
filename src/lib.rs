//! Drop directory watcher
//!
//! Polls a directory, classifies matching files by a type token taken from
//! their name, renames them from a template, copies them to a backup
//! directory and reports every batch to subscribers.

pub mod cli;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod errors;
pub mod events;
pub mod file_ops;
pub mod logging;
pub mod naming;
pub mod watcher;

pub mod prelude {
    pub use crate::config::{Environment, Fallback, WatcherConfig, WatcherOptions, load_options};
    pub use crate::errors::{
        already_running_error, config_parsing_error, destination_busy_error,
        directory_not_found_error, file_not_found_error, file_operation_error, generic_error,
        invalid_option_error, missing_option_error, not_a_directory_error, pattern_matching_error,
    };
    pub use crate::errors::{Error, Result};
    pub use crate::events::{EventLevel, FileRecord, LogEvent, WatcherEvent};
    pub use crate::logging::{LogLevel, format_message, init_logger};
    pub use crate::watcher::{DirectoryWatcher, ErrorCallback};
}
