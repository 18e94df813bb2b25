use regex::Error as RegexError;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::constants::READ_DIRECTORY;

/// Custom error type for the drop directory watcher
#[derive(Debug)]
pub enum Error {
    /// A required option was neither given explicitly nor through its fallback
    MissingOption { option: String, fallback: String },
    /// An option was given but could not be interpreted
    InvalidOption {
        option: String,
        value: String,
        detail: String,
    },
    /// Error related to pattern matching
    PatternMatching { source: RegexError, pattern: String },
    /// Error related to configuration parsing
    ConfigParsing {
        source: Box<dyn StdError + Send + Sync>,
        detail: String,
    },
    /// Error related to file operations
    FileOperation {
        source: io::Error,
        path: PathBuf,
        operation: String,
    },
    /// Error when the watched directory is not found
    DirectoryNotFound { path: PathBuf },
    /// Error when the watched path exists but is not a directory
    NotADirectory { path: PathBuf },
    /// Error when a rename destination already exists
    DestinationBusy { path: PathBuf },
    /// Error when a file disappeared before it could be handled
    FileNotFound { path: PathBuf },
    /// Error when a watcher is started twice
    AlreadyRunning { path: PathBuf },
    /// Generic error with a message
    Generic { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingOption { option, fallback } => {
                write!(
                    f,
                    "{} not set, options.{} or environment variable {fallback}",
                    capitalise(option),
                    option.to_lowercase()
                )
            }
            Error::InvalidOption {
                option,
                value,
                detail,
            } => {
                write!(f, "Invalid value '{value}' for option {option}: {detail}")
            }
            Error::PatternMatching { pattern, .. } => {
                write!(f, "Invalid pattern: {pattern}")
            }
            Error::ConfigParsing { detail, .. } => {
                write!(f, "Configuration parsing error: {detail}")
            }
            Error::FileOperation {
                path, operation, ..
            } => {
                write!(f, "Failed to {} file: {}", operation, path.display())
            }
            Error::DirectoryNotFound { path } => {
                write!(f, "Directory not found: {}", path.display())
            }
            Error::NotADirectory { path } => {
                write!(f, "{} is not a directory.", path.display())
            }
            Error::DestinationBusy { path } => {
                write!(f, "File busy/error, {}", path.display())
            }
            Error::FileNotFound { path } => {
                write!(f, "File not found: {}", path.display())
            }
            Error::AlreadyRunning { path } => {
                write!(f, "Already listening for files at {}", path.display())
            }
            Error::Generic { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::FileOperation { source, .. } => Some(source),
            Error::PatternMatching { source, .. } => Some(source),
            Error::ConfigParsing { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::FileOperation {
            source: err,
            path: PathBuf::new(),
            operation: "perform operation on".to_string(),
        }
    }
}

impl From<RegexError> for Error {
    fn from(err: RegexError) -> Self {
        Error::PatternMatching {
            source: err,
            pattern: String::new(),
        }
    }
}

impl Error {
    /// Whether the error aborted a whole pass rather than a single file
    pub fn is_pass_level(&self) -> bool {
        match self {
            Error::DirectoryNotFound { .. } | Error::NotADirectory { .. } => true,
            Error::FileOperation { operation, .. } => operation == READ_DIRECTORY,
            _ => false,
        }
    }
}

fn capitalise(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Custom Result type for the watcher
///
/// # Examples
/// ```
/// use dropwatch::prelude::{Result, missing_option_error};
///
/// fn example_function(directory: Option<&str>) -> Result<String> {
///     directory
///         .map(str::to_string)
///         .ok_or_else(|| missing_option_error("directory", "FILELOADER_DIRECTORY"))
/// }
///
/// assert!(example_function(None).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Helper function to create a missing option error
pub fn missing_option_error(option: &str, fallback: &str) -> Error {
    Error::MissingOption {
        option: option.to_string(),
        fallback: fallback.to_string(),
    }
}

/// Helper function to create an invalid option error
pub fn invalid_option_error(option: &str, value: &str, detail: &str) -> Error {
    Error::InvalidOption {
        option: option.to_string(),
        value: value.to_string(),
        detail: detail.to_string(),
    }
}

/// Helper function to create a pattern matching error
pub fn pattern_matching_error(err: RegexError, pattern: &str) -> Error {
    Error::PatternMatching {
        source: err,
        pattern: pattern.to_string(),
    }
}

/// Helper function to create a config parsing error
pub fn config_parsing_error<E: StdError + Send + Sync + 'static>(err: E, detail: &str) -> Error {
    Error::ConfigParsing {
        source: Box::new(err),
        detail: detail.to_string(),
    }
}

/// Helper function to create a file operation error
pub fn file_operation_error(err: io::Error, path: PathBuf, operation: &str) -> Error {
    Error::FileOperation {
        source: err,
        path,
        operation: operation.to_string(),
    }
}

/// Helper function to create a directory not found error
pub fn directory_not_found_error(path: PathBuf) -> Error {
    Error::DirectoryNotFound { path }
}

/// Helper function to create a not-a-directory error
pub fn not_a_directory_error(path: PathBuf) -> Error {
    Error::NotADirectory { path }
}

/// Helper function to create a busy destination error
pub fn destination_busy_error(path: PathBuf) -> Error {
    Error::DestinationBusy { path }
}

/// Helper function to create a file not found error
pub fn file_not_found_error(path: PathBuf) -> Error {
    Error::FileNotFound { path }
}

/// Helper function to create an already running error
pub fn already_running_error(path: PathBuf) -> Error {
    Error::AlreadyRunning { path }
}

/// Helper function to create a generic error
pub fn generic_error(message: &str) -> Error {
    Error::Generic {
        message: message.to_string(),
    }
}
