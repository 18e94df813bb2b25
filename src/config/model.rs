//! Resolved watcher configuration
//!
//! This module turns a [`WatcherOptions`] bag into an immutable
//! [`WatcherConfig`]. Each field is resolved in a fixed order: explicit option,
//! then fallback source, then built-in default. Required fields without a
//! value fail construction before the filesystem is touched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use regex::Regex;

use crate::constants::{
    DEFAULT_BACKUP_FOLDER, DEFAULT_RENAME_TEMPLATE, DEFAULT_TYPE_MATCH, ENV_BACKUP_DIRECTORY,
    ENV_DIRECTORY, ENV_FILE_EXTENSION, ENV_INTERVAL, ENV_MUST_BACKUP, ENV_MUST_RENAME,
    ENV_RENAME_TEMPLATE, ENV_TYPE_MATCH, OPTION_DIRECTORY, OPTION_FILE_EXTENSION,
    OPTION_INTERVAL, OPTION_MUST_BACKUP, OPTION_MUST_RENAME,
};
use crate::errors::{Result, invalid_option_error, missing_option_error, pattern_matching_error};

use super::fallback::{Environment, Fallback};
use super::loader::expand_path;
use super::options::WatcherOptions;

/// Configuration of a directory watcher
///
/// Immutable once built; use [`WatcherConfig::new`] or
/// [`WatcherConfig::resolve`] to create one.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    directory: PathBuf,
    interval: Duration,
    file_extension: String,
    type_pattern: Regex,
    must_rename: bool,
    rename_template: String,
    must_backup: bool,
    backup_directory: PathBuf,
}

impl WatcherConfig {
    /// Resolves the options against the process environment
    ///
    /// # Errors
    /// Returns an error if the directory or file extension is missing, or if
    /// any supplied value cannot be interpreted
    pub fn new(options: WatcherOptions) -> Result<Self> {
        Self::resolve(options, &Environment)
    }

    /// Resolves the options against an arbitrary fallback source
    ///
    /// # Arguments
    /// * `options` - Explicitly supplied options, taking precedence
    /// * `fallback` - Source consulted for every option left unset
    ///
    /// # Errors
    /// * `MissingOption` if the directory or file extension cannot be resolved
    /// * `InvalidOption` if a fallback interval or flag cannot be parsed
    /// * `PatternMatching` if the type pattern is not a valid regular expression
    pub fn resolve(options: WatcherOptions, fallback: &dyn Fallback) -> Result<Self> {
        let directory = layered(options.directory, fallback, ENV_DIRECTORY)
            .ok_or_else(|| missing_option_error(OPTION_DIRECTORY, ENV_DIRECTORY))?;
        let file_extension = layered(options.fileext, fallback, ENV_FILE_EXTENSION)
            .ok_or_else(|| missing_option_error(OPTION_FILE_EXTENSION, ENV_FILE_EXTENSION))?;

        let interval = match options.interval {
            Some(milliseconds) => milliseconds,
            None => match layered(None, fallback, ENV_INTERVAL) {
                Some(raw) => parse_interval(&raw)?,
                None => 0,
            },
        };

        let type_match = layered(options.typematch, fallback, ENV_TYPE_MATCH)
            .unwrap_or_else(|| DEFAULT_TYPE_MATCH.to_string());
        let type_pattern =
            Regex::new(&type_match).map_err(|e| pattern_matching_error(e, &type_match))?;

        let must_rename = resolve_flag(
            options.mustrename,
            fallback,
            OPTION_MUST_RENAME,
            ENV_MUST_RENAME,
        )?;
        let must_backup = resolve_flag(
            options.mustbackup,
            fallback,
            OPTION_MUST_BACKUP,
            ENV_MUST_BACKUP,
        )?;

        let rename_template = layered(options.renametemplate, fallback, ENV_RENAME_TEMPLATE)
            .unwrap_or_else(|| DEFAULT_RENAME_TEMPLATE.to_string());

        let directory = PathBuf::from(expand_path(&directory));
        let backup_directory =
            match layered(options.backupdirectory, fallback, ENV_BACKUP_DIRECTORY) {
                Some(path) => PathBuf::from(expand_path(&path)),
                None => directory.join(DEFAULT_BACKUP_FOLDER),
            };

        let config = WatcherConfig {
            directory,
            interval: Duration::from_millis(interval),
            file_extension,
            type_pattern,
            must_rename,
            rename_template,
            must_backup,
            backup_directory,
        };
        debug!("Resolved watcher configuration: {config:?}");

        Ok(config)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Polling interval; zero means a single pass
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn type_pattern(&self) -> &Regex {
        &self.type_pattern
    }

    pub fn must_rename(&self) -> bool {
        self.must_rename
    }

    pub fn rename_template(&self) -> &str {
        &self.rename_template
    }

    pub fn must_backup(&self) -> bool {
        self.must_backup
    }

    pub fn backup_directory(&self) -> &Path {
        &self.backup_directory
    }

    /// Whether passes repeat after the first one
    pub fn is_repeating(&self) -> bool {
        !self.interval.is_zero()
    }
}

/// Explicit value first, fallback second; empty strings count as unset
fn layered(explicit: Option<String>, fallback: &dyn Fallback, key: &str) -> Option<String> {
    explicit
        .filter(|value| !value.is_empty())
        .or_else(|| fallback.lookup(key).filter(|value| !value.is_empty()))
}

fn resolve_flag(
    explicit: Option<bool>,
    fallback: &dyn Fallback,
    option: &str,
    key: &str,
) -> Result<bool> {
    if let Some(flag) = explicit {
        return Ok(flag);
    }
    match layered(None, fallback, key) {
        Some(raw) => parse_flag(option, &raw),
        None => Ok(true),
    }
}

fn parse_flag(option: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid_option_error(
            option,
            raw,
            "expected one of true, false, yes, no, 1, 0",
        )),
    }
}

fn parse_interval(raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        invalid_option_error(
            OPTION_INTERVAL,
            raw,
            "expected a non-negative number of milliseconds",
        )
    })
}
