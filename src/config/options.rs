//! Explicit watcher options
//!
//! This module contains the option bag handed to the watcher at construction.
//! Every field is optional; resolution against fallbacks and defaults happens
//! in [`WatcherConfig::resolve`](super::WatcherConfig::resolve).

use serde::Deserialize;

/// Options explicitly supplied by the caller
///
/// Field names follow the keys accepted in YAML option files.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WatcherOptions {
    /// Directory to watch
    pub directory: Option<String>,
    /// Polling interval in milliseconds; zero runs a single pass
    pub interval: Option<u64>,
    /// Suffix a filename must end with to be handled
    pub fileext: Option<String>,
    /// Regular expression extracting the type token from a filename
    pub typematch: Option<String>,
    /// Whether matched files are renamed
    pub mustrename: Option<bool>,
    /// Template for renamed files
    pub renametemplate: Option<String>,
    /// Whether matched files are copied to the backup directory
    pub mustbackup: Option<bool>,
    /// Directory receiving backup copies
    pub backupdirectory: Option<String>,
}

impl WatcherOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_interval(mut self, milliseconds: u64) -> Self {
        self.interval = Some(milliseconds);
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.fileext = Some(extension.into());
        self
    }

    pub fn with_type_match(mut self, pattern: impl Into<String>) -> Self {
        self.typematch = Some(pattern.into());
        self
    }

    pub fn with_rename(mut self, enabled: bool) -> Self {
        self.mustrename = Some(enabled);
        self
    }

    pub fn with_rename_template(mut self, template: impl Into<String>) -> Self {
        self.renametemplate = Some(template.into());
        self
    }

    pub fn with_backup(mut self, enabled: bool) -> Self {
        self.mustbackup = Some(enabled);
        self
    }

    pub fn with_backup_directory(mut self, directory: impl Into<String>) -> Self {
        self.backupdirectory = Some(directory.into());
        self
    }

    /// Fills every field left unset in `self` from `lower`
    ///
    /// Used to layer command-line options over an option file.
    pub fn or(self, lower: WatcherOptions) -> WatcherOptions {
        WatcherOptions {
            directory: self.directory.or(lower.directory),
            interval: self.interval.or(lower.interval),
            fileext: self.fileext.or(lower.fileext),
            typematch: self.typematch.or(lower.typematch),
            mustrename: self.mustrename.or(lower.mustrename),
            renametemplate: self.renametemplate.or(lower.renametemplate),
            mustbackup: self.mustbackup.or(lower.mustbackup),
            backupdirectory: self.backupdirectory.or(lower.backupdirectory),
        }
    }
}
