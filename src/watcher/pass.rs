//! Scan-classify-act pass
//!
//! This module contains the pipeline run on every tick: scan the watched
//! directory, then classify, rename and back up each matching file in listing
//! order, and finally report the batch.

use chrono::Utc;
use log::debug;

use crate::discovery::{FileInfo, scan_directory};
use crate::errors::{Error, Result};
use crate::events::{FileRecord, LogEvent, WatcherEvent};
use crate::file_ops::{backup_file, rename_file};
use crate::naming::{extract_type, render_template};

use super::Shared;

impl Shared {
    /// Runs one complete pass
    ///
    /// Passes are serialised: a second caller blocks until the running pass
    /// finishes. A pass-level failure is logged, handed to `on_error` and
    /// yields `None`; per-file failures never abort the pass.
    pub(crate) fn run_pass(&self, on_error: &dyn Fn(&Error)) -> Option<Vec<FileRecord>> {
        let _guard = self.pass_lock.lock();

        match self.process_directory(on_error) {
            Ok(records) => Some(records),
            Err(e) => {
                self.events.log(LogEvent::error(e.to_string()));
                on_error(&e);
                None
            }
        }
    }

    fn process_directory(&self, on_error: &dyn Fn(&Error)) -> Result<Vec<FileRecord>> {
        let files = scan_directory(self.config.directory(), self.config.file_extension())?;

        if files.is_empty() {
            debug!(
                "No {} files found in {}",
                self.config.file_extension(),
                self.config.directory().display()
            );
            return Ok(Vec::new());
        }

        let records: Vec<FileRecord> = files
            .iter()
            .enumerate()
            .map(|(counter, file)| self.process_file(file, counter, on_error))
            .collect();

        debug!("Finished processing {} files", records.len());
        self.events.emit(WatcherEvent::Loaded(records.clone()));

        Ok(records)
    }

    fn process_file(&self, file: &FileInfo, counter: usize, on_error: &dyn Fn(&Error)) -> FileRecord {
        let file_type = extract_type(self.config.type_pattern(), &file.filename);
        let timestamp = Utc::now().timestamp_millis();

        let renamed = if self.config.must_rename() {
            self.rename_step(file, &file_type, timestamp, counter, on_error)
        } else {
            None
        };

        let record = FileRecord {
            original: file.filename.clone(),
            renamed,
            timestamp,
            counter,
            file_type,
        };

        if self.config.must_backup() {
            self.backup_step(record.current_name(), on_error);
        }

        record
    }

    /// Renames the file according to the template, returning the new name on success
    fn rename_step(
        &self,
        file: &FileInfo,
        file_type: &str,
        timestamp: i64,
        counter: usize,
        on_error: &dyn Fn(&Error),
    ) -> Option<String> {
        let new_name = render_template(self.config.rename_template(), file_type, timestamp, counter);
        let target = self.config.directory().join(&new_name);

        match rename_file(&file.path, &target) {
            Ok(()) => {
                self.events
                    .log(LogEvent::info(format!("File renamed: {}", target.display())));
                Some(new_name)
            }
            Err(e @ Error::DestinationBusy { .. }) => {
                self.events.log(LogEvent::error(e.to_string()));
                None
            }
            Err(e) => {
                self.events
                    .log(LogEvent::info(format!("File busy/error: {}", file.path.display())));
                on_error(&e);
                None
            }
        }
    }

    fn backup_step(&self, filename: &str, on_error: &dyn Fn(&Error)) {
        match backup_file(
            self.config.directory(),
            filename,
            self.config.backup_directory(),
        ) {
            Ok(_) => {
                self.events
                    .log(LogEvent::info(format!("File backup: {filename}")));
            }
            Err(e @ Error::FileNotFound { .. }) => {
                debug!("Skipping backup: {e}");
                on_error(&e);
            }
            Err(e) => {
                self.events.log(LogEvent::error(e.to_string()));
                on_error(&e);
            }
        }
    }
}
