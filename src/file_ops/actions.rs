//! File operation functionality
//!
//! This module contains functions for renaming files inside the watched
//! directory and copying them to the backup directory.

use std::fs::{create_dir_all, read_to_string, rename};
use std::path::{Path, PathBuf};

use fs_extra::file::{CopyOptions, copy};
use log::debug;

use crate::errors::{
    Result, destination_busy_error, file_not_found_error, file_operation_error,
};

/// Renames `source` to `target`
///
/// The target must not exist yet; an existing target means another file
/// already claimed the name and the source is left untouched.
///
/// # Errors
/// * `DestinationBusy` if `target` already exists
/// * `FileOperation` if the move itself fails, e.g. because `source` vanished
pub fn rename_file(source: &Path, target: &Path) -> Result<()> {
    if target.exists() {
        return Err(destination_busy_error(target.to_path_buf()));
    }

    debug!("Renaming file: {} -> {}", source.display(), target.display());
    rename(source, target).map_err(|e| file_operation_error(e, source.to_path_buf(), "rename"))
}

/// Copies `directory/filename` into `backup_directory` under the same name
///
/// The backup directory is created if missing. An existing copy with the same
/// name is overwritten.
///
/// # Returns
/// * `Result<PathBuf>` - The path of the backup copy
///
/// # Errors
/// * `FileNotFound` if the source file no longer exists
/// * `FileOperation` if the backup directory cannot be created or the copy fails
pub fn backup_file(directory: &Path, filename: &str, backup_directory: &Path) -> Result<PathBuf> {
    let source = directory.join(filename);
    if !source.is_file() {
        return Err(file_not_found_error(source));
    }

    create_dir_all(backup_directory).map_err(|e| {
        file_operation_error(e, backup_directory.to_path_buf(), "create directory")
    })?;

    let target = backup_directory.join(filename);
    let options = CopyOptions::new().overwrite(true);

    debug!("Copying file: {} -> {}", source.display(), target.display());
    copy(&source, &target, &options)
        .map_err(|e| file_operation_error(std::io::Error::other(e), source.clone(), "copy"))?;

    Ok(target)
}

/// Reads `directory/filename` as UTF-8 text
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid UTF-8
pub fn read_text(directory: &Path, filename: &str) -> Result<String> {
    let path = directory.join(filename);
    read_to_string(&path).map_err(|e| file_operation_error(e, path, "read"))
}
