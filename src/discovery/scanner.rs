//! Directory scanning functionality
//!
//! This module contains functions for scanning the watched directory and
//! filtering its entries by file extension.

use std::fs::read_dir;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::constants::READ_DIRECTORY;
use crate::errors::{
    Result, directory_not_found_error, file_operation_error, not_a_directory_error,
};

/// Information about a file found during scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// The path to the file
    pub path: PathBuf,
    /// The filename of the file
    pub filename: String,
}

impl FileInfo {
    /// Creates a new FileInfo from a path
    ///
    /// Returns `None` if the path has no final component or the name is not
    /// valid Unicode.
    pub fn new(path: PathBuf) -> Option<Self> {
        let filename = path.file_name()?.to_str()?.to_string();
        Some(FileInfo { path, filename })
    }
}

/// Checks that `directory` exists and is a directory
///
/// # Errors
/// * `DirectoryNotFound` if nothing exists at the path
/// * `NotADirectory` if the path points to something else
/// * `FileOperation` if the path cannot be inspected
pub fn verify_directory(directory: &Path) -> Result<()> {
    let metadata = directory.metadata().map_err(|e| match e.kind() {
        ErrorKind::NotFound => directory_not_found_error(directory.to_path_buf()),
        _ => file_operation_error(e, directory.to_path_buf(), READ_DIRECTORY),
    })?;

    if !metadata.is_dir() {
        return Err(not_a_directory_error(directory.to_path_buf()));
    }

    Ok(())
}

/// Scans a directory for files ending with `extension`
///
/// The listing is not recursive. The suffix comparison is exact and
/// case-sensitive, and results are sorted by filename so that ordinals are
/// stable between runs.
///
/// # Arguments
/// * `directory` - The directory to scan
/// * `extension` - Suffix every returned filename ends with
///
/// # Returns
/// * `Result<Vec<FileInfo>>` - The matching files, sorted by name
///
/// # Errors
/// Returns an error if the directory is missing, not a directory, or cannot be read
pub fn scan_directory(directory: &Path, extension: &str) -> Result<Vec<FileInfo>> {
    debug!("Scanning directory: {}", directory.display());

    verify_directory(directory)?;

    let entries = read_dir(directory)
        .map_err(|e| file_operation_error(e, directory.to_path_buf(), READ_DIRECTORY))?;

    let mut files: Vec<FileInfo> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                debug!("Skipping unreadable entry in {}: {e}", directory.display());
                None
            }
        })
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let info = FileInfo::new(path.clone());
            if info.is_none() {
                debug!("Skipping entry with invalid filename: {}", path.display());
            }
            info
        })
        .filter(|info| info.filename.ends_with(extension))
        .collect();

    files.sort_by(|a, b| a.filename.cmp(&b.filename));

    debug!("Found {} matching files in directory", files.len());

    Ok(files)
}
