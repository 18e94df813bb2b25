//! Option file loading
//!
//! This module reads [`WatcherOptions`] from a YAML file.

use std::fs;
use std::path::Path;

use log::debug;
use serde_yaml::from_str;
use shellexpand::tilde;

use crate::errors::{Result, config_parsing_error, file_operation_error};

use super::options::WatcherOptions;

/// Loads watcher options from a YAML file
///
/// # Arguments
/// * `file` - Path to the option file
///
/// # Returns
/// * `Result<WatcherOptions>` - The options found in the file
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid YAML
pub fn load_options(file: &Path) -> Result<WatcherOptions> {
    let content = fs::read_to_string(file)
        .map_err(|e| file_operation_error(e, file.to_path_buf(), "read"))?;

    let options: WatcherOptions = from_str(&content).map_err(|e| {
        config_parsing_error(
            e,
            &format!(
                "Failed to parse option file {}. Please check the YAML syntax.",
                file.display()
            ),
        )
    })?;

    debug!("Loaded options from {}", file.display());

    Ok(options)
}

/// Expands a leading `~` to the user's home directory
pub fn expand_path(path: &str) -> String {
    tilde(path).to_string()
}
