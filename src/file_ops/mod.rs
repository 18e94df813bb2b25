//! File operations module
//!
//! This module contains the filesystem side effects of a pass: renaming in
//! place, copying to the backup directory and reading files as text.

mod actions;

pub use actions::{backup_file, read_text, rename_file};
