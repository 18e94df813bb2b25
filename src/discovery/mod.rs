//! File discovery module
//!
//! This module contains components for verifying the watched directory and
//! finding the files a pass should handle.

mod scanner;

pub use scanner::{FileInfo, scan_directory, verify_directory};
