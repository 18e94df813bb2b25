//! Fallback option sources
//!
//! An option that is not given explicitly is looked up here before the
//! built-in default applies.

use std::collections::HashMap;
use std::env;

/// A source of option values consulted when an explicit option is absent
pub trait Fallback {
    /// Returns the raw value stored under `key`, if any
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads fallback values from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment;

impl Fallback for Environment {
    fn lookup(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl Fallback for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
