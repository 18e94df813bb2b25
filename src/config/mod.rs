//! Configuration module
//!
//! This module contains the explicit option bag, the fallback sources consulted
//! when an option is absent, and the resolved, immutable watcher configuration.

mod fallback;
mod loader;
mod model;
mod options;

pub use fallback::{Environment, Fallback};
pub use loader::{expand_path, load_options};
pub use model::WatcherConfig;
pub use options::WatcherOptions;
