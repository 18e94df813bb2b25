//! Directory watcher
//!
//! A [`DirectoryWatcher`] owns one watched directory. [`DirectoryWatcher::start`]
//! runs a pass immediately and, when an interval is configured, keeps repeating
//! it on a scheduler thread until [`DirectoryWatcher::stop`] is called. Results
//! are observed through [`DirectoryWatcher::subscribe`].
//!
//! ```no_run
//! use dropwatch::config::WatcherOptions;
//! use dropwatch::watcher::DirectoryWatcher;
//!
//! let options = WatcherOptions::new()
//!     .with_directory("./dump")
//!     .with_interval(5000)
//!     .with_file_extension(".csv")
//!     .with_type_match("[^_]*");
//! let watcher = DirectoryWatcher::from_options(options)?;
//! let events = watcher.subscribe();
//! watcher.start(|err| eprintln!("{err}"))?;
//! for event in events.iter() {
//!     println!("{event:?}");
//! }
//! # Ok::<(), dropwatch::errors::Error>(())
//! ```

mod pass;
mod schedule;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::Receiver;
use log::debug;
use parking_lot::Mutex;

use crate::config::{WatcherConfig, WatcherOptions};
use crate::errors::{Error, Result, already_running_error};
use crate::events::{EventBus, FileRecord, LogEvent, WatcherEvent};
use crate::file_ops::read_text;

use schedule::Schedule;

/// Callback receiving errors reported while the watcher runs
pub type ErrorCallback = Arc<dyn Fn(&Error) + Send + Sync>;

/// State shared between the watcher handle and its scheduler thread
pub(crate) struct Shared {
    pub(crate) config: WatcherConfig,
    pub(crate) events: EventBus,
    pass_lock: Mutex<()>,
    stop_requests: AtomicU64,
}

/// Polls one directory and processes the files it finds
pub struct DirectoryWatcher {
    shared: Arc<Shared>,
    schedule: Mutex<Option<Schedule>>,
}

impl DirectoryWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        DirectoryWatcher {
            shared: Arc::new(Shared {
                config,
                events: EventBus::new(),
                pass_lock: Mutex::new(()),
                stop_requests: AtomicU64::new(0),
            }),
            schedule: Mutex::new(None),
        }
    }

    /// Builds a watcher from explicit options, falling back to the environment
    ///
    /// # Errors
    /// Returns a configuration error if a required option cannot be resolved
    pub fn from_options(options: WatcherOptions) -> Result<Self> {
        Ok(Self::new(WatcherConfig::new(options)?))
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.shared.config
    }

    /// Returns a receiver for every event emitted from now on
    pub fn subscribe(&self) -> Receiver<WatcherEvent> {
        self.shared.events.subscribe()
    }

    /// Runs a single pass on the calling thread
    ///
    /// Returns the records of the pass, or `None` if the pass failed at the
    /// directory level. Errors are reported through `on_error`.
    pub fn run_pass<F>(&self, on_error: F) -> Option<Vec<FileRecord>>
    where
        F: Fn(&Error),
    {
        self.shared.run_pass(&on_error)
    }

    /// Starts listening for files
    ///
    /// Runs the first pass before returning. With a non-zero interval a
    /// scheduler thread repeats the pass until [`stop`](Self::stop); passes
    /// never overlap.
    ///
    /// # Errors
    /// * `AlreadyRunning` if the watcher is already scheduled
    /// * `Generic` if the scheduler thread cannot be spawned
    pub fn start<F>(&self, on_error: F) -> Result<()>
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        if self.is_running() {
            return Err(already_running_error(self.config().directory().to_path_buf()));
        }

        let on_error: ErrorCallback = Arc::new(on_error);
        let stop_requests = self.shared.stop_requests.load(Ordering::SeqCst);

        self.shared.events.log(LogEvent::info(format!(
            "Start listening for files at {}",
            self.config().directory().display()
        )));

        let started = Instant::now();
        self.shared.run_pass(on_error.as_ref());

        if !self.config().is_repeating() {
            return Ok(());
        }

        // stop() bumps the counter before taking the slot, so checking it under
        // the slot lock either sees the stop or hands the schedule over to it
        let mut slot = self.schedule.lock();
        if slot.is_some() {
            return Err(already_running_error(self.config().directory().to_path_buf()));
        }
        if self.shared.stop_requests.load(Ordering::SeqCst) != stop_requests {
            debug!("Stopped during the first pass, not scheduling");
            return Ok(());
        }

        *slot = Some(Schedule::spawn(
            Arc::clone(&self.shared),
            on_error,
            started + self.config().interval(),
        )?);

        Ok(())
    }

    /// Stops the repeating schedule
    ///
    /// Idempotent and safe to call before [`start`](Self::start). A pass that
    /// is already running completes; no further pass starts afterwards, even
    /// when `stop` races with a `start` on another thread.
    pub fn stop(&self) {
        self.shared.stop_requests.fetch_add(1, Ordering::SeqCst);

        let schedule = self.schedule.lock().take();
        if let Some(schedule) = schedule {
            schedule.cancel();
            self.shared.events.log(LogEvent::info("Listener stopped"));
        }
    }

    /// Whether a repeating schedule is active
    pub fn is_running(&self) -> bool {
        self.schedule.lock().is_some()
    }

    /// Reads a file from the watched directory as text
    ///
    /// Not part of the pass pipeline. A failure is also emitted as an error
    /// log entry.
    pub fn read_file(&self, filename: &str) -> Result<String> {
        read_text(self.config().directory(), filename).inspect_err(|e| {
            self.shared.events.log(LogEvent::error(e.to_string()));
        })
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
