//! Serialized repetition of passes
//!
//! The scheduler thread waits for the next deadline, runs a pass to
//! completion and only then computes the following deadline. Ticks missed
//! while a pass overran its interval are skipped, never queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, at, bounded, select};
use log::debug;

use crate::constants::SCHEDULER_THREAD_NAME;
use crate::errors::{Result, generic_error};

use super::{ErrorCallback, Shared};

/// Handle to a running scheduler thread
pub(crate) struct Schedule {
    stopped: Arc<AtomicBool>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Schedule {
    /// Spawns the scheduler; its first pass is due at `first_deadline`
    pub(crate) fn spawn(
        shared: Arc<Shared>,
        on_error: ErrorCallback,
        first_deadline: Instant,
    ) -> Result<Self> {
        let stopped = Arc::new(AtomicBool::new(false));
        let (stop, stop_signal) = bounded::<()>(0);

        let thread_stopped = Arc::clone(&stopped);
        let handle = thread::Builder::new()
            .name(SCHEDULER_THREAD_NAME.to_owned())
            .spawn(move || {
                run_schedule(shared, on_error, stop_signal, thread_stopped, first_deadline)
            })
            .map_err(|e| generic_error(&format!("Failed to spawn scheduler thread: {e}")))?;

        Ok(Schedule {
            stopped,
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Prevents further passes and waits for an in-flight pass to finish
    ///
    /// When called from the scheduler thread itself (e.g. from the error
    /// callback) the thread is signalled but not joined.
    pub(crate) fn cancel(mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        drop(self.stop.take());

        if let Some(handle) = self.handle.take() {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                log::error!("Scheduler thread panicked");
            }
        }
    }
}

fn run_schedule(
    shared: Arc<Shared>,
    on_error: ErrorCallback,
    stop_signal: Receiver<()>,
    stopped: Arc<AtomicBool>,
    mut deadline: Instant,
) {
    let interval = shared.config.interval();
    debug!("Scheduler started with interval {interval:?}");

    loop {
        select! {
            recv(stop_signal) -> _ => break,
            recv(at(deadline)) -> _ => {}
        }

        if stopped.load(Ordering::SeqCst) {
            break;
        }

        shared.run_pass(on_error.as_ref());

        let (next, skipped) = next_deadline(deadline, interval, Instant::now());
        if skipped > 0 {
            debug!("Pass overran its interval, skipping {skipped} tick(s)");
        }
        deadline = next;
    }

    debug!("Scheduler stopped");
}

/// Computes the next fixed-rate deadline after `previous`
///
/// Returns the first deadline strictly after `now` together with the number
/// of ticks that were skipped because they already passed.
pub(crate) fn next_deadline(previous: Instant, interval: Duration, now: Instant) -> (Instant, u32) {
    let mut next = previous + interval;
    let mut skipped = 0;
    while next <= now {
        next += interval;
        skipped += 1;
    }
    (next, skipped)
}
