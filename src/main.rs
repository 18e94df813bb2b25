use std::thread;

use anyhow::Result;
use colored::Colorize;
use human_panic::setup_panic;
use log::{error, warn};

use dropwatch::cli::{get_log_file, get_matches, get_verbosity, get_watcher_options};
use dropwatch::events::{FileRecord, WatcherEvent};
use dropwatch::logging::{format_message, init_logger};
use dropwatch::watcher::DirectoryWatcher;

fn main() -> Result<()> {
    setup_panic!();

    let matches = get_matches();
    init_logger(get_verbosity(&matches), get_log_file(&matches))?;

    let options = get_watcher_options(&matches)?;
    let watcher = DirectoryWatcher::from_options(options)?;

    let events = watcher.subscribe();
    let printer = thread::spawn(move || {
        for event in events.iter() {
            if let WatcherEvent::Loaded(records) = event {
                print_batch(&records);
            }
        }
    });

    watcher.start(|err| {
        // pass-level errors are already logged by the watcher
        if !err.is_pass_level() {
            warn!("{err}");
        }
    })?;

    if !watcher.config().is_repeating() {
        // closes the event stream so the printer finishes
        drop(watcher);
    }

    if printer.join().is_err() {
        error!("Event printer panicked");
    }

    Ok(())
}

fn print_batch(records: &[FileRecord]) {
    let header = format!("Loaded {} file(s)", records.len());
    println!("{}", format_message(&header, &header.green().bold().to_string()));

    match serde_yaml::to_string(records) {
        Ok(yaml) => print!("{yaml}"),
        Err(e) => error!("Failed to format batch: {e}"),
    }
}
