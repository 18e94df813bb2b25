use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use dropwatch::config::{WatcherConfig, WatcherOptions};
use dropwatch::errors::Error;
use dropwatch::events::{EventLevel, FileRecord, LogEvent, WatcherEvent};
use dropwatch::watcher::DirectoryWatcher;
use tempfile::tempdir;

fn watcher_for(options: WatcherOptions) -> DirectoryWatcher {
    let config = WatcherConfig::resolve(options, &HashMap::new()).expect("Invalid test options");
    DirectoryWatcher::new(config)
}

fn options_for(directory: &Path) -> WatcherOptions {
    WatcherOptions::new()
        .with_directory(directory.to_string_lossy())
        .with_file_extension(".csv")
}

fn touch(directory: &Path, names: &[&str]) {
    for name in names {
        File::create(directory.join(name)).expect("Failed to create test file");
    }
}

fn drain(events: &Receiver<WatcherEvent>) -> (Vec<Vec<FileRecord>>, Vec<LogEvent>) {
    let mut batches = Vec::new();
    let mut logs = Vec::new();
    for event in events.try_iter() {
        match event {
            WatcherEvent::Loaded(records) => batches.push(records),
            WatcherEvent::Log(entry) => logs.push(entry),
        }
    }
    (batches, logs)
}

/// Waits for the next batch, giving up after `timeout`
fn next_batch(events: &Receiver<WatcherEvent>, timeout: Duration) -> Option<Vec<FileRecord>> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.checked_duration_since(Instant::now())?;
        match events.recv_timeout(remaining) {
            Ok(WatcherEvent::Loaded(records)) => return Some(records),
            Ok(WatcherEvent::Log(_)) => continue,
            Err(_) => return None,
        }
    }
}

fn wait_for_log(events: &Receiver<WatcherEvent>, prefix: &str, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        match events.recv_timeout(remaining) {
            Ok(WatcherEvent::Log(log)) if log.entry.starts_with(prefix) => return true,
            Ok(_) => continue,
            Err(_) => return false,
        }
    }
    false
}

/// Options whose backup step always fails, so every file reaches the error callback
fn failing_backup_options(directory: &Path) -> WatcherOptions {
    let blocker = directory.join("blocker");
    File::create(&blocker).expect("Failed to create blocking file");
    options_for(directory).with_backup_directory(blocker.to_string_lossy())
}

fn error_collector() -> (Arc<Mutex<Vec<String>>>, impl Fn(&Error) + Send + Sync + 'static) {
    let collected = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&collected);
    (collected, move |err: &Error| {
        sink.lock().unwrap().push(err.to_string())
    })
}

#[test]
fn test_pass_handles_only_matching_files() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    touch(temp_dir.path(), &["a_1.csv", "b_2.csv", "note.txt"]);
    let watcher = watcher_for(options_for(temp_dir.path()).with_type_match("[^_]*"));
    let events = watcher.subscribe();

    let records = watcher.run_pass(|e| panic!("Unexpected error: {e}")).unwrap();

    let originals: Vec<&str> = records.iter().map(|r| r.original.as_str()).collect();
    assert_eq!(originals, vec!["a_1.csv", "b_2.csv"]);
    assert_eq!(records[0].file_type, "a");
    assert_eq!(records[1].file_type, "b");
    assert_eq!(records[0].counter, 0);
    assert_eq!(records[1].counter, 1);

    for record in &records {
        let renamed = record.renamed.as_deref().expect("File should be renamed");
        assert_eq!(
            renamed,
            format!("{}-{}-{}.dat", record.file_type, record.timestamp, record.counter)
        );
        assert!(temp_dir.path().join(renamed).exists());
        assert!(!temp_dir.path().join(&record.original).exists());
    }
    assert!(temp_dir.path().join("note.txt").exists());

    let (batches, logs) = drain(&events);
    assert_eq!(batches, vec![records]);
    assert!(logs.iter().all(|log| log.level == EventLevel::Info));
    assert_eq!(
        logs.iter()
            .filter(|log| log.entry.starts_with("File renamed: "))
            .count(),
        2
    );
}

#[test]
fn test_type_token_from_default_pattern() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    touch(temp_dir.path(), &["report-2024.csv"]);
    let watcher = watcher_for(options_for(temp_dir.path()).with_backup(false));

    let records = watcher.run_pass(|e| panic!("Unexpected error: {e}")).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_type, "report");
    let renamed = records[0].renamed.as_deref().unwrap();
    assert!(renamed.starts_with("report-"), "Unexpected name: {renamed}");
    assert!(renamed.ends_with("-0.dat"), "Unexpected name: {renamed}");
}

#[test]
fn test_busy_destination_is_skipped() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    touch(temp_dir.path(), &["report-2024.csv", "sales-1.csv", "fixed-0.dat"]);
    let watcher = watcher_for(
        options_for(temp_dir.path()).with_rename_template("fixed-[COUNTER].dat"),
    );
    let events = watcher.subscribe();
    let (errors, on_error) = error_collector();

    let records = watcher.run_pass(on_error).unwrap();

    assert_eq!(records.len(), 2, "The pass must continue after a busy file");
    assert_eq!(records[0].original, "report-2024.csv");
    assert_eq!(records[0].renamed, None);
    assert_eq!(records[1].renamed.as_deref(), Some("fixed-1.dat"));
    assert!(temp_dir.path().join("report-2024.csv").exists());
    assert!(temp_dir.path().join("fixed-1.dat").exists());

    // The busy file is backed up under the name it still has
    let backup_dir = temp_dir.path().join("_backup");
    assert!(backup_dir.join("report-2024.csv").exists());
    assert!(backup_dir.join("fixed-1.dat").exists());
    assert!(!backup_dir.join("fixed-0.dat").exists());

    let (_, logs) = drain(&events);
    let busy_entry = format!(
        "File busy/error, {}",
        temp_dir.path().join("fixed-0.dat").display()
    );
    assert!(
        logs.iter()
            .any(|log| log.level == EventLevel::Error && log.entry == busy_entry),
        "Missing busy log entry in {logs:?}"
    );
    assert!(errors.lock().unwrap().is_empty());
}

#[test]
fn test_backup_copies_renamed_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    touch(temp_dir.path(), &["orders-7.csv"]);
    let backup_dir = temp_dir.path().join("archive");
    let watcher = watcher_for(
        options_for(temp_dir.path()).with_backup_directory(backup_dir.to_string_lossy()),
    );
    let events = watcher.subscribe();

    let records = watcher.run_pass(|e| panic!("Unexpected error: {e}")).unwrap();
    let renamed = records[0].renamed.clone().unwrap();

    assert!(backup_dir.join(&renamed).exists());
    assert!(!backup_dir.join("orders-7.csv").exists());
    assert!(
        temp_dir.path().join(&renamed).exists(),
        "The renamed file stays in the watched directory"
    );

    let (_, logs) = drain(&events);
    assert!(
        logs.iter()
            .any(|log| log.entry == format!("File backup: {renamed}"))
    );
}

#[test]
fn test_backup_without_rename_is_idempotent() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    touch(temp_dir.path(), &["orders-7.csv"]);
    let watcher = watcher_for(options_for(temp_dir.path()).with_rename(false));
    let (errors, on_error) = error_collector();

    let first = watcher.run_pass(&on_error).unwrap();
    let second = watcher.run_pass(&on_error).unwrap();

    assert_eq!(first[0].renamed, None);
    assert_eq!(second[0].original, "orders-7.csv");
    assert!(temp_dir.path().join("_backup").join("orders-7.csv").exists());
    assert!(errors.lock().unwrap().is_empty());
}

#[test]
fn test_rename_and_backup_disabled() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    touch(temp_dir.path(), &["orders-7.csv"]);
    let watcher = watcher_for(
        options_for(temp_dir.path())
            .with_rename(false)
            .with_backup(false),
    );

    let records = watcher.run_pass(|e| panic!("Unexpected error: {e}")).unwrap();

    assert_eq!(records.len(), 1);
    assert!(temp_dir.path().join("orders-7.csv").exists());
    assert!(!temp_dir.path().join("_backup").exists());
}

#[test]
fn test_empty_pass_emits_nothing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    touch(temp_dir.path(), &["note.txt"]);
    let watcher = watcher_for(options_for(temp_dir.path()));
    let events = watcher.subscribe();

    let records = watcher.run_pass(|e| panic!("Unexpected error: {e}")).unwrap();

    assert!(records.is_empty());
    let (batches, logs) = drain(&events);
    assert!(batches.is_empty());
    assert!(logs.is_empty());
}

#[test]
fn test_missing_directory_reported() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing");
    let watcher = watcher_for(options_for(&missing));
    let events = watcher.subscribe();
    let (errors, on_error) = error_collector();

    assert!(watcher.run_pass(on_error).is_none());

    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Directory not found"));
    let (batches, logs) = drain(&events);
    assert!(batches.is_empty());
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].level, EventLevel::Error);
}

#[test]
fn test_start_once_runs_single_pass() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    touch(temp_dir.path(), &["a-1.csv"]);
    let watcher = watcher_for(options_for(temp_dir.path()));
    let events = watcher.subscribe();

    watcher.start(|e| panic!("Unexpected error: {e}")).unwrap();

    assert!(!watcher.is_running());
    let (batches, logs) = drain(&events);
    assert_eq!(batches.len(), 1);
    assert_eq!(
        logs[0].entry,
        format!("Start listening for files at {}", temp_dir.path().display())
    );
}

#[test]
fn test_schedule_repeats_passes() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let watcher = watcher_for(options_for(temp_dir.path()).with_interval(50));
    let events = watcher.subscribe();

    watcher.start(|e| panic!("Unexpected error: {e}")).unwrap();
    assert!(watcher.is_running());

    touch(temp_dir.path(), &["late-1.csv"]);
    let batch = next_batch(&events, Duration::from_secs(5))
        .expect("A scheduled pass should pick up the new file");

    assert_eq!(batch[0].original, "late-1.csv");
    watcher.stop();
    assert!(!watcher.is_running());
}

#[test]
fn test_stop_prevents_scheduled_passes() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let watcher = watcher_for(options_for(temp_dir.path()).with_interval(200));
    let events = watcher.subscribe();

    watcher.start(|e| panic!("Unexpected error: {e}")).unwrap();
    watcher.stop();
    touch(temp_dir.path(), &["after-stop.csv"]);
    thread::sleep(Duration::from_millis(500));

    let (batches, logs) = drain(&events);
    assert!(batches.is_empty(), "No pass may run after stop");
    assert!(temp_dir.path().join("after-stop.csv").exists());
    assert_eq!(logs.last().map(|log| log.entry.as_str()), Some("Listener stopped"));
}

#[test]
fn test_stop_during_first_pass_lets_it_finish() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let options = failing_backup_options(temp_dir.path()).with_interval(50);
    touch(temp_dir.path(), &["a-1.csv", "b-2.csv"]);
    let watcher = Arc::new(watcher_for(options));
    let events = watcher.subscribe();
    let stopper = Arc::clone(&watcher);

    watcher
        .start(move |_| {
            let stopper = Arc::clone(&stopper);
            thread::spawn(move || stopper.stop()).join().unwrap();
        })
        .unwrap();

    assert!(!watcher.is_running());
    let batch = next_batch(&events, Duration::from_secs(1))
        .expect("The interrupted pass should still report its batch");
    assert_eq!(batch.len(), 2);

    touch(temp_dir.path(), &["c-3.csv"]);
    thread::sleep(Duration::from_millis(300));
    let (batches, _) = drain(&events);
    assert!(batches.is_empty(), "No pass may run after stop");
    assert!(temp_dir.path().join("c-3.csv").exists());
}

#[test]
fn test_stop_during_scheduled_pass_lets_it_finish() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let options = failing_backup_options(temp_dir.path()).with_interval(50);
    let watcher = Arc::new(watcher_for(options));
    let events = watcher.subscribe();
    let stopper = Arc::clone(&watcher);

    watcher.start(move |_| stopper.stop()).unwrap();
    assert!(watcher.is_running());

    touch(temp_dir.path(), &["a-1.csv", "b-2.csv"]);
    let batch = next_batch(&events, Duration::from_secs(5))
        .expect("The interrupted pass should still report its batch");
    assert!(!batch.is_empty());
    assert!(!watcher.is_running());

    thread::sleep(Duration::from_millis(300));
    let (batches, logs) = drain(&events);
    assert!(batches.is_empty(), "No pass may run after stop");
    assert!(!logs.iter().any(|log| log.entry.starts_with("File renamed: ")));
}

#[test]
fn test_stop_racing_start_leaves_nothing_scheduled() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    for _ in 0..200 {
        let watcher = watcher_for(options_for(temp_dir.path()).with_interval(1000));
        let events = watcher.subscribe();
        let watcher = &watcher;

        thread::scope(|scope| {
            scope.spawn(move || {
                assert!(wait_for_log(
                    &events,
                    "Start listening",
                    Duration::from_secs(5)
                ));
                watcher.stop();
            });
            watcher.start(|_| {}).unwrap();
        });

        assert!(!watcher.is_running(), "A schedule survived a completed stop");
    }
}

#[test]
fn test_stop_is_idempotent() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let watcher = watcher_for(options_for(temp_dir.path()).with_interval(100));

    watcher.stop();
    watcher.start(|_| {}).unwrap();
    watcher.stop();
    watcher.stop();

    assert!(!watcher.is_running());
}

#[test]
fn test_start_twice_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let watcher = watcher_for(options_for(temp_dir.path()).with_interval(1000));

    watcher.start(|_| {}).unwrap();
    let error = watcher.start(|_| {}).unwrap_err();

    assert!(matches!(error, Error::AlreadyRunning { .. }));
    watcher.stop();
}

#[test]
fn test_schedule_survives_pass_errors() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing");
    let watcher = watcher_for(options_for(&missing).with_interval(30));
    let failures = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&failures);

    watcher
        .start(move |err| {
            assert!(err.is_pass_level());
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    thread::sleep(Duration::from_millis(250));
    watcher.stop();

    assert!(
        failures.load(Ordering::SeqCst) >= 2,
        "Scheduled passes should keep running after a failed pass"
    );
}

#[test]
fn test_concurrent_passes_are_serialised() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let names: Vec<String> = (0..20).map(|i| format!("batch-{i:02}.csv")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    touch(temp_dir.path(), &name_refs);
    let watcher = Arc::new(watcher_for(options_for(temp_dir.path())));
    let (errors, on_error) = error_collector();
    let on_error = Arc::new(on_error);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let watcher = Arc::clone(&watcher);
            let on_error = Arc::clone(&on_error);
            thread::spawn(move || watcher.run_pass(|e| on_error(e)).unwrap().len())
        })
        .collect();
    let handled: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(handled, 20, "Each file is handled by exactly one pass");
    assert!(errors.lock().unwrap().is_empty());
    assert_eq!(
        fs::read_dir(temp_dir.path().join("_backup")).unwrap().count(),
        20
    );
}

#[test]
fn test_read_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("note.txt"), "hello").unwrap();
    let watcher = watcher_for(options_for(temp_dir.path()));
    let events = watcher.subscribe();

    assert_eq!(watcher.read_file("note.txt").unwrap(), "hello");
    assert!(watcher.read_file("absent.txt").is_err());

    let (_, logs) = drain(&events);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].level, EventLevel::Error);
}
