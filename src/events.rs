//! Watcher events
//!
//! Everything a watcher reports flows through an [`EventBus`]: the batch of
//! files found by a pass and every log entry. Each subscriber owns its own
//! channel receiver; dropping the receiver unsubscribes.

use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use serde::Serialize;

/// A file handled during one pass
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Name the file had when the pass found it
    pub original: String,
    /// Name after renaming; absent when the file kept its name
    pub renamed: Option<String>,
    /// Milliseconds since the Unix epoch at which the file was processed
    pub timestamp: i64,
    /// Position of the file within the pass, starting at zero
    pub counter: usize,
    /// Type token extracted from the original name
    #[serde(rename = "type")]
    pub file_type: String,
}

impl FileRecord {
    /// The name the file currently has in the watched directory
    pub fn current_name(&self) -> &str {
        self.renamed.as_deref().unwrap_or(&self.original)
    }
}

/// Severity of a log entry
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Error,
}

/// A log entry emitted by a watcher
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub entry: String,
    pub level: EventLevel,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl LogEvent {
    pub fn info(entry: impl Into<String>) -> Self {
        Self::new(entry.into(), EventLevel::Info)
    }

    pub fn error(entry: impl Into<String>) -> Self {
        Self::new(entry.into(), EventLevel::Error)
    }

    fn new(entry: String, level: EventLevel) -> Self {
        LogEvent {
            entry,
            level,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Notification delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherEvent {
    /// A pass found at least one file
    Loaded(Vec<FileRecord>),
    /// A lifecycle or step notification
    Log(LogEvent),
}

/// Fan-out of watcher events to any number of subscribers
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<WatcherEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber and returns its receiving end
    pub fn subscribe(&self) -> Receiver<WatcherEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Sends `event` to every live subscriber
    ///
    /// Subscribers whose receiver was dropped are removed.
    pub fn emit(&self, event: WatcherEvent) {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        if subscribers.len() < before {
            log::debug!("Dropped {} closed subscriber(s)", before - subscribers.len());
        }
    }

    /// Emits a log entry and mirrors it to the `log` facade
    pub fn log(&self, event: LogEvent) {
        match event.level {
            EventLevel::Info => log::info!("{}", event.entry),
            EventLevel::Error => log::error!("{}", event.entry),
        }
        self.emit(WatcherEvent::Log(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(counter: usize, renamed: Option<&str>) -> FileRecord {
        FileRecord {
            original: format!("report-{counter}.csv"),
            renamed: renamed.map(str::to_string),
            timestamp: 1_700_000_000_000,
            counter,
            file_type: "report".to_string(),
        }
    }

    #[test]
    fn test_every_subscriber_receives_events() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.emit(WatcherEvent::Loaded(vec![record(0, None)]));

        assert_eq!(
            first.try_recv().unwrap(),
            WatcherEvent::Loaded(vec![record(0, None)])
        );
        assert_eq!(
            second.try_recv().unwrap(),
            WatcherEvent::Loaded(vec![record(0, None)])
        );
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscribers.lock().len(), 2);

        bus.log(LogEvent::info("Start listening for files at /tmp"));

        assert_eq!(bus.subscribers.lock().len(), 1);
        match kept.try_recv().unwrap() {
            WatcherEvent::Log(event) => {
                assert_eq!(event.level, EventLevel::Info);
                assert_eq!(event.entry, "Start listening for files at /tmp");
            }
            other => panic!("Unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new();
        bus.emit(WatcherEvent::Log(LogEvent::error("nobody listens")));
        assert_eq!(bus.subscribers.lock().len(), 0);
    }

    #[test]
    fn test_current_name() {
        assert_eq!(record(0, None).current_name(), "report-0.csv");
        assert_eq!(
            record(1, Some("report-1-1.dat")).current_name(),
            "report-1-1.dat"
        );
    }

    #[test]
    fn test_record_serialises_type_field() {
        let yaml = serde_yaml::to_string(&record(0, Some("report-1-0.dat"))).unwrap();
        assert!(yaml.contains("type: report"), "Unexpected YAML: {yaml}");
        assert!(yaml.contains("renamed: report-1-0.dat"));
    }

    #[test]
    fn test_log_event_level_serialises_lowercase() {
        let yaml = serde_yaml::to_string(&LogEvent::error("boom")).unwrap();
        assert!(yaml.contains("level: error"), "Unexpected YAML: {yaml}");
    }
}
