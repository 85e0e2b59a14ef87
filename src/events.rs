//! Structured event emission.
//!
//! The organizer reports every move and folder attempt as an [`Event`]
//! through an [`EventSink`] injected at construction. The sink owns
//! formatting and persistence; the core never touches a log format, and
//! multiple sessions can run side by side without shared global state.

use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

/// Severity of an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// A completed move or folder operation.
    Info,
    /// A per-entry failure that did not abort the pass.
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

/// One organizer event: when it happened, how severe it was, what it says.
#[derive(Debug, Clone)]
pub struct Event {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

impl Event {
    /// An informational event stamped with the current local time.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level: Level::Info,
            message: message.into(),
        }
    }

    /// An error event stamped with the current local time.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Receiver for organizer events.
///
/// Implementations must not fail the caller: the organizer treats emission
/// as infallible, so a sink that hits trouble has to swallow it.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Append-only text sink, one line per event.
///
/// This is the default logging collaborator wired up by the CLI adapter,
/// pointed at `organization_log.txt` inside the organized directory.
pub struct LogFileSink {
    file: File,
}

impl LogFileSink {
    /// Opens the log file for appending, creating it if absent.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl EventSink for LogFileSink {
    fn emit(&mut self, event: Event) {
        // A failing sink must not abort the organize/undo pass.
        let _ = writeln!(
            self.file,
            "{} - {} - {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.level,
            event.message
        );
    }
}

/// In-memory sink that records every event it receives.
///
/// Clones share the same buffer, so a test or embedding front end can keep
/// a handle while the organizer owns the sink itself.
///
/// # Examples
///
/// ```
/// use sortbox::events::{Event, EventSink, MemorySink};
///
/// let handle = MemorySink::new();
/// let mut sink = handle.clone();
/// sink.emit(Event::info("moved a file"));
/// assert_eq!(handle.events().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Rc<RefCell<Vec<Event>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}
