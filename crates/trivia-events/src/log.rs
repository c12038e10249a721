//! The event log: an append-only, order-preserving record of a session.
//!
//! # Design
//!
//! - **Append-only**: events are never modified or removed.
//! - **Ordered**: insertion order is occurrence order; the report replays
//!   the log in exactly this order.
//! - **Single writer**: the log is filled by subscribing it to the
//!   [`EventBus`](crate::EventBus); everything else only reads it.

use std::io::Write;

use trivia_types::{Activity, Event};

use crate::bus::{EventObserver, ObserverError};
use crate::sink::CsvEventWriter;
use crate::EventError;

/// Ordered, append-only history of a session's events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    /// All events, in insertion order.
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Number of events recorded.
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log has no events.
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Append an event at the end of the log.
    pub fn append(&mut self, event: Event) {
        self.events.push(event);
    }

    /// All events in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterate over the events in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Events of a single activity, in insertion order.
    pub fn of_activity(&self, activity: Activity) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.activity == activity)
    }

    /// Number of events of a single activity.
    pub fn count_of(&self, activity: Activity) -> usize {
        self.of_activity(activity).count()
    }

    /// Write every event as CSV (header first) to `writer`.
    ///
    /// Returns the number of rows written, excluding the header.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if serialization or flushing fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize, EventError> {
        let mut sink = CsvEventWriter::new(writer)?;
        self.write_rows(&mut sink)
    }

    /// Write every event as CSV rows (no header) to an existing sink.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if serialization or flushing fails.
    pub fn write_rows<W: Write>(&self, sink: &mut CsvEventWriter<W>) -> Result<usize, EventError> {
        for event in &self.events {
            sink.write_event(event)?;
        }
        sink.flush()?;
        Ok(self.events.len())
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = core::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl EventObserver for EventLog {
    fn name(&self) -> &str {
        "event-log"
    }

    fn on_event(&mut self, event: &Event) -> Result<(), ObserverError> {
        self.append(event.clone());
        Ok(())
    }
}
