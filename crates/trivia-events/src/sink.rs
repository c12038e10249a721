//! CSV event sink: one comma-separated row per event.
//!
//! Column order matches the process-mining log consumed downstream:
//!
//! ```text
//! Session_ID,Player_ID,Activity,Timestamp,Category,Question_Value,Answer_Given,Result,Score_After_Play
//! ```
//!
//! Absent optional fields become empty cells. System events (no player)
//! carry `System` in the player column.

use std::io::Write;

use chrono::SecondsFormat;
use trivia_types::Event;

use crate::EventError;
use crate::bus::{EventObserver, ObserverError};

/// Header row written by [`CsvEventWriter::new`].
pub const CSV_HEADER: [&str; 9] = [
    "Session_ID",
    "Player_ID",
    "Activity",
    "Timestamp",
    "Category",
    "Question_Value",
    "Answer_Given",
    "Result",
    "Score_After_Play",
];

/// Player column value for events without a player.
const SYSTEM_PLAYER: &str = "System";

/// Streams events as CSV rows into any [`Write`] target.
///
/// Also usable as a live [`EventObserver`], in which case each published
/// event is written and flushed immediately.
#[derive(Debug)]
pub struct CsvEventWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> CsvEventWriter<W> {
    /// Create a writer and emit the header row.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Csv`] if the header cannot be written.
    pub fn new(writer: W) -> Result<Self, EventError> {
        let mut sink = Self::without_header(writer);
        sink.inner.write_record(CSV_HEADER)?;
        Ok(sink)
    }

    /// Create a writer that appends rows without a header, e.g. to an
    /// existing log file.
    pub fn without_header(writer: W) -> Self {
        Self {
            inner: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer),
        }
    }

    /// Write one event as a CSV row.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Csv`] if the row cannot be written.
    pub fn write_event(&mut self, event: &Event) -> Result<(), EventError> {
        self.inner.write_record(event_row(event))?;
        Ok(())
    }

    /// Flush buffered rows to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Io`] if flushing fails.
    pub fn flush(&mut self) -> Result<(), EventError> {
        self.inner.flush()?;
        Ok(())
    }
}

impl<W: Write> EventObserver for CsvEventWriter<W> {
    fn name(&self) -> &str {
        "csv-sink"
    }

    fn on_event(&mut self, event: &Event) -> Result<(), ObserverError> {
        self.write_event(event)
            .and_then(|()| self.flush())
            .map_err(|e| ObserverError::new(e.to_string()))
    }
}

/// Render an event as the nine CSV columns.
pub fn event_row(event: &Event) -> [String; 9] {
    [
        event.session_id.to_string(),
        event
            .player_id
            .clone()
            .unwrap_or_else(|| SYSTEM_PLAYER.to_owned()),
        event.activity.label().to_owned(),
        event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        event.category.clone().unwrap_or_default(),
        event
            .question_value
            .map(|v| v.to_string())
            .unwrap_or_default(),
        event.answer_given.clone().unwrap_or_default(),
        event
            .result
            .map(|r| r.label().to_owned())
            .unwrap_or_default(),
        event
            .score_after_play
            .map(|s| s.to_string())
            .unwrap_or_default(),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use trivia_types::{Activity, AnswerResult, SessionId};

    use super::*;
    use crate::EventBuilder;

    #[test]
    fn score_update_row_has_every_column() {
        let session = SessionId::new();
        let event = EventBuilder::new(session, Activity::ScoreUpdated)
            .player("Ada")
            .category("General, Misc")
            .question_value(200)
            .answer_given("C")
            .result(AnswerResult::Wrong)
            .score_after_play(-150)
            .build()
            .unwrap();

        let mut buffer = Vec::new();
        {
            let mut sink = CsvEventWriter::without_header(&mut buffer);
            sink.write_event(&event).unwrap();
            sink.flush().unwrap();
        }
        let line = String::from_utf8(buffer).unwrap();

        assert!(line.starts_with(&session.to_string()));
        assert!(line.contains(",Ada,Score Updated,"));
        assert!(line.contains(",\"General, Misc\",200,C,Wrong,-150"));
    }

    #[test]
    fn system_event_uses_system_player_and_empty_cells() {
        let event = EventBuilder::new(SessionId::new(), Activity::ExitGame)
            .build()
            .unwrap();
        let row = event_row(&event);

        assert_eq!(row.get(1).map(String::as_str), Some("System"));
        assert_eq!(row.get(2).map(String::as_str), Some("Exit Game"));
        assert!(row.iter().skip(4).all(String::is_empty));
    }

    #[test]
    fn observer_mode_writes_each_published_event() {
        let mut buffer = Vec::new();
        {
            let mut sink = CsvEventWriter::new(&mut buffer).unwrap();
            let event = EventBuilder::new(SessionId::new(), Activity::StartGame)
                .build()
                .unwrap();
            assert!(sink.on_event(&event).is_ok());
        }
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(text.lines().next(), Some(CSV_HEADER.join(",").as_str()));
    }
}
