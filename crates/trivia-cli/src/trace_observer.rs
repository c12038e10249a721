//! Event observer that mirrors every session event into the tracing log.

use tracing::{debug, info};
use trivia_events::{EventObserver, ObserverError};
use trivia_types::{AnswerResult, Event};

/// Logs each event it receives. Turn events go out at `info`, system
/// events at `debug`.
#[derive(Debug, Default)]
pub struct TracingObserver {
    seen: usize,
}

impl TracingObserver {
    /// Create an observer that has seen no events.
    pub const fn new() -> Self {
        Self { seen: 0 }
    }

    /// Number of events logged so far.
    pub const fn seen(&self) -> usize {
        self.seen
    }
}

impl EventObserver for TracingObserver {
    fn name(&self) -> &str {
        "tracing"
    }

    fn on_event(&mut self, event: &Event) -> Result<(), ObserverError> {
        self.seen = self.seen.saturating_add(1);
        if event.activity.is_turn_activity() {
            info!(
                session_id = %event.session_id,
                activity = %event.activity,
                player = event.player_id.as_deref().unwrap_or_default(),
                category = event.category.as_deref().unwrap_or_default(),
                points = event.question_value,
                answer = event.answer_given.as_deref().unwrap_or_default(),
                result = event.result.map_or("", AnswerResult::label),
                score = event.score_after_play,
                "event"
            );
        } else {
            debug!(
                session_id = %event.session_id,
                activity = %event.activity,
                player = event.player_id.as_deref().unwrap_or("System"),
                detail = event.detail.as_deref().unwrap_or_default(),
                "event"
            );
        }
        Ok(())
    }
}
