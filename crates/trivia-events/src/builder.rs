//! Event builder and per-activity field validation.
//!
//! Provides an [`EventBuilder`] that accumulates optional fields and checks,
//! at [`build`](EventBuilder::build) time, that every field the activity
//! needs is present. A `Score Updated` event without a `scoreAfterPlay`, for
//! instance, would make the report unreconstructable, so it is refused.

use chrono::{DateTime, Utc};
use trivia_types::{Activity, AnswerResult, Event, EventId, SessionId};

use crate::EventError;

// ---------------------------------------------------------------------------
// Event builder
// ---------------------------------------------------------------------------

/// Builder for constructing validated [`Event`] values.
///
/// # Examples
///
/// ```
/// use trivia_events::EventBuilder;
/// use trivia_types::{Activity, AnswerResult, SessionId};
///
/// let event = EventBuilder::new(SessionId::new(), Activity::ScoreUpdated)
///     .player("Ada")
///     .category("General")
///     .question_value(100)
///     .answer_given("A")
///     .result(AnswerResult::Correct)
///     .score_after_play(100)
///     .build();
///
/// assert!(event.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBuilder {
    session_id: SessionId,
    activity: Activity,
    timestamp: DateTime<Utc>,
    player_id: Option<String>,
    category: Option<String>,
    question_value: Option<u32>,
    question_text: Option<String>,
    answer_given: Option<String>,
    result: Option<AnswerResult>,
    score_after_play: Option<i64>,
    detail: Option<String>,
}

impl EventBuilder {
    /// Start building an event for the given session and activity,
    /// timestamped now.
    pub fn new(session_id: SessionId, activity: Activity) -> Self {
        Self {
            session_id,
            activity,
            timestamp: Utc::now(),
            player_id: None,
            category: None,
            question_value: None,
            question_text: None,
            answer_given: None,
            result: None,
            score_after_play: None,
            detail: None,
        }
    }

    /// Override the timestamp (useful for tests and replays).
    #[must_use]
    pub const fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the acting player's name.
    #[must_use]
    pub fn player(mut self, name: impl Into<String>) -> Self {
        self.player_id = Some(name.into());
        self
    }

    /// Set the category name.
    #[must_use]
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    /// Set the question's point value.
    #[must_use]
    pub const fn question_value(mut self, points: u32) -> Self {
        self.question_value = Some(points);
        self
    }

    /// Set the question text.
    #[must_use]
    pub fn question_text(mut self, text: impl Into<String>) -> Self {
        self.question_text = Some(text.into());
        self
    }

    /// Set the submitted answer key.
    #[must_use]
    pub fn answer_given(mut self, key: impl Into<String>) -> Self {
        self.answer_given = Some(key.into());
        self
    }

    /// Set the scoring result.
    #[must_use]
    pub const fn result(mut self, result: AnswerResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Set the player's score after this play.
    #[must_use]
    pub const fn score_after_play(mut self, score: i64) -> Self {
        self.score_after_play = Some(score);
        self
    }

    /// Set a free-form detail string.
    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Validate the accumulated fields and produce an immutable [`Event`].
    ///
    /// # Errors
    ///
    /// Returns [`EventError::MissingField`] if a field required by the
    /// activity is unset (see [`required_fields`]).
    pub fn build(self) -> Result<Event, EventError> {
        for &field in required_fields(self.activity) {
            let present = match field {
                EventField::PlayerId => self.player_id.is_some(),
                EventField::Category => self.category.is_some(),
                EventField::QuestionValue => self.question_value.is_some(),
                EventField::AnswerGiven => self.answer_given.is_some(),
                EventField::Result => self.result.is_some(),
                EventField::ScoreAfterPlay => self.score_after_play.is_some(),
            };
            if !present {
                return Err(EventError::MissingField {
                    activity: self.activity,
                    field,
                });
            }
        }

        Ok(Event {
            id: EventId::new(),
            session_id: self.session_id,
            activity: self.activity,
            timestamp: self.timestamp,
            player_id: self.player_id,
            category: self.category,
            question_value: self.question_value,
            question_text: self.question_text,
            answer_given: self.answer_given,
            result: self.result,
            score_after_play: self.score_after_play,
            detail: self.detail,
        })
    }
}

// ---------------------------------------------------------------------------
// Required fields
// ---------------------------------------------------------------------------

/// An optional event field that some activities require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventField {
    /// The acting player.
    PlayerId,
    /// The category name.
    Category,
    /// The question's point value.
    QuestionValue,
    /// The submitted answer key.
    AnswerGiven,
    /// The scoring result.
    Result,
    /// The player's score after the play.
    ScoreAfterPlay,
}

impl EventField {
    /// Field name as it appears on [`Event`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::PlayerId => "player_id",
            Self::Category => "category",
            Self::QuestionValue => "question_value",
            Self::AnswerGiven => "answer_given",
            Self::Result => "result",
            Self::ScoreAfterPlay => "score_after_play",
        }
    }
}

impl core::fmt::Display for EventField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields that must be set for each activity.
///
/// System activities need nothing beyond the session and timestamp; turn
/// activities accumulate requirements as the turn progresses.
pub const fn required_fields(activity: Activity) -> &'static [EventField] {
    use EventField::{AnswerGiven, Category, PlayerId, QuestionValue, Result, ScoreAfterPlay};

    match activity {
        Activity::EnterPlayerName => &[PlayerId],
        Activity::SelectCategory => &[PlayerId, Category],
        Activity::SelectQuestion => &[PlayerId, Category, QuestionValue],
        Activity::AnswerQuestion => &[PlayerId, Category, QuestionValue, AnswerGiven],
        Activity::ScoreUpdated => &[
            PlayerId,
            Category,
            QuestionValue,
            AnswerGiven,
            Result,
            ScoreAfterPlay,
        ],
        Activity::StartGame
        | Activity::LoadFile
        | Activity::FileLoaded
        | Activity::SelectPlayerCount
        | Activity::ExitGame
        | Activity::GenerateReport
        | Activity::GenerateEventLog => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_event_needs_no_optional_fields() {
        let event = EventBuilder::new(SessionId::new(), Activity::StartGame).build();
        assert!(event.is_ok());
        assert!(event.is_ok_and(|e| e.is_system()));
    }

    #[test]
    fn score_update_requires_score_after_play() {
        let event = EventBuilder::new(SessionId::new(), Activity::ScoreUpdated)
            .player("Ada")
            .category("General")
            .question_value(100)
            .answer_given("A")
            .result(AnswerResult::Correct)
            .build();

        assert!(matches!(
            event,
            Err(EventError::MissingField {
                activity: Activity::ScoreUpdated,
                field: EventField::ScoreAfterPlay,
            })
        ));
    }

    #[test]
    fn select_category_requires_player() {
        let event = EventBuilder::new(SessionId::new(), Activity::SelectCategory)
            .category("General")
            .build();
        assert!(matches!(
            event,
            Err(EventError::MissingField {
                field: EventField::PlayerId,
                ..
            })
        ));
    }

    #[test]
    fn missing_field_message_names_the_field() {
        let event = EventBuilder::new(SessionId::new(), Activity::AnswerQuestion)
            .player("Ada")
            .category("General")
            .question_value(100)
            .build()
            .map_err(|e| e.to_string());
        assert_eq!(
            event.err().as_deref(),
            Some("Answer Question event is missing required field: answer_given")
        );
    }

    #[test]
    fn every_required_field_is_checked() {
        let activities = [
            Activity::EnterPlayerName,
            Activity::SelectCategory,
            Activity::SelectQuestion,
            Activity::AnswerQuestion,
            Activity::ScoreUpdated,
        ];
        for activity in activities {
            let missing = EventBuilder::new(SessionId::new(), activity).build();
            assert!(
                matches!(
                    missing,
                    Err(EventError::MissingField {
                        field: EventField::PlayerId,
                        ..
                    })
                ),
                "{activity} should require a player"
            );
        }
        assert_eq!(required_fields(Activity::ScoreUpdated).len(), 6);
        assert!(required_fields(Activity::GenerateEventLog).is_empty());
    }

    #[test]
    fn built_event_carries_every_field() {
        let session = SessionId::new();
        let timestamp = Utc::now();
        let event = EventBuilder::new(session, Activity::SelectQuestion)
            .at(timestamp)
            .player("Ada")
            .category("Science")
            .question_value(300)
            .question_text("What is H2O?")
            .build();

        let Ok(event) = event else {
            assert!(event.is_ok(), "select question event should build");
            return;
        };
        assert_eq!(event.session_id, session);
        assert_eq!(event.timestamp, timestamp);
        assert_eq!(event.player_id.as_deref(), Some("Ada"));
        assert_eq!(event.category.as_deref(), Some("Science"));
        assert_eq!(event.question_value, Some(300));
        assert_eq!(event.question_text.as_deref(), Some("What is H2O?"));
        assert!(event.answer_given.is_none());
        assert!(event.result.is_none());
    }

    #[test]
    fn event_roundtrips_through_json() {
        let event = EventBuilder::new(SessionId::new(), Activity::SelectPlayerCount)
            .detail("2 players selected")
            .build();
        let Ok(event) = event else { return };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"Select Player Count\""));
        let restored: Result<trivia_types::Event, _> = serde_json::from_str(&json);
        assert_eq!(restored.ok(), Some(event));
    }
}
