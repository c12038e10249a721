//! Core entity structs: questions, categories, players, and events.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Activity, AnswerResult};
use crate::ids::{EventId, SessionId};

/// Errors raised when constructing or mutating model values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A question was created without any answer options.
    #[error("question {text:?} has no answer options")]
    NoOptions {
        /// The question text.
        text: String,
    },

    /// The correct key does not name one of the question's options.
    #[error("correct key {correct_key:?} is not one of the options of {text:?}")]
    CorrectKeyNotAnOption {
        /// The question text.
        text: String,
        /// The offending key.
        correct_key: String,
    },

    /// Two option keys are the same once case and surrounding whitespace
    /// are ignored.
    #[error("question {text:?} has more than one option keyed {key:?}")]
    DuplicateOptionKey {
        /// The question text.
        text: String,
        /// The repeated key, as it appears on the later option.
        key: String,
    },

    /// A category already holds a question with this point value.
    #[error("category {category:?} already has a {points}-point question")]
    DuplicatePointValue {
        /// The category name.
        category: String,
        /// The duplicated point value.
        points: u32,
    },

    /// A score adjustment would overflow the score range.
    #[error("score overflow for player {player:?}")]
    ScoreOverflow {
        /// The player's name.
        player: String,
    },
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// A single point-valued question with keyed answer options.
///
/// The `answered` flag starts `false` and can only ever be flipped to
/// `true` (see [`Question::mark_answered`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    points: u32,
    options: BTreeMap<String, String>,
    correct_key: String,
    answered: bool,
}

impl Question {
    /// Create an unanswered question.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoOptions`] for an empty option map,
    /// [`ModelError::DuplicateOptionKey`] when two keys differ only by case
    /// or whitespace, and [`ModelError::CorrectKeyNotAnOption`] when
    /// `correct_key` does not match any option key (compared
    /// case-insensitively).
    pub fn new(
        text: impl Into<String>,
        points: u32,
        options: BTreeMap<String, String>,
        correct_key: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let text = text.into();
        let correct_key = correct_key.into();

        if options.is_empty() {
            return Err(ModelError::NoOptions { text });
        }

        let mut seen: Vec<&str> = Vec::with_capacity(options.len());
        for key in options.keys() {
            let key = key.trim();
            if seen.iter().any(|earlier| earlier.eq_ignore_ascii_case(key)) {
                return Err(ModelError::DuplicateOptionKey {
                    text,
                    key: key.to_owned(),
                });
            }
            seen.push(key);
        }

        let canonical = options
            .keys()
            .find(|key| key.eq_ignore_ascii_case(correct_key.trim()))
            .cloned();

        match canonical {
            Some(correct_key) => Ok(Self {
                text,
                points,
                options,
                correct_key,
                answered: false,
            }),
            None => Err(ModelError::CorrectKeyNotAnOption { text, correct_key }),
        }
    }

    /// The question text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The point value, awarded or deducted on answer.
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// All answer options keyed by answer key.
    pub const fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// The key of the correct option.
    pub fn correct_key(&self) -> &str {
        &self.correct_key
    }

    /// Whether a player has already answered this question.
    pub const fn is_answered(&self) -> bool {
        self.answered
    }

    /// Resolve a user-supplied key to the canonical option key.
    pub fn option_key(&self, key: &str) -> Option<&str> {
        let key = key.trim();
        self.options
            .keys()
            .find(|candidate| candidate.eq_ignore_ascii_case(key))
            .map(String::as_str)
    }

    /// Display text of the option with the given key, if any.
    pub fn option_text(&self, key: &str) -> Option<&str> {
        let canonical = self.option_key(key)?;
        self.options.get(canonical).map(String::as_str)
    }

    /// Whether `key` is the correct answer (case-insensitive).
    pub fn is_correct(&self, key: &str) -> bool {
        self.correct_key.eq_ignore_ascii_case(key.trim())
    }

    /// Flip the answered flag. Returns `false` if it was already set, in
    /// which case nothing changes.
    pub const fn mark_answered(&mut self) -> bool {
        if self.answered {
            return false;
        }
        self.answered = true;
        true
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A named, ordered group of questions.
///
/// A category always owns a (possibly empty) question list, and point
/// values are unique within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    name: String,
    questions: Vec<Question>,
}

impl Category {
    /// Create a category with no questions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            questions: Vec::new(),
        }
    }

    /// The category name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All questions in insertion order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Append a question.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicatePointValue`] if a question with the same
    /// point value already exists in this category.
    pub fn add_question(&mut self, question: Question) -> Result<(), ModelError> {
        if self.question(question.points()).is_some() {
            return Err(ModelError::DuplicatePointValue {
                category: self.name.clone(),
                points: question.points(),
            });
        }
        self.questions.push(question);
        Ok(())
    }

    /// Look up a question by point value.
    pub fn question(&self, points: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.points() == points)
    }

    /// Mutable lookup by point value.
    pub fn question_mut(&mut self, points: u32) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.points() == points)
    }

    /// Questions that have not been answered yet, in order.
    pub fn remaining_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| !q.is_answered())
    }

    /// Whether at least one question is still unanswered.
    pub fn has_remaining(&self) -> bool {
        self.questions.iter().any(|q| !q.is_answered())
    }

    /// Move every question of `other` into this category, keeping the
    /// point-value uniqueness invariant.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicatePointValue`] on the first clash.
    pub fn merge(&mut self, other: Self) -> Result<(), ModelError> {
        for question in other.questions {
            self.add_question(question)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A registered player with a position in the turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable 0-based position in the turn order.
    pub index: usize,
    /// Display name, fixed at registration.
    pub name: String,
    /// Current score; may go negative.
    pub score: i64,
}

impl Player {
    /// Create a player with a zero score.
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            score: 0,
        }
    }

    /// Add `delta` (possibly negative) to the score and return the new score.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ScoreOverflow`] instead of wrapping.
    pub fn apply_delta(&mut self, delta: i64) -> Result<i64, ModelError> {
        self.score = self
            .score
            .checked_add(delta)
            .ok_or_else(|| ModelError::ScoreOverflow {
                player: self.name.clone(),
            })?;
        Ok(self.score)
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An immutable record of a single session transition.
///
/// Events are never revised after construction; the event log replays them
/// in insertion order to rebuild the session narrative. Use the event
/// builder in the events crate to construct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// The session this event belongs to.
    pub session_id: SessionId,
    /// What happened.
    pub activity: Activity,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Name of the acting player; `None` for system events.
    pub player_id: Option<String>,
    /// Category involved, if any.
    pub category: Option<String>,
    /// Point value of the question involved, if any.
    pub question_value: Option<u32>,
    /// Text of the question involved, if any.
    pub question_text: Option<String>,
    /// Answer key submitted by the player, if any.
    pub answer_given: Option<String>,
    /// Scoring result, if any.
    pub result: Option<AnswerResult>,
    /// The player's score right after this event, if any.
    pub score_after_play: Option<i64>,
    /// Free-form detail for system events (e.g. `"2 players selected"`).
    pub detail: Option<String>,
}

impl Event {
    /// Whether no player is attached to this event.
    pub const fn is_system(&self) -> bool {
        self.player_id.is_none()
    }
}
