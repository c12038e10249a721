//! Move-provider trait, boundary validation, and a scripted implementation.
//!
//! During a turn the engine asks a [`MoveProvider`] for three decisions: a
//! category, a question within it, and an answer key. The provider could be
//! a console prompt, a bot, or a test script. Each answer is a [`Move`]:
//! a chosen identifier, an explicit invalid input, or an abort.
//!
//! Chosen identifiers are checked against the live board before the engine
//! acts on them (see [`check_category`], [`check_question`],
//! [`check_answer`]). A failed check is a [`Rejection`]: the engine logs it
//! and asks again. Rejected moves never emit events and never reach scoring.

use std::collections::VecDeque;

use trivia_board::Board;
use trivia_types::{Category, Player, Question};

/// One decision returned by a [`MoveProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move<T> {
    /// The provider picked this value.
    Chosen(T),
    /// The provider received input it could not interpret.
    Invalid {
        /// Human-readable reason, logged by the engine.
        reason: String,
    },
    /// The player chose to end the session.
    Abort,
}

impl<T> Move<T> {
    /// Shorthand for [`Move::Invalid`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// Supplies a player's decisions during a turn.
pub trait MoveProvider {
    /// Pick one of `offered` (categories with questions left) by name.
    fn choose_category(&mut self, player: &Player, offered: &[&Category]) -> Move<String>;

    /// Pick one of `offered` (unanswered questions in `category`) by point
    /// value.
    fn choose_question(
        &mut self,
        player: &Player,
        category: &str,
        offered: &[&Question],
    ) -> Move<u32>;

    /// Pick an answer key for `question`.
    fn choose_answer(&mut self, player: &Player, question: &Question) -> Move<String>;
}

/// Why a chosen identifier was refused at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// No category has this name.
    #[error("unknown category {0:?}")]
    UnknownCategory(String),

    /// The category exists but every question in it is answered.
    #[error("category {0:?} has no questions left")]
    CategoryExhausted(String),

    /// The category has no question with this point value.
    #[error("no {points}-point question in {category:?}")]
    UnknownQuestion {
        /// The chosen category.
        category: String,
        /// The requested point value.
        points: u32,
    },

    /// The question was already answered earlier in the session.
    #[error("the {points}-point question in {category:?} was already answered")]
    AlreadyAnswered {
        /// The chosen category.
        category: String,
        /// The requested point value.
        points: u32,
    },

    /// The answer key is not one of the question's options.
    #[error("{0:?} is not one of the answer options")]
    UnknownOption(String),
}

/// Resolve a chosen category name to a category with questions left.
///
/// Names match exactly after trimming surrounding whitespace.
pub fn check_category<'b>(board: &'b Board, name: &str) -> Result<&'b Category, Rejection> {
    let name = name.trim();
    let category = board
        .category(name)
        .ok_or_else(|| Rejection::UnknownCategory(name.to_owned()))?;
    if category.has_remaining() {
        Ok(category)
    } else {
        Err(Rejection::CategoryExhausted(name.to_owned()))
    }
}

/// Resolve a chosen point value to an unanswered question in `category`.
pub fn check_question(category: &Category, points: u32) -> Result<&Question, Rejection> {
    let question = category
        .question(points)
        .ok_or_else(|| Rejection::UnknownQuestion {
            category: category.name().to_owned(),
            points,
        })?;
    if question.is_answered() {
        Err(Rejection::AlreadyAnswered {
            category: category.name().to_owned(),
            points,
        })
    } else {
        Ok(question)
    }
}

/// Resolve a chosen answer key to the question's canonical option key.
pub fn check_answer<'q>(question: &'q Question, key: &str) -> Result<&'q str, Rejection> {
    question
        .option_key(key)
        .ok_or_else(|| Rejection::UnknownOption(key.trim().to_owned()))
}

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

/// A provider that replays pre-recorded moves, for tests and demos.
///
/// Each decision kind has its own queue. When a queue runs dry the
/// provider answers [`Move::Abort`], so a script can never loop forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoveProvider {
    categories: VecDeque<Move<String>>,
    questions: VecDeque<Move<u32>>,
    answers: VecDeque<Move<String>>,
    solicitations: usize,
}

impl ScriptedMoveProvider {
    /// Create a provider with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one complete, valid-looking turn.
    #[must_use]
    pub fn turn(mut self, category: &str, points: u32, answer: &str) -> Self {
        self.categories.push_back(Move::Chosen(category.to_owned()));
        self.questions.push_back(Move::Chosen(points));
        self.answers.push_back(Move::Chosen(answer.to_owned()));
        self
    }

    /// Queue a raw category move.
    #[must_use]
    pub fn category(mut self, m: Move<String>) -> Self {
        self.categories.push_back(m);
        self
    }

    /// Queue a raw question move.
    #[must_use]
    pub fn question(mut self, m: Move<u32>) -> Self {
        self.questions.push_back(m);
        self
    }

    /// Queue a raw answer move.
    #[must_use]
    pub fn answer(mut self, m: Move<String>) -> Self {
        self.answers.push_back(m);
        self
    }

    /// Total number of decisions requested so far, including retries.
    pub const fn solicitations(&self) -> usize {
        self.solicitations
    }

    /// Whether every queued move has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.categories.is_empty() && self.questions.is_empty() && self.answers.is_empty()
    }

    fn count(&mut self) {
        self.solicitations = self.solicitations.saturating_add(1);
    }
}

impl MoveProvider for ScriptedMoveProvider {
    fn choose_category(&mut self, _player: &Player, _offered: &[&Category]) -> Move<String> {
        self.count();
        self.categories.pop_front().unwrap_or(Move::Abort)
    }

    fn choose_question(
        &mut self,
        _player: &Player,
        _category: &str,
        _offered: &[&Question],
    ) -> Move<u32> {
        self.count();
        self.questions.pop_front().unwrap_or(Move::Abort)
    }

    fn choose_answer(&mut self, _player: &Player, _question: &Question) -> Move<String> {
        self.count();
        self.answers.pop_front().unwrap_or(Move::Abort)
    }
}
