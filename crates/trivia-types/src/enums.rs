//! Enumeration types for the trivia session engine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// The closed set of activities an [`Event`] can record.
///
/// Each activity has a stable human-readable label (see [`Activity::label`])
/// which is what appears in the CSV event log and in reports. The serde
/// representation uses the same label.
///
/// [`Event`]: crate::Event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Activity {
    // --- System ---
    /// The application started a new session.
    #[serde(rename = "Start Game")]
    StartGame,
    /// A content file is about to be loaded.
    #[serde(rename = "Load File")]
    LoadFile,
    /// A content file was loaded into a board.
    #[serde(rename = "File Loaded")]
    FileLoaded,
    /// The number of players was fixed.
    #[serde(rename = "Select Player Count")]
    SelectPlayerCount,
    /// A player joined the session.
    #[serde(rename = "Enter Player Name")]
    EnterPlayerName,

    // --- Turn ---
    /// The current player picked a category.
    #[serde(rename = "Select Category")]
    SelectCategory,
    /// The current player picked a question within the category.
    #[serde(rename = "Select Question")]
    SelectQuestion,
    /// The current player submitted an answer key.
    #[serde(rename = "Answer Question")]
    AnswerQuestion,
    /// The current player's score was adjusted for the answer.
    #[serde(rename = "Score Updated")]
    ScoreUpdated,

    // --- Shutdown ---
    /// The session ended.
    #[serde(rename = "Exit Game")]
    ExitGame,
    /// The turn-by-turn report was generated.
    #[serde(rename = "Generate Report")]
    GenerateReport,
    /// The event log was written out.
    #[serde(rename = "Generate Event Log")]
    GenerateEventLog,
}

impl Activity {
    /// Stable display label for this activity.
    pub const fn label(self) -> &'static str {
        match self {
            Self::StartGame => "Start Game",
            Self::LoadFile => "Load File",
            Self::FileLoaded => "File Loaded",
            Self::SelectPlayerCount => "Select Player Count",
            Self::EnterPlayerName => "Enter Player Name",
            Self::SelectCategory => "Select Category",
            Self::SelectQuestion => "Select Question",
            Self::AnswerQuestion => "Answer Question",
            Self::ScoreUpdated => "Score Updated",
            Self::ExitGame => "Exit Game",
            Self::GenerateReport => "Generate Report",
            Self::GenerateEventLog => "Generate Event Log",
        }
    }

    /// Whether this activity belongs to a player's turn.
    pub const fn is_turn_activity(self) -> bool {
        matches!(
            self,
            Self::SelectCategory | Self::SelectQuestion | Self::AnswerQuestion | Self::ScoreUpdated
        )
    }
}

impl core::fmt::Display for Activity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Answer result
// ---------------------------------------------------------------------------

/// Outcome of scoring a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerResult {
    /// The answer key matched the correct key; points were added.
    Correct,
    /// The answer key did not match; points were subtracted.
    Wrong,
}

impl AnswerResult {
    /// Derive the result from a comparison outcome.
    pub const fn from_correct(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Wrong }
    }

    /// Whether this result awarded points.
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }

    /// Stable display label (`"Correct"` or `"Wrong"`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Correct => "Correct",
            Self::Wrong => "Wrong",
        }
    }

    /// Sign character used when rendering the point delta.
    pub const fn sign(self) -> char {
        match self {
            Self::Correct => '+',
            Self::Wrong => '-',
        }
    }
}

impl core::fmt::Display for AnswerResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// State of the session state machine.
///
/// ```text
/// Setup -> AwaitingCategory -> AwaitingQuestion -> AwaitingAnswer
///       -> Scoring -> TurnComplete -> AwaitingCategory (next player)
///                                  \-> SessionComplete
/// ```
///
/// An abort from the move provider in any `Awaiting*` state jumps straight
/// to [`SessionState::SessionComplete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Players are being registered; no turn has started.
    Setup,
    /// Waiting for the current player to pick a category.
    AwaitingCategory,
    /// Waiting for the current player to pick a question.
    AwaitingQuestion,
    /// Waiting for the current player to submit an answer key.
    AwaitingAnswer,
    /// The answer is being compared and the score adjusted.
    Scoring,
    /// The question was marked answered and the turn is being handed over.
    TurnComplete,
    /// Terminal state: board complete or aborted.
    SessionComplete,
}

impl SessionState {
    /// Whether the session has reached its terminal state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::SessionComplete)
    }
}
