//! The session engine: a turn state machine over a board and a player
//! registry.
//!
//! Each turn runs the same protocol:
//!
//! 1. **Category** -- offer the categories with questions left; the
//!    [`MoveProvider`] picks one or aborts.
//! 2. **Question** -- offer the unanswered questions in that category.
//! 3. **Answer** -- ask for an option key.
//! 4. **Scoring** -- add the point value on a correct answer, subtract it on
//!    a wrong one, and publish exactly one `Score Updated` event.
//! 5. **Finalize** -- mark the question answered and hand the turn to the
//!    next player in round-robin order, whatever the result.
//!
//! Invalid moves are re-solicited without emitting events. An abort at any
//! of steps 1-3 ends the session immediately; the half-finished turn leaves
//! no further trace. The only other exit is a fully answered board.

use core::fmt;

use rand::Rng;
use tracing::{debug, info, warn};
use trivia_board::{Board, BoardError};
use trivia_events::{EventBuilder, EventBus, EventError};
use trivia_types::{Activity, AnswerResult, Player, Question, SessionId, SessionState};

use crate::config::SessionConfig;
use crate::provider::{self, Move, MoveProvider};
use crate::scoreboard::{Scoreboard, ScoreboardError};

/// Errors that can occur while setting up or running a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `start` was called with an empty player registry.
    #[error("cannot start a session with no registered players")]
    NoPlayers,

    /// A turn was requested before `start`.
    #[error("session has not been started")]
    NotStarted,

    /// The operation is only allowed in another state.
    #[error("operation not allowed in state {actual:?}")]
    WrongState {
        /// The state the session is in.
        actual: SessionState,
    },

    /// Registering a player or adjusting a score failed.
    #[error("scoreboard error: {source}")]
    Scoreboard {
        /// The underlying scoreboard error.
        #[from]
        source: ScoreboardError,
    },

    /// A board operation failed.
    #[error("board error: {source}")]
    Board {
        /// The underlying board error.
        #[from]
        source: BoardError,
    },

    /// An event could not be built.
    #[error("event error: {source}")]
    Event {
        /// The underlying event error.
        #[from]
        source: EventError,
    },
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// Every question on the board was answered.
    BoardComplete,
    /// A player aborted, or the session was finished early.
    Aborted,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoardComplete => f.write_str("board complete"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

/// What happened during one completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    /// 1-based turn number.
    pub turn: usize,
    /// Turn-order index of the acting player.
    pub player_index: usize,
    /// Name of the acting player.
    pub player: String,
    /// Chosen category.
    pub category: String,
    /// Point value of the chosen question.
    pub points: u32,
    /// Question text.
    pub question_text: String,
    /// Canonical answer key submitted.
    pub answer_key: String,
    /// Display text of the submitted option.
    pub answer_text: String,
    /// Whether the answer was correct.
    pub result: AnswerResult,
    /// The player's score after scoring.
    pub score_after: i64,
}

/// Result of [`SessionEngine::play_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A full turn was played and scored.
    Completed(TurnRecord),
    /// The provider aborted; the session is over.
    Aborted,
    /// The board was already complete; the session is over.
    BoardComplete,
}

/// Final state handed back by [`SessionEngine::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// The session identifier.
    pub session_id: SessionId,
    /// Why the session ended.
    pub end_reason: EndReason,
    /// Number of scored turns.
    pub turns_completed: usize,
    /// Players with their final scores, in registration order.
    pub players: Vec<Player>,
    /// Observer failures reported by the bus over the whole session.
    pub observer_failures: usize,
}

/// Drives one trivia session from setup to completion.
#[derive(Debug)]
pub struct SessionEngine {
    session_id: SessionId,
    board: Board,
    scoreboard: Scoreboard,
    bus: EventBus,
    state: SessionState,
    current: Option<usize>,
    first_player: Option<usize>,
    turns_completed: usize,
    end_reason: Option<EndReason>,
    exited: bool,
    observer_failures: usize,
}

impl SessionEngine {
    /// Create an engine in the `Setup` state with no players and a bus
    /// without subscribers.
    pub fn new(session_id: SessionId, board: Board, config: &SessionConfig) -> Self {
        Self {
            session_id,
            board,
            scoreboard: Scoreboard::new(config.max_players),
            bus: EventBus::new(),
            state: SessionState::Setup,
            current: None,
            first_player: None,
            turns_completed: 0,
            end_reason: None,
            exited: false,
            observer_failures: 0,
        }
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// The session identifier stamped on every event.
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The event bus. Subscribe observers here before playing.
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The board in its current answered state.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The player registry with current scores.
    pub const fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Current state-machine state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Index of the player whose turn is next, once started.
    pub const fn current_player(&self) -> Option<usize> {
        self.current
    }

    /// Index of the randomly chosen first player, once started.
    pub const fn first_player(&self) -> Option<usize> {
        self.first_player
    }

    /// Number of scored turns so far.
    pub const fn turns_completed(&self) -> usize {
        self.turns_completed
    }

    /// Why the session ended, if it has.
    pub const fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    // -------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------

    /// Replace the board with freshly loaded content and publish
    /// `File Loaded`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongState`] once the session has started.
    pub fn load_board(&mut self, board: Board, source: &str) -> Result<(), SessionError> {
        self.require_setup()?;
        info!(
            source,
            categories = board.categories().len(),
            questions = board.question_count(),
            "board loaded"
        );
        let detail = format!(
            "{source}: {} categories, {} questions",
            board.categories().len(),
            board.question_count()
        );
        self.board = board;
        let event = self.event(Activity::FileLoaded).detail(detail);
        self.emit(event)
    }

    /// Publish a system event (no player attached) with a detail string.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Event`] if `activity` requires player or
    /// turn fields.
    pub fn note(&mut self, activity: Activity, detail: impl Into<String>) -> Result<(), SessionError> {
        let event = self.event(activity).detail(detail);
        self.emit(event)
    }

    /// Register a player and publish `Enter Player Name`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Scoreboard`] for an empty name or when the
    /// registry is full, and [`SessionError::WrongState`] after `start`.
    pub fn register_player(&mut self, name: &str) -> Result<usize, SessionError> {
        self.require_setup()?;
        let index = self.scoreboard.add_player(name)?;
        let name = self
            .scoreboard
            .get(index)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        debug!(player = %name, index, "player registered");
        let event = self
            .event(Activity::EnterPlayerName)
            .player(name.as_str())
            .detail(format!("{name} added"));
        self.emit(event)?;
        Ok(index)
    }

    /// Start the session: pick the first player uniformly at random and
    /// publish `Select Player Count` and `Start Game`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoPlayers`] for an empty registry and
    /// [`SessionError::WrongState`] if already started.
    pub fn start(&mut self, rng: &mut impl Rng) -> Result<(), SessionError> {
        self.require_setup()?;
        let count = self.scoreboard.len();
        if count == 0 {
            return Err(SessionError::NoPlayers);
        }

        let first = rng.random_range(0..count);
        let first_name = self
            .scoreboard
            .get(first)
            .map(|p| p.name.clone())
            .unwrap_or_default();

        let event = self
            .event(Activity::SelectPlayerCount)
            .detail(format!("{count} players selected"));
        self.emit(event)?;
        let event = self
            .event(Activity::StartGame)
            .detail(format!("{first_name} goes first"));
        self.emit(event)?;

        self.current = Some(first);
        self.first_player = Some(first);
        info!(
            session_id = %self.session_id,
            players = count,
            first_player = %first_name,
            "session started"
        );

        if self.board.all_answered() {
            self.complete(EndReason::BoardComplete);
        } else {
            self.state = SessionState::AwaitingCategory;
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Play
    // -------------------------------------------------------------------

    /// Play one turn for the current player.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotStarted`] before `start`,
    /// [`SessionError::WrongState`] after completion, or an error from the
    /// board, scoreboard, or event layer.
    pub fn play_turn(
        &mut self,
        provider: &mut dyn MoveProvider,
    ) -> Result<TurnOutcome, SessionError> {
        match self.state {
            SessionState::Setup => return Err(SessionError::NotStarted),
            SessionState::SessionComplete => {
                return Err(SessionError::WrongState { actual: self.state });
            }
            _ => {}
        }

        if self.board.all_answered() {
            self.complete(EndReason::BoardComplete);
            return Ok(TurnOutcome::BoardComplete);
        }

        let index = self.current.ok_or(SessionError::NotStarted)?;
        let player = self
            .scoreboard
            .get(index)
            .cloned()
            .ok_or(ScoreboardError::UnknownPlayer(index))?;

        self.state = SessionState::AwaitingCategory;
        let Some(category) = self.solicit_category(provider, &player) else {
            return Ok(self.abort(&player, SessionState::AwaitingCategory));
        };
        let event = self
            .event(Activity::SelectCategory)
            .player(player.name.as_str())
            .category(category.as_str());
        self.emit(event)?;

        self.state = SessionState::AwaitingQuestion;
        let Some(points) = self.solicit_question(provider, &player, &category)? else {
            return Ok(self.abort(&player, SessionState::AwaitingQuestion));
        };
        let question_text = self.question(&category, points)?.text().to_owned();
        let event = self
            .event(Activity::SelectQuestion)
            .player(player.name.as_str())
            .category(category.as_str())
            .question_value(points)
            .question_text(question_text.as_str());
        self.emit(event)?;

        self.state = SessionState::AwaitingAnswer;
        let Some(key) = self.solicit_answer(provider, &player, &category, points)? else {
            return Ok(self.abort(&player, SessionState::AwaitingAnswer));
        };
        let event = self
            .event(Activity::AnswerQuestion)
            .player(player.name.as_str())
            .category(category.as_str())
            .question_value(points)
            .question_text(question_text.as_str())
            .answer_given(key.as_str());
        self.emit(event)?;

        self.state = SessionState::Scoring;
        let (result, answer_text) = {
            let question = self.question(&category, points)?;
            (
                AnswerResult::from_correct(question.is_correct(&key)),
                question.option_text(&key).unwrap_or_default().to_owned(),
            )
        };
        let score_after = self.scoreboard.apply_result(index, result, points)?;
        let event = self
            .event(Activity::ScoreUpdated)
            .player(player.name.as_str())
            .category(category.as_str())
            .question_value(points)
            .question_text(question_text.as_str())
            .answer_given(key.as_str())
            .result(result)
            .score_after_play(score_after);
        self.emit(event)?;

        self.board.mark_answered(&category, points)?;
        self.turns_completed = self.turns_completed.saturating_add(1);
        self.state = SessionState::TurnComplete;
        self.current = self.scoreboard.next_index(index);
        debug!(
            turn = self.turns_completed,
            player = %player.name,
            category = %category,
            points,
            %result,
            score_after,
            "turn scored"
        );

        if self.board.all_answered() {
            self.complete(EndReason::BoardComplete);
        } else {
            self.state = SessionState::AwaitingCategory;
        }

        Ok(TurnOutcome::Completed(TurnRecord {
            turn: self.turns_completed,
            player_index: index,
            player: player.name,
            category,
            points,
            question_text,
            answer_key: key,
            answer_text,
            result,
            score_after,
        }))
    }

    /// Start (if still in setup) and play turns until the session ends.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`start`](Self::start) or
    /// [`play_turn`](Self::play_turn).
    pub fn run(
        &mut self,
        provider: &mut dyn MoveProvider,
        rng: &mut impl Rng,
    ) -> Result<EndReason, SessionError> {
        if self.state == SessionState::Setup {
            self.start(rng)?;
        }
        while !self.state.is_terminal() {
            if let TurnOutcome::Completed(record) = self.play_turn(provider)? {
                debug!(turn = record.turn, player = %record.player, "turn completed");
            }
        }
        Ok(self.end_reason.unwrap_or(EndReason::Aborted))
    }

    /// End the session, publish `Exit Game` (once), and return a summary.
    ///
    /// Finishing a session that has not reached a natural end counts as an
    /// abort.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Event`] if the exit event cannot be built.
    pub fn finish(&mut self) -> Result<SessionSummary, SessionError> {
        self.complete(EndReason::Aborted);
        let end_reason = self.end_reason.unwrap_or(EndReason::Aborted);

        if !self.exited {
            self.exited = true;
            let event = self
                .event(Activity::ExitGame)
                .detail(format!("session ended: {end_reason}"));
            self.emit(event)?;
            info!(
                session_id = %self.session_id,
                %end_reason,
                turns = self.turns_completed,
                "session finished"
            );
        }

        Ok(SessionSummary {
            session_id: self.session_id,
            end_reason,
            turns_completed: self.turns_completed,
            players: self.scoreboard.players().to_vec(),
            observer_failures: self.observer_failures,
        })
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn require_setup(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Setup {
            Ok(())
        } else {
            Err(SessionError::WrongState { actual: self.state })
        }
    }

    fn event(&self, activity: Activity) -> EventBuilder {
        EventBuilder::new(self.session_id, activity)
    }

    fn emit(&mut self, builder: EventBuilder) -> Result<(), SessionError> {
        let event = builder.build()?;
        let report = self.bus.publish(&event);
        self.observer_failures = self
            .observer_failures
            .saturating_add(report.failures.len());
        Ok(())
    }

    /// Enter the terminal state, keeping the first recorded reason.
    fn complete(&mut self, reason: EndReason) {
        self.state = SessionState::SessionComplete;
        if self.end_reason.is_none() {
            self.end_reason = Some(reason);
        }
    }

    fn abort(&mut self, player: &Player, during: SessionState) -> TurnOutcome {
        info!(player = %player.name, during = ?during, "session aborted by player");
        self.complete(EndReason::Aborted);
        TurnOutcome::Aborted
    }

    fn question(&self, category: &str, points: u32) -> Result<&Question, SessionError> {
        self.board
            .find_question(category, points)
            .ok_or_else(|| {
                BoardError::QuestionNotFound {
                    category: category.to_owned(),
                    points,
                }
                .into()
            })
    }

    fn solicit_category(
        &self,
        provider: &mut dyn MoveProvider,
        player: &Player,
    ) -> Option<String> {
        loop {
            let offered = self.board.categories_with_remaining_questions();
            match provider.choose_category(player, &offered) {
                Move::Chosen(name) => match provider::check_category(&self.board, &name) {
                    Ok(category) => return Some(category.name().to_owned()),
                    Err(rejection) => {
                        warn!(player = %player.name, %rejection, "category rejected");
                    }
                },
                Move::Invalid { reason } => {
                    debug!(player = %player.name, %reason, "invalid category input");
                }
                Move::Abort => return None,
            }
        }
    }

    fn solicit_question(
        &self,
        provider: &mut dyn MoveProvider,
        player: &Player,
        category: &str,
    ) -> Result<Option<u32>, SessionError> {
        let category = self
            .board
            .category(category)
            .ok_or_else(|| BoardError::CategoryNotFound(category.to_owned()))?;
        loop {
            let offered: Vec<&Question> = category.remaining_questions().collect();
            match provider.choose_question(player, category.name(), &offered) {
                Move::Chosen(points) => match provider::check_question(category, points) {
                    Ok(question) => return Ok(Some(question.points())),
                    Err(rejection) => {
                        warn!(player = %player.name, %rejection, "question rejected");
                    }
                },
                Move::Invalid { reason } => {
                    debug!(player = %player.name, %reason, "invalid question input");
                }
                Move::Abort => return Ok(None),
            }
        }
    }

    fn solicit_answer(
        &self,
        provider: &mut dyn MoveProvider,
        player: &Player,
        category: &str,
        points: u32,
    ) -> Result<Option<String>, SessionError> {
        let question = self.question(category, points)?;
        loop {
            match provider.choose_answer(player, question) {
                Move::Chosen(key) => match provider::check_answer(question, &key) {
                    Ok(canonical) => return Ok(Some(canonical.to_owned())),
                    Err(rejection) => {
                        warn!(player = %player.name, %rejection, "answer rejected");
                    }
                },
                Move::Invalid { reason } => {
                    debug!(player = %player.name, %reason, "invalid answer input");
                }
                Move::Abort => return Ok(None),
            }
        }
    }
}
