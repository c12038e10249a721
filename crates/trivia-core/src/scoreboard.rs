//! Player registry and score keeping.
//!
//! Players are registered once during setup; their index is their position
//! in the turn order. Scores only change through
//! [`Scoreboard::apply_result`], which adds or subtracts a question's point
//! value with checked arithmetic.

use trivia_types::{AnswerResult, ModelError, Player};

/// Errors raised while registering players or adjusting scores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreboardError {
    /// The registry already holds the maximum number of players.
    #[error("cannot register more than {max} players")]
    TooManyPlayers {
        /// The configured maximum.
        max: usize,
    },

    /// The player name was empty after trimming.
    #[error("player name must not be empty")]
    EmptyName,

    /// No player is registered at this index.
    #[error("no player at index {0}")]
    UnknownPlayer(usize),

    /// A score adjustment failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Registered players in turn order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    players: Vec<Player>,
    max_players: usize,
}

impl Scoreboard {
    /// Create an empty registry that accepts up to `max_players`.
    pub const fn new(max_players: usize) -> Self {
        Self {
            players: Vec::new(),
            max_players,
        }
    }

    /// Register a player and return their turn-order index.
    ///
    /// The name is trimmed. Duplicate names are allowed; players are told
    /// apart by index.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreboardError::EmptyName`] or
    /// [`ScoreboardError::TooManyPlayers`]. Nothing is registered on error.
    pub fn add_player(&mut self, name: &str) -> Result<usize, ScoreboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScoreboardError::EmptyName);
        }
        if self.players.len() >= self.max_players {
            return Err(ScoreboardError::TooManyPlayers {
                max: self.max_players,
            });
        }
        let index = self.players.len();
        self.players.push(Player::new(index, name));
        Ok(index)
    }

    /// Players in registration order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The player at `index`, if registered.
    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Number of registered players.
    pub const fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no player has been registered.
    pub const fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Maximum number of players this registry accepts.
    pub const fn max_players(&self) -> usize {
        self.max_players
    }

    /// Apply a scoring result to a player: `+points` when correct,
    /// `-points` when wrong. Returns the new score.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreboardError::UnknownPlayer`] for a bad index, or
    /// [`ScoreboardError::Model`] if the score would overflow.
    pub fn apply_result(
        &mut self,
        index: usize,
        result: AnswerResult,
        points: u32,
    ) -> Result<i64, ScoreboardError> {
        let player = self
            .players
            .get_mut(index)
            .ok_or(ScoreboardError::UnknownPlayer(index))?;
        let magnitude = i64::from(points);
        let delta = if result.is_correct() {
            magnitude
        } else {
            magnitude.checked_neg().ok_or_else(|| ModelError::ScoreOverflow {
                player: player.name.clone(),
            })?
        };
        Ok(player.apply_delta(delta)?)
    }

    /// The index that follows `index` in round-robin order.
    ///
    /// Returns `None` when no players are registered.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        index.checked_add(1)?.checked_rem(self.players.len())
    }
}
