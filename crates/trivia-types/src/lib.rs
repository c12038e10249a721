//! Shared type definitions for the trivia session engine.
//!
//! This crate is the single source of truth for the vocabulary shared by
//! the board, event, core, and content crates.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for sessions and events
//! - [`enums`] -- The closed [`Activity`] tag, [`AnswerResult`], and the
//!   [`SessionState`] machine states
//! - [`structs`] -- [`Question`], [`Category`], [`Player`], and the
//!   immutable [`Event`] record

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Activity, AnswerResult, SessionState};
pub use ids::{EventId, SessionId};
pub use structs::{Category, Event, ModelError, Player, Question};
