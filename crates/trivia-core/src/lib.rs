//! Session engine, scoring, move-provider boundary, and reporting for the
//! trivia session engine.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `trivia-config.yaml` into
//!   strongly-typed structs.
//! - [`scoreboard`] -- Player registry and checked score arithmetic.
//! - [`provider`] -- [`MoveProvider`] trait, boundary checks, and
//!   [`ScriptedMoveProvider`].
//! - [`session`] -- The [`SessionEngine`] turn state machine.
//! - [`report`] -- [`ReportBuilder`]: the post-session report rebuilt from
//!   the event log.
//!
//! [`MoveProvider`]: provider::MoveProvider
//! [`ScriptedMoveProvider`]: provider::ScriptedMoveProvider
//! [`SessionEngine`]: session::SessionEngine
//! [`ReportBuilder`]: report::ReportBuilder

pub mod config;
pub mod provider;
pub mod report;
pub mod scoreboard;
pub mod session;

pub use config::TriviaConfig;
pub use provider::{Move, MoveProvider, Rejection, ScriptedMoveProvider};
pub use report::{Report, ReportBuilder, ReportOutcome, ReportTurn};
pub use scoreboard::{Scoreboard, ScoreboardError};
pub use session::{EndReason, SessionEngine, SessionError, SessionSummary, TurnOutcome, TurnRecord};
