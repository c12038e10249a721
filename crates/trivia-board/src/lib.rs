//! Question board for the trivia session engine.
//!
//! This crate models the playing field: categories as columns, questions as
//! point-valued cells, and the per-question answered flags that drive the
//! session's natural termination.
//!
//! # Modules
//!
//! - [`board`] -- The [`Board`]: validated construction, lookups by
//!   `(category, points)`, remaining-category queries, and answered flags.
//! - [`error`] -- Error types for board operations.

pub mod board;
pub mod error;

// Re-export primary types at crate root.
pub use board::Board;
pub use error::BoardError;
