//! Error types for the `trivia-board` crate.
//!
//! All fallible operations in this crate return [`BoardError`] through the
//! standard [`Result`] type.

use trivia_types::ModelError;

/// Errors that can occur during board construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// No category with this name exists on the board.
    #[error("category not found: {0:?}")]
    CategoryNotFound(String),

    /// The category exists but has no question with this point value.
    #[error("no {points}-point question in category {category:?}")]
    QuestionNotFound {
        /// The category searched.
        category: String,
        /// The requested point value.
        points: u32,
    },

    /// The question was already marked answered.
    #[error("the {points}-point question in {category:?} is already answered")]
    AlreadyAnswered {
        /// The category name.
        category: String,
        /// The question's point value.
        points: u32,
    },

    /// A category was given an empty or whitespace-only name.
    #[error("category names must not be empty")]
    EmptyCategoryName,

    /// A model invariant was violated while assembling the board.
    #[error(transparent)]
    Model(#[from] ModelError),
}
