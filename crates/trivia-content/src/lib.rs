//! Content repository for the trivia session engine.
//!
//! Reads question files into a validated [`Board`]. One [`ContentLoader`]
//! capability has three implementations, chosen by file extension:
//!
//! | Extension | Loader | Layout |
//! |-----------|--------|--------|
//! | `.csv` | [`CsvLoader`] | header row, then `Category,Value,Question,A,B,C,D,CorrectAnswer` |
//! | `.json` | [`JsonLoader`] | array of `{Category, Value, Question, Options, CorrectAnswer}` |
//! | `.xml` | [`XmlLoader`] | repeated `<QuestionItem>` elements |
//!
//! Loading is all-or-nothing: any decode or validation failure is a
//! [`ContentError`] and no partial board escapes.
//!
//! # Modules
//!
//! - [`loader`] -- [`ContentFormat`], the [`ContentLoader`] trait, and
//!   [`load_board`].
//! - [`record`] -- Format-neutral [`QuestionRecord`] and board assembly.
//! - [`delimited`], [`json`], [`xml`] -- The three decoders.
//! - [`error`] -- Shared error type.
//!
//! [`Board`]: trivia_board::Board

pub mod delimited;
pub mod error;
pub mod json;
pub mod loader;
pub mod record;
pub mod xml;

pub use delimited::CsvLoader;
pub use error::ContentError;
pub use json::JsonLoader;
pub use loader::{ContentFormat, ContentLoader, load_board, loader_for};
pub use record::{QuestionRecord, assemble};
pub use xml::XmlLoader;
