//! Error types for the `trivia` binary.
//!
//! [`CliError`] wraps every failure mode of a console session so that the
//! entry point can propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the `trivia` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: trivia_core::config::ConfigError,
    },

    /// The content file could not be loaded.
    #[error("content error: {source}")]
    Content {
        /// The underlying content error.
        #[from]
        source: trivia_content::ContentError,
    },

    /// The session engine refused an operation.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: trivia_core::SessionError,
    },

    /// Writing the CSV event log failed.
    #[error("event log error: {source}")]
    EventLog {
        /// The underlying event error.
        #[from]
        source: trivia_events::EventError,
    },

    /// An output file could not be created or written.
    #[error("cannot write {}: {source}", path.display())]
    Output {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Reading from or writing to the console failed.
    #[error("console I/O failed: {source}")]
    Console {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// No content file was named and none could be read from the console.
    #[error("no content file given")]
    NoContent,

    /// The console was closed before any player was registered.
    #[error("no players registered")]
    NoPlayers,
}
