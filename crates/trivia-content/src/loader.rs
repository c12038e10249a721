//! The content-loading capability and the extension-keyed factory.

use core::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};
use trivia_board::Board;

use crate::delimited::CsvLoader;
use crate::error::ContentError;
use crate::json::JsonLoader;
use crate::record::{QuestionRecord, assemble};
use crate::xml::XmlLoader;

/// Supported content encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON array of question objects.
    Json,
    /// An XML document of `QuestionItem` elements.
    Xml,
}

impl ContentFormat {
    /// Pick the format from a file extension, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::UnsupportedFormat`] for any other extension,
    /// or none at all.
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            Some("xml") => Ok(Self::Xml),
            _ => Err(ContentError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Lower-case extension for this format.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Turns an encoded content stream into a [`Board`].
///
/// Implementations only decode records; grouping and validation are shared
/// through [`assemble`].
pub trait ContentLoader {
    /// The encoding this loader reads.
    fn format(&self) -> ContentFormat;

    /// Decode every question record, in stream order.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentError`] for malformed input.
    fn read_records(&self, reader: &mut dyn Read) -> Result<Vec<QuestionRecord>, ContentError>;

    /// Decode and assemble a board from a stream.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentError`] for malformed input or an invalid board.
    fn load_from_reader(&self, reader: &mut dyn Read) -> Result<Board, ContentError> {
        let records = self.read_records(reader)?;
        debug!(format = %self.format(), records = records.len(), "content decoded");
        assemble(records)
    }

    /// Open `path` and load a board from it.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Io`] if the file cannot be opened, or any
    /// decoding or validation error.
    fn load(&self, path: &Path) -> Result<Board, ContentError> {
        let mut file = File::open(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_from_reader(&mut file)
    }
}

/// Return the loader for a format.
pub fn loader_for(format: ContentFormat) -> Box<dyn ContentLoader> {
    match format {
        ContentFormat::Csv => Box::new(CsvLoader),
        ContentFormat::Json => Box::new(JsonLoader),
        ContentFormat::Xml => Box::new(XmlLoader),
    }
}

/// Load a board from `path`, choosing the loader by file extension.
///
/// # Errors
///
/// Returns [`ContentError::UnsupportedFormat`] for an unknown extension,
/// or any error from the selected loader. No partial board is returned.
pub fn load_board(path: &Path) -> Result<Board, ContentError> {
    let format = ContentFormat::from_path(path)?;
    let board = loader_for(format).load(path)?;
    info!(
        path = %path.display(),
        %format,
        categories = board.categories().len(),
        questions = board.question_count(),
        "content loaded"
    );
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension_ignores_case() {
        assert_eq!(
            ContentFormat::from_path(Path::new("q.CSV")).ok(),
            Some(ContentFormat::Csv)
        );
        assert_eq!(
            ContentFormat::from_path(Path::new("dir/q.json")).ok(),
            Some(ContentFormat::Json)
        );
        assert_eq!(
            ContentFormat::from_path(Path::new("q.Xml")).ok(),
            Some(ContentFormat::Xml)
        );
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        for path in ["q.txt", "questions", "archive.csv.gz"] {
            assert!(matches!(
                ContentFormat::from_path(Path::new(path)),
                Err(ContentError::UnsupportedFormat { .. })
            ));
        }
    }

    #[test]
    fn factory_matches_format() {
        for format in [ContentFormat::Csv, ContentFormat::Json, ContentFormat::Xml] {
            assert_eq!(loader_for(format).format(), format);
        }
    }
}
