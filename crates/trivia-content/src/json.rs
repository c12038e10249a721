//! JSON content: an array of question objects.
//!
//! ```json
//! [
//!   {
//!     "Category": "Rust",
//!     "Value": 100,
//!     "Question": "What keyword declares a constant?",
//!     "Options": { "A": "let", "B": "const", "C": "static", "D": "mut" },
//!     "CorrectAnswer": "B"
//!   }
//! ]
//! ```

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;

use crate::error::ContentError;
use crate::loader::{ContentFormat, ContentLoader};
use crate::record::QuestionRecord;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JsonItem {
    category: String,
    value: u32,
    question: String,
    options: BTreeMap<String, String>,
    correct_answer: String,
}

impl From<JsonItem> for QuestionRecord {
    fn from(item: JsonItem) -> Self {
        Self {
            category: item.category,
            value: item.value,
            question: item.question,
            options: item.options,
            correct_answer: item.correct_answer,
        }
    }
}

/// Loader for JSON question files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl ContentLoader for JsonLoader {
    fn format(&self) -> ContentFormat {
        ContentFormat::Json
    }

    fn read_records(&self, reader: &mut dyn Read) -> Result<Vec<QuestionRecord>, ContentError> {
        let items: Vec<JsonItem> = serde_json::from_reader(reader)?;
        Ok(items.into_iter().map(QuestionRecord::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reads_array_of_items() {
        let input = r#"[
            {"Category": "Rust", "Value": 100, "Question": "Borrow checker?",
             "Options": {"A": "Yes", "B": "No"}, "CorrectAnswer": "A"},
            {"Category": "Rust", "Value": 200, "Question": "Lifetimes?",
             "Options": {"A": "Yes", "B": "No", "C": "Maybe"}, "CorrectAnswer": "c"}
        ]"#;
        let board = JsonLoader.load_from_reader(&mut input.as_bytes()).unwrap();
        assert_eq!(board.question_count(), 2);
        let q = board.find_question("Rust", 200).unwrap();
        assert_eq!(q.correct_key(), "C");
        assert_eq!(q.option_text("c"), Some("Maybe"));
    }

    #[test]
    fn missing_key_is_a_json_error() {
        let input = r#"[{"Category": "Rust", "Value": 100, "Question": "Q?"}]"#;
        let result = JsonLoader.read_records(&mut input.as_bytes());
        assert!(matches!(result, Err(ContentError::Json(_))));
    }

    #[test]
    fn top_level_object_is_rejected() {
        let result = JsonLoader.read_records(&mut "{}".as_bytes());
        assert!(matches!(result, Err(ContentError::Json(_))));
    }
}
