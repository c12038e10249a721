//! Format-neutral question records and board assembly.
//!
//! Every loader reduces its input to a list of [`QuestionRecord`]s, one per
//! question, in file order. [`assemble`] turns them into a [`Board`]:
//! records sharing a category name land in the same category, categories
//! keep first-seen order, and duplicate `(category, value)` pairs are
//! rejected.

use std::collections::BTreeMap;

use trivia_board::Board;
use trivia_types::{Category, Question};

use crate::error::ContentError;

/// One question as read from a content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// Category name.
    pub category: String,
    /// Point value.
    pub value: u32,
    /// Question text.
    pub question: String,
    /// Answer key to option text.
    pub options: BTreeMap<String, String>,
    /// Key of the correct option.
    pub correct_answer: String,
}

/// Parse a point value, trimming whitespace.
pub(crate) fn parse_value(record: usize, raw: &str) -> Result<u32, ContentError> {
    raw.trim()
        .parse()
        .map_err(|_parse| ContentError::InvalidValue {
            record,
            value: raw.to_owned(),
        })
}

/// Build a board from records in file order.
///
/// # Errors
///
/// Returns [`ContentError::Question`] for a record that does not form a
/// valid question, or [`ContentError::Board`] when categories clash.
pub fn assemble(records: Vec<QuestionRecord>) -> Result<Board, ContentError> {
    let mut categories: Vec<Category> = Vec::new();

    for (offset, record) in records.into_iter().enumerate() {
        let number = offset.saturating_add(1);
        let options: BTreeMap<String, String> = record
            .options
            .into_iter()
            .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .collect();
        let question = Question::new(
            record.question.trim(),
            record.value,
            options,
            record.correct_answer.trim(),
        )
        .map_err(|source| ContentError::Question {
            record: number,
            source,
        })?;

        let name = record.category.trim();
        let index = match categories.iter().position(|c| c.name() == name) {
            Some(index) => index,
            None => {
                categories.push(Category::new(name));
                categories.len().saturating_sub(1)
            }
        };
        if let Some(category) = categories.get_mut(index) {
            category
                .add_question(question)
                .map_err(|source| ContentError::Question {
                    record: number,
                    source,
                })?;
        }
    }

    Ok(Board::new(categories)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use trivia_types::ModelError;

    use super::*;

    fn record(category: &str, value: u32, correct: &str) -> QuestionRecord {
        QuestionRecord {
            category: category.to_owned(),
            value,
            question: format!("{category} {value}?"),
            options: [("A", "one"), ("B", "two"), ("C", ""), ("D", "four")]
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
            correct_answer: correct.to_owned(),
        }
    }

    #[test]
    fn groups_by_category_in_first_seen_order() {
        let board = assemble(vec![
            record("Science", 100, "A"),
            record("History", 100, "B"),
            record("Science", 200, "d"),
        ])
        .unwrap();

        let names: Vec<&str> = board.categories().iter().map(Category::name).collect();
        assert_eq!(names, vec!["Science", "History"]);
        assert_eq!(board.question_count(), 3);
        assert_eq!(
            board.find_question("Science", 200).map(Question::correct_key),
            Some("D")
        );
    }

    #[test]
    fn blank_options_are_dropped() {
        let board = assemble(vec![record("Science", 100, "A")]).unwrap();
        let question = board.find_question("Science", 100).unwrap();
        assert_eq!(question.options().len(), 3);
        assert!(question.option_text("C").is_none());
    }

    #[test]
    fn duplicate_value_in_category_is_rejected() {
        let result = assemble(vec![record("Science", 100, "A"), record("Science", 100, "B")]);
        assert!(matches!(
            result,
            Err(ContentError::Question {
                record: 2,
                source: ModelError::DuplicatePointValue { points: 100, .. }
            })
        ));
    }

    #[test]
    fn correct_answer_must_be_an_option() {
        let result = assemble(vec![record("Science", 100, "C")]);
        assert!(matches!(
            result,
            Err(ContentError::Question {
                record: 1,
                source: ModelError::CorrectKeyNotAnOption { .. }
            })
        ));
    }

    #[test]
    fn option_keys_differing_by_case_fail_the_record() {
        let mut clash = record("Science", 200, "a");
        clash.options = [("A", "upper"), ("a ", "lower")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        let result = assemble(vec![record("Science", 100, "A"), clash]);
        assert!(matches!(
            result,
            Err(ContentError::Question {
                record: 2,
                source: ModelError::DuplicateOptionKey { .. }
            })
        ));
    }

    #[test]
    fn no_records_is_an_empty_board() {
        let board = assemble(Vec::new()).unwrap();
        assert!(board.all_answered());
    }

    #[test]
    fn value_parsing() {
        assert_eq!(parse_value(1, " 300 ").unwrap(), 300);
        assert!(matches!(
            parse_value(4, "-5"),
            Err(ContentError::InvalidValue { record: 4, .. })
        ));
    }
}
