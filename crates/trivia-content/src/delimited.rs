//! CSV content: a header row, then one question per row.
//!
//! ```text
//! Category,Value,Question,A,B,C,D,CorrectAnswer
//! Rust,100,What keyword declares a constant?,let,const,static,mut,B
//! ```
//!
//! Columns are positional; the header row is skipped, not interpreted.
//! Blank option cells are dropped, so a question may offer fewer than four
//! options.

use std::io::Read;

use crate::error::ContentError;
use crate::loader::{ContentFormat, ContentLoader};
use crate::record::{QuestionRecord, parse_value};

const OPTION_KEYS: [&str; 4] = ["A", "B", "C", "D"];

/// Loader for comma-separated question files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLoader;

impl ContentLoader for CsvLoader {
    fn format(&self) -> ContentFormat {
        ContentFormat::Csv
    }

    fn read_records(&self, reader: &mut dyn Read) -> Result<Vec<QuestionRecord>, ContentError> {
        let mut table = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (offset, row) in table.records().enumerate() {
            let row = row?;
            let number = offset.saturating_add(1);
            if row.iter().all(str::is_empty) {
                continue;
            }
            let field = |index: usize, name: &'static str| {
                row.get(index)
                    .map(str::to_owned)
                    .ok_or(ContentError::MissingField {
                        record: number,
                        field: name,
                    })
            };

            let category = field(0, "Category")?;
            let value = parse_value(number, &field(1, "Value")?)?;
            let question = field(2, "Question")?;
            let options = OPTION_KEYS
                .iter()
                .enumerate()
                .filter_map(|(i, key)| {
                    row.get(i.saturating_add(3))
                        .map(|text| ((*key).to_owned(), text.to_owned()))
                })
                .collect();
            let correct_answer = field(7, "CorrectAnswer")?;

            records.push(QuestionRecord {
                category,
                value,
                question,
                options,
                correct_answer,
            });
        }
        Ok(records)
    }
}
