//! XML content: a root element holding repeated `QuestionItem` elements.
//!
//! ```xml
//! <QuestionItems>
//!   <QuestionItem>
//!     <Category>Rust</Category>
//!     <Value>100</Value>
//!     <QuestionText>What keyword declares a constant?</QuestionText>
//!     <Options><A>let</A><B>const</B><C>static</C><D>mut</D></Options>
//!     <CorrectAnswer>B</CorrectAnswer>
//!   </QuestionItem>
//! </QuestionItems>
//! ```
//!
//! The root element's name is not checked.

use std::collections::BTreeMap;
use std::io::{BufReader, Read};

use serde::Deserialize;

use crate::error::ContentError;
use crate::loader::{ContentFormat, ContentLoader};
use crate::record::{QuestionRecord, parse_value};

#[derive(Debug, Deserialize)]
struct XmlRoot {
    #[serde(rename = "QuestionItem", default)]
    items: Vec<XmlItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct XmlItem {
    category: String,
    value: String,
    question_text: String,
    options: BTreeMap<String, String>,
    correct_answer: String,
}

/// Loader for XML question files.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlLoader;

impl ContentLoader for XmlLoader {
    fn format(&self) -> ContentFormat {
        ContentFormat::Xml
    }

    fn read_records(&self, reader: &mut dyn Read) -> Result<Vec<QuestionRecord>, ContentError> {
        let root: XmlRoot = quick_xml::de::from_reader(BufReader::new(reader))?;
        root.items
            .into_iter()
            .enumerate()
            .map(|(offset, item)| {
                Ok(QuestionRecord {
                    category: item.category,
                    value: parse_value(offset.saturating_add(1), &item.value)?,
                    question: item.question_text,
                    options: item.options,
                    correct_answer: item.correct_answer,
                })
            })
            .collect()
    }
}
