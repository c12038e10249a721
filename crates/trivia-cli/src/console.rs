//! Console prompts: the interactive move provider and setup questions.
//!
//! [`ConsoleMoveProvider`] is generic over its input and output so the same
//! code drives a terminal (`stdin`/`stdout`) and in-memory buffers in tests.
//! Typing `end` at any prompt, or closing the input, aborts the session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::warn;
use trivia_core::{Move, MoveProvider};
use trivia_types::{Category, Player, Question};

const END_COMMAND: &str = "end";

/// What a single prompt produced.
enum Reply {
    Line(String),
    End,
}

/// Reads moves from a line-oriented console.
#[derive(Debug)]
pub struct ConsoleMoveProvider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleMoveProvider<R, W> {
    /// Wrap an input and an output stream.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the output stream.
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Ask for the content file path. `None` if the input is closed or the
    /// answer is blank.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the console.
    pub fn ask_content_path(&mut self) -> io::Result<Option<PathBuf>> {
        match self.prompt("Enter the question file (.csv, .json or .xml): ")? {
            Reply::Line(line) if !line.is_empty() => Ok(Some(PathBuf::from(line))),
            Reply::Line(_) | Reply::End => Ok(None),
        }
    }

    /// Ask how many players will play (1 to `max`), then ask each name.
    ///
    /// Re-asks on a bad count or a blank name. Returns the names collected
    /// before the input closed or `end` was typed.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the console.
    pub fn ask_player_names(&mut self, max: usize) -> io::Result<Vec<String>> {
        let count = loop {
            let Reply::Line(line) = self.prompt(&format!("How many players (1-{max})? "))? else {
                return Ok(Vec::new());
            };
            match line.parse::<usize>() {
                Ok(n) if (1..=max).contains(&n) => break n,
                _ => self.say(&format!("Please enter a number from 1 to {max}."))?,
            }
        };

        let mut names = Vec::with_capacity(count);
        while names.len() < count {
            let number = names.len().saturating_add(1);
            let Reply::Line(name) = self.prompt(&format!("Enter name for player {number}: "))?
            else {
                break;
            };
            if name.is_empty() {
                self.say("A name cannot be empty.")?;
            } else {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn prompt(&mut self, text: &str) -> io::Result<Reply> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(Reply::End);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case(END_COMMAND) {
            Ok(Reply::End)
        } else {
            Ok(Reply::Line(line.to_owned()))
        }
    }

    /// Prompt and turn the reply into a move, treating I/O failure as an
    /// abort.
    fn ask<T>(&mut self, text: &str, parse: impl FnOnce(String) -> Move<T>) -> Move<T> {
        match self.prompt(text) {
            Ok(Reply::Line(line)) => parse(line),
            Ok(Reply::End) => Move::Abort,
            Err(e) => {
                warn!(error = %e, "console read failed, ending session");
                Move::Abort
            }
        }
    }

    /// Print `lines`; `false` if the console could not be written.
    fn show(&mut self, lines: &[String]) -> bool {
        for line in lines {
            if let Err(e) = writeln!(self.output, "{line}") {
                warn!(error = %e, "console write failed, ending session");
                return false;
            }
        }
        true
    }
}

impl<R: BufRead, W: Write> MoveProvider for ConsoleMoveProvider<R, W> {
    fn choose_category(&mut self, player: &Player, offered: &[&Category]) -> Move<String> {
        let mut lines = vec![
            String::new(),
            format!("{}'s turn (score: {})", player.name, player.score),
            "Categories:".to_owned(),
        ];
        for (i, category) in offered.iter().enumerate() {
            lines.push(format!(
                "  {}. {} ({} left)",
                i.saturating_add(1),
                category.name(),
                category.remaining_questions().count()
            ));
        }
        if !self.show(&lines) {
            return Move::Abort;
        }

        self.ask("Choose a category (number or name, 'end' to quit): ", |line| {
            if line.is_empty() {
                return Move::invalid("no category entered");
            }
            match line.parse::<usize>() {
                Ok(n) => n
                    .checked_sub(1)
                    .and_then(|i| offered.get(i))
                    .map_or_else(
                        || Move::invalid(format!("no category numbered {n}")),
                        |c| Move::Chosen(c.name().to_owned()),
                    ),
                Err(_not_a_number) => {
                    let name = offered
                        .iter()
                        .find(|c| c.name().eq_ignore_ascii_case(&line))
                        .map_or(line.as_str(), |c| c.name());
                    Move::Chosen(name.to_owned())
                }
            }
        })
    }

    fn choose_question(
        &mut self,
        _player: &Player,
        category: &str,
        offered: &[&Question],
    ) -> Move<u32> {
        let mut lines = vec![format!("{category}:")];
        lines.extend(offered.iter().map(|q| format!("  {} pts", q.points())));
        if !self.show(&lines) {
            return Move::Abort;
        }

        self.ask("Choose a point value: ", |line| {
            let digits = line.trim_end_matches(|c: char| !c.is_ascii_digit()).trim();
            digits
                .parse::<u32>()
                .map_or_else(
                    |_not_a_number| Move::invalid(format!("{line:?} is not a point value")),
                    Move::Chosen,
                )
        })
    }

    fn choose_answer(&mut self, _player: &Player, question: &Question) -> Move<String> {
        let mut lines = vec![format!("Question: {}", question.text())];
        lines.extend(
            question
                .options()
                .iter()
                .map(|(key, text)| format!("  {key}) {text}")),
        );
        if !self.show(&lines) {
            return Move::Abort;
        }

        self.ask("Your answer: ", |line| {
            if line.is_empty() {
                Move::invalid("no answer entered")
            } else {
                Move::Chosen(line.to_ascii_uppercase())
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::io::Cursor;

    use super::*;

    type Console = ConsoleMoveProvider<Cursor<&'static str>, Vec<u8>>;

    fn console(input: &'static str) -> Console {
        ConsoleMoveProvider::new(Cursor::new(input), Vec::new())
    }

    fn output(console: Console) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    fn question(points: u32) -> Question {
        let options: BTreeMap<String, String> = [("A", "Ferris"), ("B", "Gopher")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Question::new("Who is the Rust mascot?", points, options, "A").unwrap()
    }

    fn categories() -> Vec<Category> {
        let mut rust = Category::new("Rust");
        rust.add_question(question(100)).unwrap();
        rust.add_question(question(200)).unwrap();
        vec![rust, Category::new("Go")]
    }

    #[test]
    fn category_by_number_or_name() {
        let player = Player::new(0, "Ada");
        let categories = categories();
        let offered: Vec<&Category> = categories.iter().collect();

        let mut c = console("2\nrust\n");
        assert_eq!(
            c.choose_category(&player, &offered),
            Move::Chosen("Go".to_owned())
        );
        assert_eq!(
            c.choose_category(&player, &offered),
            Move::Chosen("Rust".to_owned())
        );
        let text = output(c);
        assert!(text.contains("Ada's turn (score: 0)"));
        assert!(text.contains("1. Rust (2 left)"));
    }

    #[test]
    fn unknown_name_passes_through_and_bad_number_is_invalid() {
        let player = Player::new(0, "Ada");
        let categories = categories();
        let offered: Vec<&Category> = categories.iter().collect();

        let mut c = console("Cooking\n9\n\n");
        assert_eq!(
            c.choose_category(&player, &offered),
            Move::Chosen("Cooking".to_owned())
        );
        assert!(matches!(
            c.choose_category(&player, &offered),
            Move::Invalid { .. }
        ));
        assert!(matches!(
            c.choose_category(&player, &offered),
            Move::Invalid { .. }
        ));
    }

    #[test]
    fn question_accepts_points_suffix() {
        let player = Player::new(0, "Ada");
        let q = question(200);
        let mut c = console("200 pts\nlots\n");
        assert_eq!(c.choose_question(&player, "Rust", &[&q]), Move::Chosen(200));
        assert!(matches!(
            c.choose_question(&player, "Rust", &[&q]),
            Move::Invalid { .. }
        ));
    }

    #[test]
    fn answer_is_uppercased_and_options_are_shown() {
        let player = Player::new(0, "Ada");
        let q = question(100);
        let mut c = console(" b \n");
        assert_eq!(c.choose_answer(&player, &q), Move::Chosen("B".to_owned()));
        let text = output(c);
        assert!(text.contains("Question: Who is the Rust mascot?"));
        assert!(text.contains("  A) Ferris"));
    }

    #[test]
    fn end_and_closed_input_abort() {
        let player = Player::new(0, "Ada");
        let q = question(100);
        let mut c = console("END\n");
        assert_eq!(c.choose_answer(&player, &q), Move::Abort);
        assert_eq!(c.choose_answer(&player, &q), Move::Abort);
    }

    #[test]
    fn player_names_reprompt_on_bad_input() {
        let mut c = console("0\nfive\n2\n\nAda\n  Grace \n");
        let names = c.ask_player_names(4).unwrap();
        assert_eq!(names, vec!["Ada".to_owned(), "Grace".to_owned()]);
        let text = output(c);
        assert_eq!(text.matches("Please enter a number from 1 to 4.").count(), 2);
        assert!(text.contains("A name cannot be empty."));
    }

    #[test]
    fn player_names_stop_at_end() {
        let mut c = console("3\nAda\nend\n");
        assert_eq!(c.ask_player_names(4).unwrap(), vec!["Ada".to_owned()]);
    }

    #[test]
    fn content_path_prompt() {
        let mut c = console("questions.json\n");
        assert_eq!(
            c.ask_content_path().unwrap(),
            Some(PathBuf::from("questions.json"))
        );
        let mut c = console("");
        assert_eq!(c.ask_content_path().unwrap(), None);
    }
}
