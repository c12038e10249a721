//! Post-session report, rebuilt by replaying the event log.
//!
//! The report never reads live turn state. It walks the [`EventLog`] in
//! order, keeps only `Score Updated` events, and joins each one back to the
//! final [`Board`] on `(category, point value)` to recover the question and
//! answer texts. The score printed for a turn is the event's own
//! `score_after_play`, not a recomputation.
//!
//! A turn that no longer resolves against the board is rendered as an
//! `UNRESOLVED` line and counted; nothing is invented to fill the gap.

use core::fmt;
use std::io::{self, Write};

use tracing::warn;
use trivia_board::Board;
use trivia_events::EventLog;
use trivia_types::{Activity, AnswerResult, Event, SessionId};

use crate::scoreboard::Scoreboard;

const TITLE: &str = "TRIVIA SESSION REPORT";

/// One turn as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTurn {
    /// The event resolved to a question and an answer option.
    Resolved {
        /// 1-based turn number.
        turn: usize,
        /// Acting player.
        player: String,
        /// Category name.
        category: String,
        /// Point value.
        points: u32,
        /// Question text from the board.
        question: String,
        /// Display text of the chosen option.
        answer: String,
        /// Scoring result.
        result: AnswerResult,
        /// Score recorded on the event.
        score_after: i64,
    },
    /// The event could not be joined back to the board.
    Unresolved {
        /// 1-based turn number.
        turn: usize,
        /// Acting player, if recorded.
        player: String,
        /// Why the join failed.
        reason: String,
    },
}

impl ReportTurn {
    fn push_lines(&self, out: &mut Vec<String>) {
        match self {
            Self::Resolved {
                turn,
                player,
                category,
                points,
                question,
                answer,
                result,
                score_after,
            } => {
                out.push(format!(
                    "Turn {turn}: {player} selected {category} for {points} pts"
                ));
                out.push(format!("Question: {question}"));
                out.push(format!(
                    "Answer: {answer} - {result} ({}{points} pts)",
                    result.sign()
                ));
                out.push(format!("Score after turn: {player} = {score_after}"));
            }
            Self::Unresolved {
                turn,
                player,
                reason,
            } => {
                out.push(format!("Turn {turn}: {player} UNRESOLVED ({reason})"));
            }
        }
        out.push(String::new());
    }
}

/// A finished report, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Session the log belongs to.
    pub session_id: SessionId,
    /// Player names in registration order.
    pub players: Vec<String>,
    /// Turn records in log order.
    pub turns: Vec<ReportTurn>,
    /// `(name, score)` per player in registration order.
    pub final_scores: Vec<(String, i64)>,
    /// How many turns could not be resolved against the board.
    pub unresolved_turns: usize,
}

impl Report {
    /// The report as text lines, without trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![
            TITLE.to_owned(),
            "=".repeat(TITLE.len()),
            String::new(),
            format!("Session ID: {}", self.session_id),
            String::new(),
            format!("Players: {}", self.players.join(", ")),
            String::new(),
            "Gameplay Summary:".to_owned(),
            "-----------------".to_owned(),
        ];
        for turn in &self.turns {
            turn.push_lines(&mut out);
        }
        out.push("Final Scores:".to_owned());
        out.extend(
            self.final_scores
                .iter()
                .map(|(name, score)| format!("{name}: {score}")),
        );
        out
    }

    /// Write every line, newline-terminated, to `writer`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in self.lines() {
            writeln!(writer, "{line}")?;
        }
        writer.flush()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Result of [`ReportBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The log holds no `Score Updated` event; there is nothing to report.
    Empty,
    /// A report with at least one turn.
    Ready(Report),
}

/// Rebuilds a [`Report`] from an event log and the final session state.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder<'a> {
    log: &'a EventLog,
    board: &'a Board,
    scoreboard: &'a Scoreboard,
}

impl<'a> ReportBuilder<'a> {
    /// Borrow the inputs for a report.
    pub const fn new(log: &'a EventLog, board: &'a Board, scoreboard: &'a Scoreboard) -> Self {
        Self {
            log,
            board,
            scoreboard,
        }
    }

    /// Replay the log and assemble the report.
    pub fn build(&self) -> ReportOutcome {
        let scored: Vec<&Event> = self.log.of_activity(Activity::ScoreUpdated).collect();
        let Some(first) = scored.first() else {
            return ReportOutcome::Empty;
        };
        let session_id = self
            .log
            .events()
            .first()
            .map_or(first.session_id, |e| e.session_id);

        let mut turns = Vec::with_capacity(scored.len());
        let mut unresolved_turns = 0_usize;
        for (offset, event) in scored.iter().enumerate() {
            let turn = offset.saturating_add(1);
            let record = self.resolve(turn, event);
            if let ReportTurn::Unresolved { reason, .. } = &record {
                warn!(turn, %reason, "report turn could not be resolved");
                unresolved_turns = unresolved_turns.saturating_add(1);
            }
            turns.push(record);
        }

        let players = self.scoreboard.players();
        ReportOutcome::Ready(Report {
            session_id,
            players: players.iter().map(|p| p.name.clone()).collect(),
            turns,
            final_scores: players.iter().map(|p| (p.name.clone(), p.score)).collect(),
            unresolved_turns,
        })
    }

    fn resolve(&self, turn: usize, event: &Event) -> ReportTurn {
        let player = event.player_id.clone().unwrap_or_default();
        let unresolved = |reason: String| ReportTurn::Unresolved {
            turn,
            player: player.clone(),
            reason,
        };

        let (Some(category), Some(points), Some(key), Some(result), Some(score_after)) = (
            event.category.as_deref(),
            event.question_value,
            event.answer_given.as_deref(),
            event.result,
            event.score_after_play,
        ) else {
            return unresolved("event is missing turn fields".to_owned());
        };

        let Some(question) = self.board.find_question(category, points) else {
            return unresolved(format!("no {points}-point question in {category:?}"));
        };
        let Some(answer) = question.option_text(key) else {
            return unresolved(format!("answer {key:?} is not an option"));
        };

        ReportTurn::Resolved {
            turn,
            player,
            category: category.to_owned(),
            points,
            question: question.text().to_owned(),
            answer: answer.to_owned(),
            result,
            score_after,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::collections::BTreeMap;

    use trivia_events::EventBuilder;
    use trivia_types::{Category, Question};

    use super::*;

    fn board() -> Board {
        let options: BTreeMap<String, String> = [("A", "A compiled language"), ("B", "A snake")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        let mut general = Category::new("General");
        general
            .add_question(Question::new("What is Rust?", 100, options, "A").unwrap())
            .unwrap();
        Board::new(vec![general]).unwrap()
    }

    fn scored(session: SessionId, category: &str, points: u32, key: &str, score: i64) -> Event {
        EventBuilder::new(session, Activity::ScoreUpdated)
            .player("Ada")
            .category(category)
            .question_value(points)
            .answer_given(key)
            .result(AnswerResult::Correct)
            .score_after_play(score)
            .build()
            .unwrap()
    }

    fn scoreboard(score: i64) -> Scoreboard {
        let mut scoreboard = Scoreboard::new(4);
        scoreboard.add_player("Ada").unwrap();
        if score != 0 {
            let points = u32::try_from(score).unwrap();
            scoreboard
                .apply_result(0, AnswerResult::Correct, points)
                .unwrap();
        }
        scoreboard
    }

    #[test]
    fn log_without_scores_is_empty() {
        let mut log = EventLog::new();
        log.append(
            EventBuilder::new(SessionId::new(), Activity::StartGame)
                .build()
                .unwrap(),
        );
        let board = board();
        let scoreboard = scoreboard(0);
        assert_eq!(
            ReportBuilder::new(&log, &board, &scoreboard).build(),
            ReportOutcome::Empty
        );
    }

    #[test]
    fn single_correct_turn_renders_player_points_and_result() {
        let session = SessionId::new();
        let mut log = EventLog::new();
        log.append(scored(session, "General", 100, "A", 100));
        let board = board();
        let scoreboard = scoreboard(100);

        let ReportOutcome::Ready(report) = ReportBuilder::new(&log, &board, &scoreboard).build()
        else {
            panic!("expected a report");
        };
        let text = report.to_string();

        assert!(text.contains("Ada"));
        assert!(text.contains("100"));
        assert!(text.contains("Correct"));
        assert!(text.contains("Turn 1: Ada selected General for 100 pts"));
        assert!(text.contains("Answer: A compiled language - Correct (+100 pts)"));
        assert!(text.contains("Score after turn: Ada = 100"));
        assert!(text.trim_end().ends_with("Ada: 100"));
        assert_eq!(report.unresolved_turns, 0);
    }

    #[test]
    fn score_comes_from_the_event_not_the_scoreboard() {
        let session = SessionId::new();
        let mut log = EventLog::new();
        log.append(scored(session, "General", 100, "A", 4242));
        let board = board();
        let scoreboard = scoreboard(100);

        let ReportOutcome::Ready(report) = ReportBuilder::new(&log, &board, &scoreboard).build()
        else {
            panic!("expected a report");
        };
        assert!(report
            .lines()
            .contains(&"Score after turn: Ada = 4242".to_owned()));
    }

    #[test]
    fn unknown_question_is_flagged_not_fabricated() {
        let session = SessionId::new();
        let mut log = EventLog::new();
        log.append(scored(session, "History", 300, "A", 300));
        log.append(scored(session, "General", 100, "Z", 400));
        log.append(scored(session, "General", 100, "a", 500));
        let board = board();
        let scoreboard = scoreboard(0);

        let ReportOutcome::Ready(report) = ReportBuilder::new(&log, &board, &scoreboard).build()
        else {
            panic!("expected a report");
        };
        assert_eq!(report.turns.len(), 3);
        assert_eq!(report.unresolved_turns, 2);
        let text = report.to_string();
        assert!(text.contains("Turn 1: Ada UNRESOLVED"));
        assert!(text.contains("Turn 2: Ada UNRESOLVED"));
        assert!(text.contains("Turn 3: Ada selected General for 100 pts"));
    }

    #[test]
    fn write_to_emits_same_text_as_display() {
        let session = SessionId::new();
        let mut log = EventLog::new();
        log.append(scored(session, "General", 100, "A", 100));
        let board = board();
        let scoreboard = scoreboard(100);
        let ReportOutcome::Ready(report) = ReportBuilder::new(&log, &board, &scoreboard).build()
        else {
            panic!("expected a report");
        };

        let mut buffer = Vec::new();
        report.write_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), report.to_string());
        assert!(report.to_string().contains(&format!("Session ID: {session}")));
    }
}
