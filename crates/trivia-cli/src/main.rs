//! Console front end for the trivia session engine.
//!
//! Wires the content loaders, the session engine, and the console move
//! provider together, then writes the text report and the CSV event log
//! once the session ends.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from `trivia-config.yaml` (defaults if absent)
//! 3. Initialize structured logging (tracing, to stderr)
//! 4. Create the session engine and subscribe the event log
//! 5. Load the question file into a board
//! 6. Register players
//! 7. Play turns until the board is complete or a player types `end`
//! 8. Write the report and the event log

mod console;
mod error;
mod trace_observer;

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trivia_board::Board;
use trivia_core::config::{LoggingConfig, OutputConfig};
use trivia_core::{
    EndReason, ReportBuilder, ReportOutcome, SessionEngine, TriviaConfig, TurnOutcome, TurnRecord,
};
use trivia_events::EventLog;
use trivia_types::{Activity, SessionId};

use crate::console::ConsoleMoveProvider;
use crate::error::CliError;
use crate::trace_observer::TracingObserver;

/// Play a turn-based trivia session from a question file.
#[derive(Debug, Parser)]
#[command(name = "trivia", version, about)]
struct Args {
    /// Question file (.csv, .json or .xml). Asked for when omitted.
    content: Option<PathBuf>,

    /// YAML configuration file.
    #[arg(long, default_value = "trivia-config.yaml")]
    config: PathBuf,

    /// Register a player by name. Repeat once per player.
    #[arg(long = "player", value_name = "NAME")]
    players: Vec<String>,

    /// Seed for choosing the first player.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the text report.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Where to write the CSV event log.
    #[arg(long)]
    event_log: Option<PathBuf>,
}

impl Args {
    /// Command-line values win over the file and the environment.
    fn apply_to(&mut self, config: &mut TriviaConfig) {
        if let Some(seed) = self.seed {
            config.session.seed = Some(seed);
        }
        if let Some(path) = self.content.take() {
            config.session.content_path = Some(path);
        }
        if let Some(path) = self.report.take() {
            config.output.report_path = path;
        }
        if let Some(path) = self.event_log.take() {
            config.output.event_log_path = path;
        }
    }
}

fn main() -> Result<(), CliError> {
    // 1. Parse arguments.
    let mut args = Args::parse();

    // 2. Load configuration.
    let (mut config, from_file) = load_config(&args.config)?;
    args.apply_to(&mut config);

    // 3. Initialize structured logging.
    init_tracing(&config.logging);
    info!("trivia starting");
    if !from_file {
        info!(path = %args.config.display(), "Config file not found, using defaults");
    }

    let stdin = io::stdin();
    let mut console = ConsoleMoveProvider::new(stdin.lock(), io::stdout());
    run(&config, args.players, &mut console)
}

/// Run one full session against `console` using `config`.
fn run<R: BufRead, W: Write>(
    config: &TriviaConfig,
    players: Vec<String>,
    console: &mut ConsoleMoveProvider<R, W>,
) -> Result<(), CliError> {
    // 4. Create the engine and its observers.
    let session_id = SessionId::new();
    let mut engine = SessionEngine::new(session_id, Board::empty(), &config.session);
    let log = Rc::new(RefCell::new(EventLog::new()));
    engine.bus().subscribe(Rc::<RefCell<EventLog>>::clone(&log));
    engine
        .bus()
        .subscribe(Rc::new(RefCell::new(TracingObserver::new())));
    info!(%session_id, max_players = config.session.max_players, "Session created");

    // 5. Load content.
    let content = match &config.session.content_path {
        Some(path) => path.clone(),
        None => console.ask_content_path()?.ok_or(CliError::NoContent)?,
    };
    let source = content.display().to_string();
    engine.note(Activity::LoadFile, source.as_str())?;
    let board = trivia_content::load_board(&content)?;
    engine.load_board(board, &source)?;

    // 6. Register players.
    let names = if players.is_empty() {
        console.ask_player_names(config.session.max_players)?
    } else {
        players
    };
    if names.is_empty() {
        return Err(CliError::NoPlayers);
    }
    for name in &names {
        engine.register_player(name)?;
    }

    // 7. Play.
    let mut rng = config
        .session
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    play(&mut engine, console, &mut rng)?;

    let summary = engine.finish()?;
    console.say("")?;
    console.say("Final Scores:")?;
    for player in &summary.players {
        console.say(&format!("  {}: {}", player.name, player.score))?;
    }
    if summary.observer_failures > 0 {
        warn!(
            failures = summary.observer_failures,
            "some observers failed during the session"
        );
    }

    // 8. Write outputs.
    write_outputs(&mut engine, &log, &config.output, console)?;

    info!(
        %session_id,
        end_reason = %summary.end_reason,
        turns = summary.turns_completed,
        "trivia shutdown complete"
    );
    Ok(())
}

/// Start the session and play turns until it ends, echoing each result.
fn play<R: BufRead, W: Write>(
    engine: &mut SessionEngine,
    console: &mut ConsoleMoveProvider<R, W>,
    rng: &mut StdRng,
) -> Result<(), CliError> {
    engine.start(rng)?;
    if let Some(first) = engine
        .first_player()
        .and_then(|i| engine.scoreboard().get(i))
    {
        console.say(&format!("{} goes first.", first.name))?;
    }

    while !engine.state().is_terminal() {
        match engine.play_turn(console)? {
            TurnOutcome::Completed(record) => console.say(&turn_line(&record))?,
            TurnOutcome::Aborted | TurnOutcome::BoardComplete => {}
        }
    }

    match engine.end_reason() {
        Some(EndReason::BoardComplete) => console.say("All questions have been answered.")?,
        Some(EndReason::Aborted) | None => console.say("Session ended.")?,
    }
    Ok(())
}

fn turn_line(record: &TurnRecord) -> String {
    format!(
        "{} - {} ({}{} pts). {} now has {} points.",
        record.answer_text,
        record.result,
        record.result.sign(),
        record.points,
        record.player,
        record.score_after
    )
}

/// Write the text report and the CSV event log.
///
/// Each output is announced with its own event before it is written, so the
/// event log includes its own `Generate Event Log` row.
fn write_outputs<R: BufRead, W: Write>(
    engine: &mut SessionEngine,
    log: &RefCell<EventLog>,
    output: &OutputConfig,
    console: &mut ConsoleMoveProvider<R, W>,
) -> Result<(), CliError> {
    let report_path = &output.report_path;
    engine.note(Activity::GenerateReport, report_path.display().to_string())?;
    let outcome = ReportBuilder::new(&log.borrow(), engine.board(), engine.scoreboard()).build();
    match outcome {
        ReportOutcome::Empty => console.say("No turns were played; no report written.")?,
        ReportOutcome::Ready(report) => {
            let file = create(report_path)?;
            report
                .write_to(BufWriter::new(file))
                .map_err(|source| CliError::Output {
                    path: report_path.clone(),
                    source,
                })?;
            if report.unresolved_turns > 0 {
                warn!(
                    unresolved = report.unresolved_turns,
                    "report contains unresolved turns"
                );
            }
            info!(path = %report_path.display(), turns = report.turns.len(), "Report written");
            console.say(&format!("Report written to {}", report_path.display()))?;
        }
    }

    let log_path = &output.event_log_path;
    engine.note(Activity::GenerateEventLog, log_path.display().to_string())?;
    let file = create(log_path)?;
    let rows = log.borrow().write_csv(BufWriter::new(file))?;
    info!(path = %log_path.display(), rows, "Event log written");
    console.say(&format!("Event log written to {}", log_path.display()))?;
    Ok(())
}

fn create(path: &Path) -> Result<File, CliError> {
    File::create(path).map_err(|source| CliError::Output {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist. Environment overrides apply either way.
///
/// Returns the config and whether it came from the file.
fn load_config(path: &Path) -> Result<(TriviaConfig, bool), CliError> {
    if path.exists() {
        Ok((TriviaConfig::from_file(path)?, true))
    } else {
        Ok((TriviaConfig::parse("")?, false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use trivia_core::config::SessionConfig;

    use super::*;

    const QUESTIONS: &str = "\
Category,Value,Question,A,B,C,D,CorrectAnswer
Rust,100,What keyword declares a constant?,let,const,static,mut,B
Rust,200,Which trait formats with {}?,Debug,Display,Write,Read,B
";

    fn config(dir: &Path) -> TriviaConfig {
        let content = dir.join("questions.csv");
        std::fs::write(&content, QUESTIONS).unwrap();
        TriviaConfig {
            session: SessionConfig {
                max_players: 4,
                seed: Some(7),
                content_path: Some(content),
            },
            output: OutputConfig {
                report_path: dir.join("report.txt"),
                event_log_path: dir.join("events.csv"),
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn args_collect_repeated_players() {
        let args = Args::try_parse_from([
            "trivia",
            "q.json",
            "--player",
            "Ada",
            "--player",
            "Grace",
            "--seed",
            "3",
        ])
        .unwrap();
        assert_eq!(args.content, Some(PathBuf::from("q.json")));
        assert_eq!(args.players, vec!["Ada".to_owned(), "Grace".to_owned()]);
        assert_eq!(args.seed, Some(3));
        assert_eq!(args.config, PathBuf::from("trivia-config.yaml"));
    }

    #[test]
    fn flags_override_config() {
        let mut args = Args::try_parse_from([
            "trivia",
            "q.xml",
            "--seed",
            "9",
            "--report",
            "out.txt",
            "--event-log",
            "out.csv",
        ])
        .unwrap();
        let mut config = TriviaConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.session.seed, Some(9));
        assert_eq!(config.session.content_path, Some(PathBuf::from("q.xml")));
        assert_eq!(config.output.report_path, PathBuf::from("out.txt"));
        assert_eq!(config.output.event_log_path, PathBuf::from("out.csv"));
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, from_file) = load_config(&dir.path().join("absent.yaml")).unwrap();
        assert!(!from_file);
        assert_eq!(config.session.max_players, 4);
    }

    #[test]
    fn full_console_session_writes_report_and_event_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let input = "1\n100\nb\n1\n200 pts\nA\n";
        let mut console = ConsoleMoveProvider::new(Cursor::new(input), Vec::new());

        run(&config, vec!["Ada".to_owned()], &mut console).unwrap();

        let shown = String::from_utf8(console.into_output()).unwrap();
        assert!(shown.contains("Ada goes first."));
        assert!(shown.contains("const - Correct (+100 pts). Ada now has 100 points."));
        assert!(shown.contains("All questions have been answered."));
        assert!(shown.contains("  Ada: -100"));

        let report = std::fs::read_to_string(&config.output.report_path).unwrap();
        assert!(report.contains("Turn 1: Ada selected Rust for 100 pts"));
        assert!(report.contains("Answer: Debug - Wrong (-200 pts)"));

        let events = std::fs::read_to_string(&config.output.event_log_path).unwrap();
        let mut lines = events.lines();
        assert_eq!(
            lines.next(),
            Some(
                "Session_ID,Player_ID,Activity,Timestamp,Category,Question_Value,Answer_Given,Result,Score_After_Play"
            )
        );
        assert_eq!(events.matches(",Score Updated,").count(), 2);
        assert!(events.trim_end().lines().last().unwrap().contains("Generate Event Log"));
    }

    #[test]
    fn session_ended_before_any_turn_writes_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut console = ConsoleMoveProvider::new(Cursor::new("end\n"), Vec::new());

        run(&config, vec!["Ada".to_owned()], &mut console).unwrap();

        let shown = String::from_utf8(console.into_output()).unwrap();
        assert!(shown.contains("Session ended."));
        assert!(shown.contains("No turns were played; no report written."));
        assert!(!config.output.report_path.exists());
        assert!(config.output.event_log_path.exists());
    }

    #[test]
    fn closed_console_without_players_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut console = ConsoleMoveProvider::new(Cursor::new(""), Vec::new());
        assert!(matches!(
            run(&config, Vec::new(), &mut console),
            Err(CliError::NoPlayers)
        ));
    }
}
