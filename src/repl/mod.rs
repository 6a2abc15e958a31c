use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::session::{BatchReport, Session, SessionError};

#[derive(Parser)]
#[command(name = "spindle")]
#[command(about = "An interactive CLI for searching, downloading, and playing YouTube audio")]
#[command(version)]
pub struct Cli {
    /// Run every line of this file through `batchadd` before the prompt starts
    #[arg(short, long)]
    pub batch: Option<PathBuf>,

    /// Starting volume (0-100), overriding the configured default
    #[arg(long, env = "SPINDLE_VOLUME")]
    pub volume: Option<u8>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Search(String),
    BatchAdd(PathBuf),
    List,
    Select(usize),
    Play,
    Pause,
    Skip,
    Prev,
    Shuffle,
    Volume(i64),
    Current,
    Help,
    Exit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "search" if !rest.is_empty() => Ok(Command::Search(rest.to_string())),
        "search" => Err("Usage: search <query>".to_string()),
        "batchadd" if !rest.is_empty() => Ok(Command::BatchAdd(PathBuf::from(rest))),
        "batchadd" => Err("Usage: batchadd <file>".to_string()),
        "list" => Ok(Command::List),
        "select" => rest
            .parse()
            .map(Command::Select)
            .map_err(|_| "Usage: select <index>".to_string()),
        "play" => Ok(Command::Play),
        "pause" => Ok(Command::Pause),
        "skip" | "next" => Ok(Command::Skip),
        "prev" | "previous" => Ok(Command::Prev),
        "shuffle" => Ok(Command::Shuffle),
        "volume" => rest
            .parse()
            .map(Command::Volume)
            .map_err(|_| "Usage: volume <level>".to_string()),
        "current" => Ok(Command::Current),
        "help" => Ok(Command::Help),
        "exit" | "quit" => Ok(Command::Exit),
        other => Err(format!(
            "Unknown command '{other}'. Type 'help' for available commands."
        )),
    }
}

/// Blocking read-loop over stdin. One command is fully processed before
/// the next line is read; EOF behaves like `exit`.
pub fn run(session: &mut Session) -> Result<()> {
    println!("{}", "Type 'help' for available commands.".blue());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", "spindle>".blue());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            Ok(Command::Exit) => break,
            Ok(command) => dispatch(session, command),
            Err(message) => println!("{}", message.red()),
        }
    }

    session.stop();
    Ok(())
}

fn dispatch(session: &mut Session, command: Command) {
    match command {
        Command::Search(query) => {
            println!("{}", format!("Searching for '{query}'...").blue());
            match session.search(&query) {
                Ok(track) => println!("{} {}", "Added:".blue(), track.title.yellow()),
                Err(err) => render_error(&err),
            }
        }
        Command::BatchAdd(path) => match session.batch_add(&path) {
            Ok(report) => render_batch(&report),
            Err(err) => render_error(&err),
        },
        Command::List => {
            if session.is_empty() {
                println!(
                    "{}",
                    "No tracks in the list yet. Try 'search <query>'.".yellow()
                );
            } else {
                println!("{}", "Available tracks:".blue());
                for (index, track) in session.tracks() {
                    println!(
                        "{} {} {}",
                        format!("{index:3} :").blue(),
                        track.title.yellow(),
                        format!("- {}", track.format_duration()).blue()
                    );
                }
            }
        }
        Command::Select(index) => match session.select(index) {
            Ok(track) => println!("{} {}", "Now playing:".blue(), track.title.yellow()),
            Err(err) => render_error(&err),
        },
        Command::Play => match session.play() {
            Ok(()) => println!("{}", "Resumed.".blue()),
            Err(err) => render_error(&err),
        },
        Command::Pause => match session.pause() {
            Ok(()) => println!("{}", "Paused.".blue()),
            Err(err) => render_error(&err),
        },
        Command::Skip => match session.skip() {
            Ok(track) => println!("{} {}", "Now playing:".blue(), track.title.yellow()),
            Err(err) => render_error(&err),
        },
        Command::Prev => match session.skip_back() {
            Ok(track) => println!("{} {}", "Now playing:".blue(), track.title.yellow()),
            Err(err) => render_error(&err),
        },
        Command::Shuffle => {
            session.shuffle();
            println!(
                "{}",
                format!("Shuffled {} track(s).", session.len()).blue()
            );
        }
        Command::Volume(level) => match session.set_volume(level) {
            Ok(volume) => println!("{}", format!("Volume set to {volume}").blue()),
            Err(err) => render_error(&err),
        },
        Command::Current => match session.now_playing() {
            Some((index, track)) => {
                println!(
                    "{} {}",
                    format!("[{}] {index} :", session.playback()).blue(),
                    track.title.yellow()
                );
                if let Some(url) = &track.url {
                    println!("{}", format!("Source: {url}").blue());
                }
                println!(
                    "{}",
                    format!(
                        "Added {} | Volume {}%",
                        track.added_at.format("%Y-%m-%d %H:%M"),
                        session.volume()
                    )
                    .blue()
                );
            }
            None => println!("{}", "No track is selected.".yellow()),
        },
        Command::Help => print_help(),
        Command::Exit => unreachable!("handled by the loop"),
    }
}

pub fn render_error(err: &SessionError) {
    match err {
        SessionError::NothingSelected => println!("{}", err.to_string().yellow()),
        _ => println!("{}", err.to_string().red()),
    }
}

pub fn render_batch(report: &BatchReport) {
    for (query, err) in &report.failures {
        println!("{}", format!("Failed '{query}': {err}").red());
    }
    println!(
        "{}",
        format!(
            "Added {} track(s); {} failed.",
            report.added,
            report.failures.len()
        )
        .blue()
    );
}

fn print_help() {
    println!("{}", "Available commands:".blue());
    println!("  {} Search and download a track", "search <query>:".green());
    println!("  {} Add tracks from a text file, one query per line", "batchadd <file>:".green());
    println!("  {} List all tracks", "list:".green());
    println!("  {} Select a track from the list and play it", "select <index>:".green());
    println!("  {} Resume the paused track", "play:".green());
    println!("  {} Pause the current track", "pause:".green());
    println!("  {} Play the next track", "skip:".green());
    println!("  {} Play the previous track", "prev:".green());
    println!("  {} Randomly reorder the track list", "shuffle:".green());
    println!("  {} Set volume level (0 to 100)", "volume <level>:".green());
    println!("  {} Show the current track", "current:".green());
    println!("  {} Leave the player", "exit:".green());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("list"), Ok(Command::List));
        assert_eq!(parse_command("play"), Ok(Command::Play));
        assert_eq!(parse_command("PAUSE"), Ok(Command::Pause));
        assert_eq!(parse_command("shuffle"), Ok(Command::Shuffle));
        assert_eq!(parse_command("exit"), Ok(Command::Exit));
        assert_eq!(parse_command("quit"), Ok(Command::Exit));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse_command("next"), Ok(Command::Skip));
        assert_eq!(parse_command("previous"), Ok(Command::Prev));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            parse_command("search nothing else matters"),
            Ok(Command::Search("nothing else matters".to_string()))
        );
        assert_eq!(parse_command("select 3"), Ok(Command::Select(3)));
        assert_eq!(parse_command("volume -10"), Ok(Command::Volume(-10)));
        assert_eq!(
            parse_command("batchadd queries.txt"),
            Ok(Command::BatchAdd(PathBuf::from("queries.txt")))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_command("search").is_err());
        assert!(parse_command("select").is_err());
        assert!(parse_command("select one").is_err());
        assert!(parse_command("volume loud").is_err());
        assert!(parse_command("frobnicate").is_err());
    }
}
