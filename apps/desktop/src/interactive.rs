use std::{io::Write, path::PathBuf};

use anyhow::Result;
use client_core::{
    RecognitionSession, RecognitionTransport, SelectOutcome, SelectedImage, SubmitOutcome,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::render::render_snapshot;

const HELP: &str = "Commands:
  select <path>  choose an image file
  submit         send the selected image for recognition
  reset          start over (after a result or an error)
  status         show the current state
  help           show this message
  quit           exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(PathBuf),
    Submit,
    Reset,
    Status,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word.to_ascii_lowercase().as_str() {
        "select" | "open" => {
            if rest.is_empty() {
                return Err("usage: select <path>".to_string());
            }
            Command::Select(PathBuf::from(rest))
        }
        "submit" | "recognize" => Command::Submit,
        "reset" | "again" => Command::Reset,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}'; type `help`")),
    };
    Ok(Some(command))
}

pub async fn run<T, R, W>(
    session: &mut RecognitionSession<T>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    T: RecognitionTransport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", render_snapshot(&session.snapshot(), None))?;
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        let show_state = command != Command::Help;
        match command {
            Command::Quit => break,
            Command::Help => write!(out, "{HELP}")?,
            Command::Status => {}
            Command::Select(path) => match SelectedImage::from_path(&path).await {
                Ok(image) => {
                    if session.select_file(Some(image)) == SelectOutcome::Busy {
                        writeln!(out, "A recognition request is still running.")?;
                    }
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "image load failed");
                    writeln!(out, "{err:#}")?;
                    continue;
                }
            },
            Command::Submit => {
                writeln!(out, "Analyzing Image...")?;
                out.flush()?;
                if session.submit().await == SubmitOutcome::Ignored {
                    writeln!(out, "A recognition request is already running.")?;
                }
            }
            Command::Reset => {
                if !session.snapshot().can_reset() {
                    writeln!(out, "Nothing to reset yet.")?;
                    continue;
                }
                session.reset();
            }
        }

        if show_state {
            let view = session.view();
            write!(out, "{}", render_snapshot(&session.snapshot(), view.as_ref()))?;
        }
        out.flush()?;
    }
    Ok(())
}
