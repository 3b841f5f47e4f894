//! Operator console - one command per line on stdin

use std::fmt;
use thiserror::Error;

/// A parsed operator command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Move the detection confidence slider
    Detection(String),
    /// Move the tracking confidence slider
    Tracking(String),
    /// Toggle the landmarks overlay
    Landmarks(bool),
    /// Toggle the FPS overlay
    Fps(bool),
    /// Capture and upload the displayed frame
    Snapshot,
    /// Print the settings that would be pushed now
    Settings,
    /// Print the latest status readouts
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command} needs a value")]
    MissingValue { command: &'static str },

    #[error("expected on/off, got {0:?}")]
    NotAToggle(String),
}

fn parse_toggle(value: &str) -> Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        _ => Err(ParseError::NotAToggle(value.to_string())),
    }
}

impl Command {
    /// Parse one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let value = words.next();

        let command = match name.to_ascii_lowercase().as_str() {
            "detection" | "d" => Command::Detection(
                value
                    .ok_or(ParseError::MissingValue {
                        command: "detection",
                    })?
                    .to_string(),
            ),
            "tracking" | "t" => Command::Tracking(
                value
                    .ok_or(ParseError::MissingValue {
                        command: "tracking",
                    })?
                    .to_string(),
            ),
            "landmarks" => Command::Landmarks(parse_toggle(
                value.ok_or(ParseError::MissingValue {
                    command: "landmarks",
                })?,
            )?),
            "fps" => Command::Fps(parse_toggle(
                value.ok_or(ParseError::MissingValue { command: "fps" })?,
            )?),
            "snapshot" | "snap" | "s" => Command::Snapshot,
            "settings" => Command::Settings,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// Help text listing every command
pub struct Usage;

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Commands:")?;
        writeln!(f, "  detection <0..1>   set minimum detection confidence")?;
        writeln!(f, "  tracking <0..1>    set minimum tracking confidence")?;
        writeln!(f, "  landmarks on|off   toggle landmark overlay")?;
        writeln!(f, "  fps on|off         toggle FPS overlay")?;
        writeln!(f, "  snapshot           save the displayed frame on the server")?;
        writeln!(f, "  settings           show the current settings")?;
        writeln!(f, "  status             show gesture, frame count and confidence")?;
        writeln!(f, "  help, ?            show this list")?;
        write!(f, "  quit               exit")
    }
}
