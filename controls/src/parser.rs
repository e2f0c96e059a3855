//! Parsers for the speed text input and for frame-stamped control scripts

use crate::{ControlCommand, ControlScript, ScheduledCommand, COMMENT_TOKEN, FRAME_TOKEN};
use bodies::prelude::BodyKind;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, char, digit1, space1, u32 as parse_u32, u64 as parse_u64},
    combinator::{all_consuming, value},
    error::ErrorKind,
    Err::Failure,
};
use tracing::debug;

pub type Result<I, O, E = ParseError<I>> = std::result::Result<(I, O), nom::Err<E>>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError<I> {
    #[error("Speed multiplier must be a non-negative integer")]
    SpeedMultiplier,
    #[error("Unknown body '{0}'")]
    UnknownBody(String),
    #[error("Parse error")]
    Nom(I, ErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid speed multiplier '{0}', expected a non-negative integer")]
pub struct SpeedInputError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("Line {line}: invalid control script entry '{text}'")]
    Syntax { line: usize, text: String },
    #[error("Line {line}: {reason}")]
    Rejected { line: usize, reason: String },
    #[error("Line {line}: frame {frame} is earlier than the previous entry")]
    FrameOrder { line: usize, frame: u64 },
}

/// Parse the contents of the speed text input.
///
/// Only ASCII digits are accepted, surrounding whitespace is ignored. Signs,
/// decimals, empty input and values that overflow are rejected rather than
/// clamped.
pub fn parse_speed_multiplier(input: &str) -> std::result::Result<u32, SpeedInputError> {
    all_consuming(speed_multiplier)(input.trim())
        .map(|(_, multiplier)| multiplier)
        .map_err(|_| SpeedInputError(input.to_owned()))
}

pub fn parse_command(s: &str) -> Result<&str, ControlCommand> {
    alt((speed, resize, focus, keyword_command))(s)
}

/// Parse a control script.
///
/// ```text
/// # comments and blank lines are ignored
/// @120 next
/// @240 speed 4
/// @300 stop
/// ```
pub fn parse_control_script(text: &str) -> std::result::Result<ControlScript, ScriptError> {
    let mut entries: Vec<ScheduledCommand> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split(COMMENT_TOKEN).next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let (_, entry) = all_consuming(scheduled_command)(content).map_err(|e| match e {
            Failure(reason) => ScriptError::Rejected {
                line,
                reason: reason.to_string(),
            },
            _ => ScriptError::Syntax {
                line,
                text: content.to_owned(),
            },
        })?;

        if let Some(prev) = entries.last() {
            if entry.frame < prev.frame {
                return Err(ScriptError::FrameOrder {
                    line,
                    frame: entry.frame,
                });
            }
        }

        debug!(
            line,
            frame = entry.frame,
            command = entry.command.name(),
            "Parsed control script entry"
        );
        entries.push(entry);
    }

    Ok(ControlScript::new(entries))
}

fn scheduled_command(s: &str) -> Result<&str, ScheduledCommand> {
    let (s, _) = char(FRAME_TOKEN)(s)?;
    let (s, frame) = parse_u64(s)?;
    let (s, _) = space1(s)?;
    let (s, command) = parse_command(s)?;
    Ok((s, ScheduledCommand { frame, command }))
}

fn keyword_command(s: &str) -> Result<&str, ControlCommand> {
    alt((
        value(ControlCommand::FocusNext, tag("next")),
        value(ControlCommand::FocusPrevious, tag("previous")),
        value(ControlCommand::FocusPrevious, tag("prev")),
        value(ControlCommand::TogglePlayback, tag("toggle")),
        value(ControlCommand::Stop, tag("stop")),
        value(ControlCommand::Resume, tag("resume")),
    ))(s)
}

fn speed(s: &str) -> Result<&str, ControlCommand> {
    let (s, _) = tag("speed")(s)?;
    let (s, _) = space1(s)?;
    let (s, multiplier) = speed_multiplier(s)?;
    Ok((s, ControlCommand::Speed(multiplier)))
}

fn resize(s: &str) -> Result<&str, ControlCommand> {
    let (s, _) = tag("resize")(s)?;
    let (s, _) = space1(s)?;
    let (s, width) = parse_u32(s)?;
    let (s, _) = space1(s)?;
    let (s, height) = parse_u32(s)?;
    Ok((s, ControlCommand::Resize { width, height }))
}

fn focus(s: &str) -> Result<&str, ControlCommand> {
    let (s, _) = tag("focus")(s)?;
    let (s, _) = space1(s)?;
    let (s, name) = alpha1(s)?;
    let kind = name
        .parse::<BodyKind>()
        .map_err(|_| Failure(ParseError::UnknownBody(name.to_owned())))?;
    Ok((s, ControlCommand::Focus(kind)))
}

/// Digits only, terminated by whitespace or the end of input
fn speed_multiplier(s: &str) -> Result<&str, u32> {
    let (rest, digits) = digit1::<&str, ParseError<&str>>(s)
        .map_err(|_| Failure(ParseError::SpeedMultiplier))?;
    if rest.starts_with(|c: char| !c.is_whitespace()) {
        return Err(Failure(ParseError::SpeedMultiplier));
    }
    let multiplier = digits
        .parse::<u32>()
        .map_err(|_| Failure(ParseError::SpeedMultiplier))?;
    Ok((rest, multiplier))
}

impl<I> nom::error::ParseError<I> for ParseError<I> {
    fn from_error_kind(s: I, kind: ErrorKind) -> Self {
        ParseError::Nom(s, kind)
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}
