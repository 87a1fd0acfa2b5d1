//! Turns a line of user input into a typed command, and the argument
//! string of a command into the fields of a task.
//!
//! Every function here is pure. The command being parsed is always passed
//! in explicitly, so there is no parser state to keep in sync.

use chrono::NaiveDateTime;
use std::convert::TryFrom;
use std::num::IntErrorKind;
use tracing::debug;

use crate::error::{TaskFormatError, TaskListIndexError, UnknownCommand};
use crate::model::{TaskKind, When, DISPLAY_DATE_FORMAT, FILE_DATE_FORMAT};

const BY: &str = " /by ";
const FROM: &str = " /from ";
const TO: &str = " /to ";

/// Accepted date and time patterns, tried in this order.
const DATE_FORMATS: [&str; 5] = [
    "%d-%m-%Y %H%M",
    FILE_DATE_FORMAT,
    "%Y-%m-%dT%H:%M",
    "%d %b %Y %I:%M %p",
    DISPLAY_DATE_FORMAT,
];

/// What mark, unmark and delete do to the task they point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Mark,
    Unmark,
    Delete,
}

/// A recognised command keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Bye,
    List,
    AddTask(TaskKind),
    ChangeStatus(StatusChange),
    Find,
}

impl Command {
    /// Match a keyword, ignoring case.
    pub fn from_keyword(keyword: &str) -> Option<Command> {
        let command = match keyword.to_ascii_lowercase().as_str() {
            "bye" => Command::Bye,
            "list" => Command::List,
            "todo" => Command::AddTask(TaskKind::Todo),
            "deadline" => Command::AddTask(TaskKind::Deadline),
            "event" => Command::AddTask(TaskKind::Event),
            "mark" => Command::ChangeStatus(StatusChange::Mark),
            "unmark" => Command::ChangeStatus(StatusChange::Unmark),
            "delete" => Command::ChangeStatus(StatusChange::Delete),
            "find" => Command::Find,
            _ => return None,
        };
        Some(command)
    }

    /// Whether a successful run of this command changes the list.
    pub fn is_mutating(self) -> bool {
        matches!(self, Command::AddTask(_) | Command::ChangeStatus(_))
    }
}

impl TryFrom<Command> for TaskKind {
    type Error = TaskFormatError;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        match command {
            Command::AddTask(kind) => Ok(kind),
            _ => Err(TaskFormatError::UnknownTaskType),
        }
    }
}

/// Split a raw input line into its command and the trimmed rest.
pub fn parse_input(input: &str) -> Result<(Command, String), UnknownCommand> {
    let input = input.trim();
    let (keyword, args) = match input.find(char::is_whitespace) {
        Some(at) => (&input[..at], input[at..].trim()),
        None => (input, ""),
    };

    let command =
        Command::from_keyword(keyword).ok_or_else(|| UnknownCommand(keyword.to_string()))?;
    debug!(?command, args, "parsed input");
    Ok((command, args.to_string()))
}

/// Split the argument string of an adding command into its fields:
/// `[description]`, `[description, by]` or `[description, from, to]`.
/// The fields are trimmed and never blank.
pub fn parse_task_description(kind: TaskKind, args: &str) -> Result<Vec<String>, TaskFormatError> {
    if args.trim().is_empty() {
        return Err(TaskFormatError::Empty);
    }

    let fields: Vec<&str> = match kind {
        TaskKind::Todo => vec![args],
        TaskKind::Deadline => {
            let fields: Vec<&str> = args.split(BY).collect();
            if fields.len() != 2 || any_blank(&fields) {
                return Err(TaskFormatError::MissingDeadlineToken);
            }
            fields
        }
        TaskKind::Event => split_event(args).ok_or(TaskFormatError::MissingEventToken)?,
    };

    Ok(fields.iter().map(|field| field.trim().to_string()).collect())
}

/// `/from` has to come before `/to`, and each appears exactly once.
fn split_event(args: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = args.split(FROM).collect();
    if parts.len() != 2 || parts[0].contains(TO) {
        return None;
    }
    let times: Vec<&str> = parts[1].split(TO).collect();
    if times.len() != 2 {
        return None;
    }
    let fields = vec![parts[0], times[0], times[1]];
    if any_blank(&fields) {
        return None;
    }
    Some(fields)
}

fn any_blank(fields: &[&str]) -> bool {
    fields.iter().any(|field| field.trim().is_empty())
}

/// Parse a date and time against the accepted patterns. The first
/// pattern that matches wins.
pub fn parse_date_time(text: &str) -> Result<NaiveDateTime, TaskFormatError> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or(TaskFormatError::DateTimeInvalid)
}

/// Parse the fields produced by [`parse_task_description`] into the
/// description and the dates of a task.
pub fn parse_task_fields(
    kind: TaskKind,
    fields: &[String],
) -> Result<(String, When), TaskFormatError> {
    let when = match (kind, fields) {
        (TaskKind::Todo, [_]) => When::Anytime,
        (TaskKind::Deadline, [_, by]) => When::By(parse_date_time(by)?),
        (TaskKind::Event, [_, from, to]) => {
            let start = parse_date_time(from)?;
            let end = parse_date_time(to)?;
            if start > end {
                return Err(TaskFormatError::DateTimeInvalid);
            }
            When::Between(start, end)
        }
        (TaskKind::Todo, _) => return Err(TaskFormatError::Empty),
        (TaskKind::Deadline, _) => return Err(TaskFormatError::MissingDeadlineToken),
        (TaskKind::Event, _) => return Err(TaskFormatError::MissingEventToken),
    };
    Ok((fields[0].clone(), when))
}

/// Parse the 1-based task index given to mark, unmark and delete. Range
/// checks against the list happen in the list itself.
pub fn parse_task_index(text: &str) -> Result<i64, TaskListIndexError> {
    match text.trim().parse::<i64>() {
        Ok(index) => Ok(index),
        // a number, just too far out to ever be in range
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(TaskListIndexError::IndexOutOfBounds)
        }
        Err(_) => Err(TaskListIndexError::InvalidIndex),
    }
}
