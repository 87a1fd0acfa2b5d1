use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The argument string of an adding command is not a valid task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskFormatError {
    #[error("Task description is empty!")]
    Empty,
    #[error("Deadline format invalid! Format: deadline <description> /by <date time>")]
    MissingDeadlineToken,
    #[error(
        "Event format invalid! \
         Format: event <description> /from <start date time> /to <end date time>"
    )]
    MissingEventToken,
    #[error("Date and time format invalid!")]
    DateTimeInvalid,
    #[error("Unknown task type!")]
    UnknownTaskType,
    #[error("This task is already in your list!")]
    DuplicateTask,
}

/// The index argument of mark, unmark or delete does not name a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskListIndexError {
    #[error("Invalid index! Please give the task number shown by 'list'.")]
    InvalidIndex,
    #[error("Index out of bounds!")]
    IndexOutOfBounds,
}

/// The first word of the input is not a known command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("I'm sorry, but I don't know what '{0}' means.")]
pub struct UnknownCommand(pub String);

/// Failures touching the task file. None of them is fatal to a session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create data directory {path:?}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("Failed to create task file {path:?}: {source}")]
    CreateFile { path: PathBuf, source: io::Error },
    #[error("Failed to read task file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to save task file {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to move corrupted task file {path:?} aside: {source}")]
    Quarantine { path: PathBuf, source: io::Error },
}

/// Any failure a single command can end with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommand),
    #[error(transparent)]
    TaskFormat(#[from] TaskFormatError),
    #[error(transparent)]
    TaskListIndex(#[from] TaskListIndexError),
    #[error(transparent)]
    File(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, Error>;
