use chrono::NaiveDateTime;
use std::fmt;

use crate::error::TaskFormatError;

/// Format used for dates in the task file. It is also accepted as input.
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d %H%M";

/// Format used to show dates to the user. It is also accepted as input.
pub const DISPLAY_DATE_FORMAT: &str = "%b %d %Y %I:%M %p";

/// The three kinds of task a list can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline,
    Event,
}

impl TaskKind {
    /// One letter tag used both on screen and in the task file.
    pub fn tag(self) -> char {
        match self {
            TaskKind::Todo => 'T',
            TaskKind::Deadline => 'D',
            TaskKind::Event => 'E',
        }
    }

    pub fn from_tag(tag: char) -> Option<TaskKind> {
        match tag {
            'T' => Some(TaskKind::Todo),
            'D' => Some(TaskKind::Deadline),
            'E' => Some(TaskKind::Event),
            _ => None,
        }
    }
}

/// When a task happens. The variant decides the kind of the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum When {
    Anytime,
    By(NaiveDateTime),
    Between(NaiveDateTime, NaiveDateTime),
}

/// A single task of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    done: bool,
    when: When,
}

impl Task {
    /// Build a pending task. The description must not be blank and an
    /// event must not end before it starts.
    pub fn new(description: &str, when: When) -> Result<Task, TaskFormatError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskFormatError::Empty);
        }
        if let When::Between(start, end) = when {
            if start > end {
                return Err(TaskFormatError::DateTimeInvalid);
            }
        }
        Ok(Task {
            description: description.to_string(),
            done: false,
            when,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn when(&self) -> &When {
        &self.when
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    pub fn kind(&self) -> TaskKind {
        match self.when {
            When::Anytime => TaskKind::Todo,
            When::By(_) => TaskKind::Deadline,
            When::Between(_, _) => TaskKind::Event,
        }
    }

    /// Two tasks are the same work when kind, description and dates
    /// match. The done flag is not part of it.
    pub fn same_work_as(&self, other: &Task) -> bool {
        self.description == other.description && self.when == other.when
    }

    pub fn status_mark(&self) -> char {
        if self.done {
            'X'
        } else {
            ' '
        }
    }

    /// The dates of the task, as shown to the user. Empty for a todo.
    pub fn fmt_when(&self) -> String {
        match self.when {
            When::Anytime => String::new(),
            When::By(by) => format!("by: {}", by.format(DISPLAY_DATE_FORMAT)),
            When::Between(start, end) => format!(
                "from: {} to: {}",
                start.format(DISPLAY_DATE_FORMAT),
                end.format(DISPLAY_DATE_FORMAT)
            ),
        }
    }

    /// Encode the task as one line of the task file, without line break.
    pub fn to_file_line(&self) -> String {
        let mut line = format!(
            "[{}][{}] {}",
            self.kind().tag(),
            self.status_mark(),
            self.description
        );
        match self.when {
            When::Anytime => {}
            When::By(by) => {
                line.push_str(&format!(" /by {}", by.format(FILE_DATE_FORMAT)));
            }
            When::Between(start, end) => {
                line.push_str(&format!(
                    " /from {} /to {}",
                    start.format(FILE_DATE_FORMAT),
                    end.format(FILE_DATE_FORMAT)
                ));
            }
        }
        line
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}] {}", self.kind().tag(), self.status_mark(), self.description)?;
        if self.when != When::Anytime {
            write!(f, " ({})", self.fmt_when())?;
        }
        Ok(())
    }
}

/// A task file line split back into what is needed to replay it:
/// the kind, the argument string as typed by a user, and the done flag.
#[derive(Debug, PartialEq, Eq)]
pub struct FileLine<'a> {
    pub kind: TaskKind,
    pub args: &'a str,
    pub done: bool,
}

/// Split a task file line of the form `[T][X] description ...`. Only the
/// frame is checked here, the arguments go through the usual parser.
pub fn decode_file_line(line: &str) -> Result<FileLine<'_>, TaskFormatError> {
    let bytes = line.as_bytes();
    if bytes.len() < 7
        || bytes[0] != b'['
        || bytes[2] != b']'
        || bytes[3] != b'['
        || bytes[5] != b']'
        || bytes[6] != b' '
    {
        return Err(TaskFormatError::UnknownTaskType);
    }

    let kind = TaskKind::from_tag(bytes[1] as char).ok_or(TaskFormatError::UnknownTaskType)?;
    let done = match bytes[4] {
        b'X' => true,
        b' ' => false,
        _ => return Err(TaskFormatError::UnknownTaskType),
    };

    // the first seven bytes are ascii, so this is a char boundary
    Ok(FileLine {
        kind,
        args: line[7..].trim(),
        done,
    })
}
