use prettytable::Table;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::Task;
use crate::parser::{parse_input, Command, StatusChange};
use crate::storage::{LoadReport, Storage};
use crate::tasks::TaskList;

/// Descriptions wider than this wrap inside the list table.
const DESCRIPTION_WIDTH: usize = 40;

/// What the session answers to one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: String,
    /// The user asked to leave.
    pub exit: bool,
}

impl Reply {
    fn say<S: Into<String>>(message: S) -> Reply {
        Reply {
            message: message.into(),
            exit: false,
        }
    }
}

/// One conversation: the task list, and the file it is saved to unless
/// the session runs in memory only.
#[derive(Debug)]
pub struct Session {
    tasks: TaskList,
    storage: Option<Storage>,
}

impl Session {
    pub fn new(tasks: TaskList, storage: Option<Storage>) -> Session {
        Session { tasks, storage }
    }

    /// A session without a task file. Nothing is saved.
    pub fn in_memory() -> Session {
        Session::new(TaskList::new(), None)
    }

    /// Load the task file and start a session on it. If the file cannot be
    /// used the session still starts, in memory only. The returned lines
    /// tell the user how loading went.
    pub fn open(storage: Storage) -> (Session, Vec<String>) {
        match storage.load() {
            Ok((tasks, report)) => {
                let notices = load_notices(&report);
                // saving now would overwrite the bad file that could not be moved aside
                let storage = if report.quarantine_error.is_some() {
                    None
                } else {
                    Some(storage)
                };
                (Session::new(tasks, storage), notices)
            }
            Err(e) => {
                warn!(error = %e, "task file unavailable, running in memory only");
                let notices = vec![
                    e.to_string(),
                    "Your tasks will not be saved during this session.".to_string(),
                ];
                (Session::in_memory(), notices)
            }
        }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Run one line of input. Errors become the reply; they never end
    /// the session. Changes are saved right away.
    pub fn handle(&mut self, input: &str) -> Reply {
        let (command, args) = match parse_input(input) {
            Ok(parsed) => parsed,
            Err(e) => return Reply::say(e.to_string()),
        };

        let mut reply = match self.execute(command, &args) {
            Ok(reply) => reply,
            Err(e) => {
                debug!(error = %e, "command failed");
                return Reply::say(e.to_string());
            }
        };

        if command.is_mutating() {
            if let Err(e) = self.save() {
                warn!(error = %e, "could not save tasks");
                reply.message.push_str(&format!("\n{} Your change is kept until you exit.", e));
            }
        }
        reply
    }

    fn execute(&mut self, command: Command, args: &str) -> Result<Reply> {
        let reply = match command {
            Command::Bye => Reply {
                message: "Bye. Hope to see you again soon!".to_string(),
                exit: true,
            },
            Command::List => Reply::say(render_list(&self.tasks)),
            Command::AddTask(kind) => {
                let task = self.tasks.add_task(kind, args)?.to_string();
                Reply::say(format!(
                    "Got it. I've added this task:\n  {}\n{}",
                    task,
                    count_line(self.tasks.size())
                ))
            }
            Command::ChangeStatus(change) => {
                let task = self.tasks.change_task_status(change, args)?;
                Reply::say(status_message(change, &task, self.tasks.size()))
            }
            Command::Find => Reply::say(render_matches(&self.tasks.find_tasks(args))),
        };
        Ok(reply)
    }

    fn save(&self) -> Result<()> {
        if let Some(storage) = &self.storage {
            storage.save(&self.tasks)?;
        }
        Ok(())
    }
}

/// Lines shown after the task file was loaded.
pub fn load_notices(report: &LoadReport) -> Vec<String> {
    let mut notices = vec![format!(
        "Successfully loaded {} of {} tasks.",
        report.loaded, report.attempted
    )];
    if let Some(path) = &report.quarantined {
        notices.push(format!(
            "Some saved tasks were corrupted. The original file was moved to {}",
            path.display()
        ));
        notices.push("The tasks that could be read are saved under the usual name.".to_string());
    }
    if let Some(e) = &report.quarantine_error {
        notices.push(format!("Some saved tasks were corrupted. {}", e));
        notices.push("Your tasks will not be saved during this session.".to_string());
    }
    notices
}

fn count_line(size: usize) -> String {
    if size == 1 {
        "Now you have 1 task in the list.".to_string()
    } else {
        format!("Now you have {} tasks in the list.", size)
    }
}

fn status_message(change: StatusChange, task: &Task, size: usize) -> String {
    match change {
        StatusChange::Mark => format!("Nice! I've marked this task as done:\n  {}", task),
        StatusChange::Unmark => format!("OK, I've marked this task as not done yet:\n  {}", task),
        StatusChange::Delete => format!(
            "Noted. I've removed this task:\n  {}\n{}",
            task,
            count_line(size)
        ),
    }
}

/// The whole list as a table, one row per task.
pub fn render_list(tasks: &TaskList) -> String {
    if tasks.is_empty() {
        return "No tasks found!".to_string();
    }

    let mut table = Table::new();
    table.set_titles(row!["#", "type", "done", "task", "when"]);
    for (i, task) in tasks.iter().enumerate() {
        table.add_row(row![
            i + 1,
            task.kind().tag(),
            task.status_mark(),
            textwrap::fill(task.description(), DESCRIPTION_WIDTH),
            task.fmt_when()
        ]);
    }
    format!("Here are the tasks in your list:\n{}", table)
}

fn render_matches(matches: &[(usize, &Task)]) -> String {
    if matches.is_empty() {
        return "No matching tasks found.".to_string();
    }

    let mut message = String::from("Here are the matching tasks in your list:");
    for (index, task) in matches {
        message.push_str(&format!("\n{}. {}", index, task));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn add_then_list() {
        let mut session = Session::in_memory();
        let reply = session.handle("todo buy milk");
        assert_eq!(
            reply.message,
            "Got it. I've added this task:\n  [T][ ] buy milk\nNow you have 1 task in the list."
        );
        assert!(!reply.exit);

        let listed = session.handle("list").message;
        assert!(listed.starts_with("Here are the tasks in your list:"));
        assert!(listed.contains("buy milk"));
    }

    #[test]
    fn empty_list() {
        let mut session = Session::in_memory();
        assert_eq!(session.handle("LIST").message, "No tasks found!");
    }

    #[test]
    fn errors_are_replies() {
        let mut session = Session::in_memory();
        assert_eq!(session.handle("todo").message, "Task description is empty!");
        assert_eq!(session.handle("mark 1").message, "Index out of bounds!");
        assert_eq!(
            session.handle("dance").message,
            "I'm sorry, but I don't know what 'dance' means."
        );
        assert!(session.tasks().is_empty());
    }

    #[test]
    fn mark_and_delete_messages() {
        let mut session = Session::in_memory();
        session.handle("todo a");
        session.handle("todo b");
        assert_eq!(
            session.handle("mark 2").message,
            "Nice! I've marked this task as done:\n  [T][X] b"
        );
        assert_eq!(
            session.handle("unmark 2").message,
            "OK, I've marked this task as not done yet:\n  [T][ ] b"
        );
        assert_eq!(
            session.handle("delete 1").message,
            "Noted. I've removed this task:\n  [T][ ] a\nNow you have 1 task in the list."
        );
    }

    #[test]
    fn find_lists_matches_with_index() {
        let mut session = Session::in_memory();
        session.handle("todo buy milk");
        session.handle("todo clean house");
        session.handle("todo buy eggs");
        assert_eq!(
            session.handle("find buy").message,
            "Here are the matching tasks in your list:\n1. [T][ ] buy milk\n3. [T][ ] buy eggs"
        );
        assert_eq!(session.handle("find dog").message, "No matching tasks found.");
    }

    #[test]
    fn bye_ends_the_session() {
        let mut session = Session::in_memory();
        let reply = session.handle("bye");
        assert!(reply.exit);
        assert_eq!(reply.message, "Bye. Hope to see you again soon!");
    }

    #[test]
    fn long_descriptions_wrap_in_the_table() {
        let mut session = Session::in_memory();
        let long = "word ".repeat(20);
        session.handle(&format!("todo {}", long));
        let listed = session.handle("list").message;
        assert!(listed.lines().filter(|line| line.contains("word")).count() > 1);
    }

    #[test]
    fn notices_mention_quarantine() {
        let clean = LoadReport {
            attempted: 3,
            loaded: 3,
            quarantined: None,
            quarantine_error: None,
        };
        assert_eq!(load_notices(&clean), vec!["Successfully loaded 3 of 3 tasks."]);

        let corrupted = LoadReport {
            attempted: 5,
            loaded: 3,
            quarantined: Some(PathBuf::from("data/tasks.txt.corrupted")),
            quarantine_error: None,
        };
        let notices = load_notices(&corrupted);
        assert_eq!(notices[0], "Successfully loaded 3 of 5 tasks.");
        assert!(notices[1].contains("data/tasks.txt.corrupted"));
    }
}
