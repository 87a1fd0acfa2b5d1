use tracing::debug;

use crate::error::{TaskFormatError, TaskListIndexError};
use crate::model::{Task, TaskKind};
use crate::parser::{parse_task_description, parse_task_fields, parse_task_index, StatusChange};

/// The ordered list of tasks of a session. Index `i` (1-based) is always the
/// `i`-th task currently in the list, so deleting shifts later tasks down.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> TaskList {
        TaskList { tasks: Vec::new() }
    }

    pub fn size(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterate the tasks in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Task at a 1-based position, if there is one.
    pub fn get(&self, index: usize) -> Option<&Task> {
        index.checked_sub(1).and_then(|i| self.tasks.get(i))
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Task> {
        self.tasks.last_mut()
    }

    /// Parse `args` for the given kind of task and append the result.
    /// Nothing is added when the arguments are invalid or when the same
    /// task is already in the list.
    pub fn add_task(&mut self, kind: TaskKind, args: &str) -> Result<&Task, TaskFormatError> {
        let fields = parse_task_description(kind, args)?;
        let (description, when) = parse_task_fields(kind, &fields)?;
        let task = Task::new(&description, when)?;

        if self.tasks.iter().any(|existing| existing.same_work_as(&task)) {
            return Err(TaskFormatError::DuplicateTask);
        }

        debug!(%task, "adding task");
        self.tasks.push(task);
        let last = self.tasks.len() - 1;
        Ok(&self.tasks[last])
    }

    /// Mark, unmark or delete the task at the 1-based index written in
    /// `index_text`. The affected task is returned, also when it was
    /// removed from the list.
    pub fn change_task_status(
        &mut self,
        change: StatusChange,
        index_text: &str,
    ) -> Result<Task, TaskListIndexError> {
        let index = parse_task_index(index_text)?;
        if index < 1 || index > self.tasks.len() as i64 {
            return Err(TaskListIndexError::IndexOutOfBounds);
        }
        let position = (index - 1) as usize;

        debug!(?change, index, "changing task status");
        let task = match change {
            StatusChange::Mark => {
                self.tasks[position].set_done(true);
                self.tasks[position].clone()
            }
            StatusChange::Unmark => {
                self.tasks[position].set_done(false);
                self.tasks[position].clone()
            }
            StatusChange::Delete => self.tasks.remove(position),
        };
        Ok(task)
    }

    /// Tasks whose description contains `keyword`, case-sensitive, with
    /// their current 1-based index, in list order.
    pub fn find_tasks(&self, keyword: &str) -> Vec<(usize, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.description().contains(keyword))
            .map(|(i, task)| (i + 1, task))
            .collect()
    }

    /// One file line per task, each ending with a line break.
    pub fn serialize(&self) -> String {
        self.tasks
            .iter()
            .map(|task| task.to_file_line() + "\n")
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::When;

    fn list_of(todos: &[&str]) -> TaskList {
        let mut list = TaskList::new();
        for todo in todos {
            list.add_task(TaskKind::Todo, todo).unwrap();
        }
        list
    }

    #[test]
    fn add_returns_the_new_task() {
        let mut list = TaskList::new();
        let task = list.add_task(TaskKind::Deadline, "submit report /by 2024-01-31 2359").unwrap();
        assert_eq!(task.kind(), TaskKind::Deadline);
        assert_eq!(task.description(), "submit report");
        assert!(!task.is_done());
        assert_eq!(list.size(), 1);
    }

    #[test]
    fn failed_add_leaves_the_list_alone() {
        let mut list = list_of(&["buy milk"]);
        let before = list.clone();

        assert_eq!(list.add_task(TaskKind::Todo, ""), Err(TaskFormatError::Empty));
        assert_eq!(
            list.add_task(TaskKind::Deadline, "submit report"),
            Err(TaskFormatError::MissingDeadlineToken)
        );
        assert_eq!(
            list.add_task(TaskKind::Event, "x /from 2024-02-01 1000 /to 2024-02-01 0900"),
            Err(TaskFormatError::DateTimeInvalid)
        );
        assert_eq!(
            list.add_task(TaskKind::Deadline, "x /by someday"),
            Err(TaskFormatError::DateTimeInvalid)
        );
        assert_eq!(list, before);
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut list = list_of(&["buy milk"]);
        list.change_task_status(StatusChange::Mark, "1").unwrap();
        assert_eq!(list.add_task(TaskKind::Todo, "buy milk"), Err(TaskFormatError::DuplicateTask));

        // same text, different kind or dates, is different work
        list.add_task(TaskKind::Deadline, "buy milk /by 2024-01-31 2359").unwrap();
        list.add_task(TaskKind::Deadline, "buy milk /by 2024-02-01 2359").unwrap();
        assert_eq!(
            list.add_task(TaskKind::Deadline, "buy milk /by 31-01-2024 2359"),
            Err(TaskFormatError::DuplicateTask)
        );
        assert_eq!(list.size(), 3);
    }

    #[test]
    fn mark_and_unmark_are_idempotent() {
        let mut list = list_of(&["a", "b"]);
        assert!(list.change_task_status(StatusChange::Mark, "1").unwrap().is_done());
        assert!(list.change_task_status(StatusChange::Mark, "1").unwrap().is_done());
        assert!(!list.change_task_status(StatusChange::Unmark, "2").unwrap().is_done());
        assert!(!list.change_task_status(StatusChange::Unmark, "1").unwrap().is_done());
        assert_eq!(list.size(), 2);
    }

    #[test]
    fn delete_shifts_later_tasks_down() {
        let mut list = list_of(&["a", "b", "c", "d"]);
        let removed = list.change_task_status(StatusChange::Delete, "2").unwrap();
        assert_eq!(removed.description(), "b");
        assert_eq!(list.size(), 3);
        assert_eq!(list.get(1).unwrap().description(), "a");
        assert_eq!(list.get(2).unwrap().description(), "c");
        assert_eq!(list.get(3).unwrap().description(), "d");
        assert!(list.get(4).is_none());
        assert!(list.get(0).is_none());
    }

    #[test]
    fn index_bounds() {
        let mut list = list_of(&["a", "b"]);
        for change in &[StatusChange::Mark, StatusChange::Unmark, StatusChange::Delete] {
            for index in &["0", "-1", "3", "42"] {
                assert_eq!(
                    list.change_task_status(*change, index),
                    Err(TaskListIndexError::IndexOutOfBounds),
                    "{}",
                    index
                );
            }
            for index in &["one", "", "#1"] {
                assert_eq!(
                    list.change_task_status(*change, index),
                    Err(TaskListIndexError::InvalidIndex),
                    "{}",
                    index
                );
            }
        }
        assert_eq!(list.size(), 2);
    }

    #[test]
    fn find_returns_current_indices_in_order() {
        let list = list_of(&["buy milk", "buy eggs", "clean house"]);
        let found: Vec<(usize, &str)> = list
            .find_tasks("buy")
            .into_iter()
            .map(|(i, task)| (i, task.description()))
            .collect();
        assert_eq!(found, vec![(1, "buy milk"), (2, "buy eggs")]);

        assert!(list.find_tasks("Buy").is_empty());
        assert_eq!(list.find_tasks("").len(), 3);
    }

    #[test]
    fn find_after_delete_uses_new_indices() {
        let mut list = list_of(&["buy milk", "clean house", "buy eggs"]);
        list.change_task_status(StatusChange::Delete, "1").unwrap();
        let found = list.find_tasks("buy");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 2);
    }

    #[test]
    fn serialize_writes_one_line_per_task() {
        let mut list = list_of(&["buy milk"]);
        list.add_task(TaskKind::Deadline, "submit report /by 2024-01-31 2359").unwrap();
        list.change_task_status(StatusChange::Mark, "2").unwrap();
        list.add_task(TaskKind::Event, "team sync /from 2024-02-01 0900 /to 2024-02-01 1000")
            .unwrap();

        assert_eq!(
            list.serialize(),
            "[T][ ] buy milk\n\
             [D][X] submit report /by 2024-01-31 2359\n\
             [E][ ] team sync /from 2024-02-01 0900 /to 2024-02-01 1000\n"
        );
        assert!(matches!(list.get(3).unwrap().when(), When::Between(_, _)));
    }
}
