//! A conversational task list.
//!
//! Lines of input such as `todo buy milk` or `mark 2` are parsed into a
//! [`Command`](parser::Command) and applied to a [`TaskList`]. A
//! [`Storage`] keeps the list in a plain text file and recovers what it can
//! when that file has been damaged.

#[macro_use]
extern crate prettytable;

pub mod cli;
pub mod error;
pub mod interface;
pub mod model;
pub mod parser;
pub mod storage;
pub mod tasks;

pub use error::{Error, Result};
pub use interface::{Reply, Session};
pub use model::{Task, TaskKind, When};
pub use storage::{LoadReport, Storage};
pub use tasks::TaskList;
