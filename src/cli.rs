use directories::ProjectDirs;
use std::path::PathBuf;
use structopt::StructOpt;

use crate::storage::{Storage, DEFAULT_FILE_NAME};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "taskchat",
    about = "Keep a list of todos, deadlines and events by chatting with it."
)]
pub struct CommandLineArgs {
    /// Use a different task file.
    #[structopt(parse(from_os_str), short = "f", long, env = "TASKCHAT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Keep the task file in the user data directory instead of ./data.
    #[structopt(short, long)]
    pub user_data: bool,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

impl CommandLineArgs {
    /// The task file to use: an explicit file first, then the user data
    /// directory if asked for, then `data/tasks.txt`.
    pub fn task_file(&self) -> PathBuf {
        if let Some(path) = &self.data_file {
            return path.clone();
        }
        if self.user_data {
            if let Some(path) = user_data_file() {
                return path;
            }
        }
        Storage::default_path()
    }

    /// Log filter used when RUST_LOG is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn user_data_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "taskchat", "taskchat")
        .map(|dirs| dirs.data_dir().join(DEFAULT_FILE_NAME))
}
