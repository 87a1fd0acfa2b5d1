//! The task file: one task per line, rewritten whole after every change.
//!
//! Loading replays each line through the same parser as typed input. Lines
//! that do not parse are skipped; if any were skipped the original file is
//! moved aside with a `.corrupted` suffix and a clean file takes its place.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{StorageError, TaskFormatError};
use crate::model::decode_file_line;
use crate::tasks::TaskList;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_FILE_NAME: &str = "tasks.txt";
pub const CORRUPTED_SUFFIX: &str = ".corrupted";

/// What a load found in the task file.
#[derive(Debug)]
pub struct LoadReport {
    /// Non blank lines read from the file.
    pub attempted: usize,
    /// Lines that became a task.
    pub loaded: usize,
    /// Where the original file went, if some lines were bad.
    pub quarantined: Option<PathBuf>,
    /// Why the bad file could not be moved aside or rewritten. The tasks
    /// that loaded are still returned.
    pub quarantine_error: Option<StorageError>,
}

impl LoadReport {
    pub fn is_corrupted(&self) -> bool {
        self.loaded < self.attempted
    }
}

/// Owner of the task file of a session.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Storage {
        Storage { path: path.into() }
    }

    /// `data/tasks.txt`, relative to the working directory.
    pub fn default_path() -> PathBuf {
        Path::new(DEFAULT_DATA_DIR).join(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The primary path with `.corrupted` appended to the file name.
    pub fn corrupted_path(&self) -> PathBuf {
        let mut name: OsString = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(DEFAULT_FILE_NAME));
        name.push(CORRUPTED_SUFFIX);
        self.path.with_file_name(name)
    }

    /// Create the data directory and an empty task file if they are
    /// missing. Returns whether a file was already there.
    pub fn ensure_file(&self) -> Result<bool, StorageError> {
        if self.path.is_file() {
            return Ok(true);
        }

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        info!(path = ?self.path, "no saved tasks, creating a new task file");
        fs::write(&self.path, "").map_err(|source| StorageError::CreateFile {
            path: self.path.clone(),
            source,
        })?;
        Ok(false)
    }

    /// Read the task file into a new list. A missing file is an empty list.
    /// Bad lines are skipped, and if there were any the file is quarantined
    /// and rewritten with the tasks that did load.
    pub fn load(&self) -> Result<(TaskList, LoadReport), StorageError> {
        self.ensure_file()?;

        let content = fs::read(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;

        let mut tasks = TaskList::new();
        let mut attempted = 0;
        for (number, raw) in content.split(|byte| *byte == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = match std::str::from_utf8(raw) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => line,
                Err(e) => {
                    attempted += 1;
                    warn!(line = number + 1, error = %e, "skipping task line that is not UTF-8");
                    continue;
                }
            };
            attempted += 1;
            if let Err(e) = replay_line(&mut tasks, line) {
                warn!(
                    line = number + 1,
                    error = %e,
                    content = line,
                    "skipping corrupted task line"
                );
            }
        }

        let mut report = LoadReport {
            attempted,
            loaded: tasks.size(),
            quarantined: None,
            quarantine_error: None,
        };
        info!(
            attempted = report.attempted,
            loaded = report.loaded,
            path = ?self.path,
            "loaded tasks"
        );

        if report.is_corrupted() {
            match self.quarantine(&tasks) {
                Ok(corrupted) => report.quarantined = Some(corrupted),
                Err(e) => {
                    warn!(error = %e, "could not quarantine corrupted task file");
                    report.quarantine_error = Some(e);
                }
            }
        }
        Ok((tasks, report))
    }

    /// Move the current file to the corrupted path, then write `tasks` as
    /// the new primary file.
    fn quarantine(&self, tasks: &TaskList) -> Result<PathBuf, StorageError> {
        let corrupted = self.corrupted_path();
        // replaces an older quarantine file, if any
        fs::rename(&self.path, &corrupted).map_err(|source| StorageError::Quarantine {
            path: self.path.clone(),
            source,
        })?;
        warn!(from = ?self.path, to = ?corrupted, "task file had corrupted lines, moved it aside");

        self.save(tasks)?;
        Ok(corrupted)
    }

    /// Replace the whole file with the serialized list.
    ///
    /// This is a single write into the primary file, not a write to a
    /// temporary file followed by a rename, so a crash halfway through a
    /// save can leave a truncated file. The next load then quarantines it.
    pub fn save(&self, tasks: &TaskList) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(&self.path, tasks.serialize()).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(tasks = tasks.size(), path = ?self.path, "saved tasks");
        Ok(())
    }
}

/// Rebuild one task from a file line through the regular add path.
fn replay_line(tasks: &mut TaskList, line: &str) -> Result<(), TaskFormatError> {
    let record = decode_file_line(line)?;
    tasks.add_task(record.kind, record.args)?;
    if let Some(task) = tasks.last_mut() {
        task.set_done(record.done);
    }
    Ok(())
}
