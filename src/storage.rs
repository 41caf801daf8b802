use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::task::Task;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad task data: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Persistence seam for task templates: whole-collection load and save.
///
/// The planner treats a load failure as "no tasks yet" and logs save
/// failures without surfacing them; in-memory state stays authoritative
/// for the session either way.
pub trait TaskStore {
    fn load_all(&self) -> Result<Vec<Task>, StoreError>;
    fn save_all(&mut self, tasks: &[Task]) -> Result<(), StoreError>;
}

/// Stores the full template collection as one pretty-printed JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save_all(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(tasks)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Keeps everything in memory. Used by tests and anywhere persistence is
/// not wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub tasks: Vec<Task>,
}

impl TaskStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.clone())
    }

    fn save_all(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        self.tasks = tasks.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recurrence::Recurrence;
    use crate::core::task::{Priority, Task, TaskDraft};
    use chrono::NaiveDate;

    fn sample_task() -> Task {
        Task::new(TaskDraft {
            title: "Stretch".into(),
            description: "Morning routine".into(),
            due_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(7, 30, 0)
                .unwrap(),
            priority: Priority::Low,
            recurrence: Recurrence::Daily,
        })
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("tasks.json"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn saves_and_reloads_templates() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("tasks.json"));

        let mut task = sample_task();
        task.completed_occurrences
            .insert(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), true);
        store.save_all(std::slice::from_ref(&task)).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, task.id);
        assert_eq!(loaded[0].recurrence, Recurrence::Daily);
        assert_eq!(
            loaded[0]
                .completed_occurrences
                .get(&NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            Some(&true)
        );
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested/deeper/tasks.json"));
        store.save_all(&[sample_task()]).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }
}
