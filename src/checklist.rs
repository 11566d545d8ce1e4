//! Onboarding Checklist
//!
//! Five fixed tasks tracked locally under the `todo_tasks` key. Only the
//! `done` flags come from storage; the task set, labels and order are fixed,
//! so a stale or hand-edited file cannot add, drop or reorder tasks.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::storage::{read_json, write_json, ClientStorage, StorageResult, CHECKLIST_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTask {
    pub id: String,
    pub label: String,
    pub required: bool,
    pub done: bool,
}

/// Only the id and flag matter when reading back a stored list
#[derive(Debug, Deserialize)]
struct StoredTask {
    id: String,
    #[serde(default)]
    done: bool,
}

const DEFAULT_TASKS: [(&str, &str, bool); 5] = [
    ("signup", "Create your account", true),
    (
        "profile",
        "Complete your profile (set diabetes type, height, weight)",
        false,
    ),
    ("reading", "Log your first glucose reading", false),
    ("medication", "Add a medication and mark one as taken", false),
    ("bmi", "View your BMI on the dashboard", false),
];

fn default_tasks() -> Vec<ChecklistTask> {
    DEFAULT_TASKS
        .iter()
        .map(|(id, label, required)| ChecklistTask {
            id: id.to_string(),
            label: label.to_string(),
            required: *required,
            done: false,
        })
        .collect()
}

pub struct ChecklistTracker {
    storage: Arc<dyn ClientStorage>,
    tasks: Vec<ChecklistTask>,
}

impl ChecklistTracker {
    /// Load the checklist, merging any stored `done` flags by task id
    pub fn load(storage: Arc<dyn ClientStorage>) -> Self {
        let mut tasks = default_tasks();

        match read_json::<Vec<StoredTask>>(storage.as_ref(), CHECKLIST_KEY) {
            Ok(Some(stored)) => {
                for entry in stored {
                    if let Some(task) = tasks.iter_mut().find(|t| t.id == entry.id) {
                        task.done = entry.done;
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable checklist, starting fresh");
            }
        }

        Self { storage, tasks }
    }

    pub fn tasks(&self) -> &[ChecklistTask] {
        &self.tasks
    }

    /// Flip one task and persist the list. Returns `false` for an unknown id.
    ///
    /// A failed write leaves the flag as it was.
    pub fn toggle(&mut self, id: &str) -> StorageResult<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(id, "Unknown checklist task");
            return Ok(false);
        };

        task.done = !task.done;
        let done = task.done;

        if let Err(e) = self.persist() {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                task.done = !done;
            }
            return Err(e);
        }
        tracing::debug!(id, done, "Checklist task toggled");
        Ok(true)
    }

    /// Mark every task as not done and persist
    ///
    /// On a storage error the previous flags are kept.
    pub fn reset(&mut self) -> StorageResult<()> {
        let previous = self.tasks.clone();
        for task in &mut self.tasks {
            task.done = false;
        }
        if let Err(e) = self.persist() {
            self.tasks = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn completed(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    fn persist(&self) -> StorageResult<()> {
        write_json(self.storage.as_ref(), CHECKLIST_KEY, &self.tasks)
    }
}
