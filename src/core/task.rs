use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::Recurrence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted task template, the unit of storage and identity.
///
/// For a one-off task `due_at` is the due moment and `is_completed` is
/// authoritative. For a daily task `due_at` is the recurrence anchor (its
/// date part marks the first occurrence, its time part is the canonical
/// time-of-day) and completion lives in `completed_occurrences`, keyed by
/// occurrence date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_at: NaiveDateTime,
    pub priority: Priority,
    pub is_completed: bool,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub completed_occurrences: BTreeMap<NaiveDate, bool>,
    #[serde(default)]
    pub is_archived: bool,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_timeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Input for creating a new template.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_at: NaiveDateTime,
    pub priority: Priority,
    pub recurrence: Recurrence,
}

impl Task {
    pub fn new(draft: TaskDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            due_at: draft.due_at,
            priority: draft.priority,
            is_completed: false,
            recurrence: draft.recurrence,
            completed_occurrences: BTreeMap::new(),
            is_archived: false,
            created_at: chrono::Local::now().naive_local(),
            suggested_timeline: None,
            estimated_duration: None,
            reasoning: None,
        }
    }

    /// Apply an edit, field by field. `id`, `created_at`, and the
    /// occurrence map survive unless the patch names them.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_at) = patch.due_at {
            self.due_at = due_at;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(recurrence) = patch.recurrence {
            self.recurrence = recurrence;
        }
        if let Some(occurrences) = patch.completed_occurrences {
            self.completed_occurrences = occurrences;
        }
    }
}

/// An explicit update record: every field optional, applied by
/// [`Task::apply`].
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<NaiveDateTime>,
    pub priority: Option<Priority>,
    pub recurrence: Option<Recurrence>,
    pub completed_occurrences: Option<BTreeMap<NaiveDate, bool>>,
}
