use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::task::{Priority, Task};

/// A materialized occurrence of a daily template for one calendar date.
///
/// Built on every query and discarded after use; deliberately not
/// serializable so instances can never end up in storage.
#[derive(Debug, Clone)]
pub struct TaskInstance {
    /// The template this instance was expanded from.
    pub template: Task,
    /// The calendar date this instance represents.
    pub date: NaiveDate,
    /// The instance date combined with the template's time-of-day.
    pub due_at: NaiveDateTime,
    /// Completion state from the template's occurrence map for `date`.
    pub completed: bool,
}

impl TaskInstance {
    pub fn template_id(&self) -> Uuid {
        self.template.id
    }
}

/// One entry in a per-date view: either a one-off task on its due day, or
/// an expanded instance of a daily template.
#[derive(Debug, Clone)]
pub enum DayEntry {
    Single(Task),
    Instance(TaskInstance),
}

impl DayEntry {
    /// Id of the backing template. Completion toggles and suggestion
    /// requests must be addressed to this id.
    pub fn template_id(&self) -> Uuid {
        match self {
            Self::Single(task) => task.id,
            Self::Instance(instance) => instance.template_id(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Single(task) => &task.title,
            Self::Instance(instance) => &instance.template.title,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Self::Single(task) => task.priority,
            Self::Instance(instance) => instance.template.priority,
        }
    }

    pub fn due_at(&self) -> NaiveDateTime {
        match self {
            Self::Single(task) => task.due_at,
            Self::Instance(instance) => instance.due_at,
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            Self::Single(task) => task.is_completed,
            Self::Instance(instance) => instance.completed,
        }
    }

    pub fn is_recurring_instance(&self) -> bool {
        matches!(self, Self::Instance(_))
    }
}
