use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::ai::{SuggestionRequest, TimelineSuggester};
use crate::storage::TaskStore;

use super::recurrence::{self, Recurrence};
use super::schedule::{DayEntry, TaskInstance};
use super::task::{Task, TaskDraft, TaskPatch};

/// Sentinel written to `suggested_timeline` when the suggestion service
/// fails — a user-visible degraded state rather than an error.
pub const SUGGESTION_ERROR_TIMELINE: &str = "Error fetching suggestion.";
pub const SUGGESTION_ERROR_REASONING: &str = "Could not connect to AI service.";

// Other active tasks sampled into the history string for a suggestion.
const HISTORY_SAMPLE: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("no task with id {0}")]
    TaskNotFound(Uuid),
}

/// Owns the template collection and the persistence handle.
///
/// Templates are kept in insertion order, most recent first. Every
/// mutation is followed by a fire-and-forget save; a failed save is
/// logged and the in-memory collection stays authoritative for the
/// session.
pub struct TaskPlanner {
    tasks: Vec<Task>,
    store: Box<dyn TaskStore>,
}

impl TaskPlanner {
    /// Build a planner from a store. A load failure is treated as "no
    /// tasks yet".
    pub fn load(store: Box<dyn TaskStore>) -> Self {
        let tasks = match store.load_all() {
            Ok(tasks) => tasks,
            Err(e) => {
                log::warn!("Failed to load tasks, starting empty: {}", e);
                Vec::new()
            }
        };
        Self { tasks, store }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save_all(&self.tasks) {
            log::error!("Failed to persist tasks: {}", e);
        }
    }

    /// Create a new template from the draft and return its id.
    pub fn add(&mut self, draft: TaskDraft) -> Uuid {
        let task = Task::new(draft);
        let id = task.id;
        self.tasks.insert(0, task);
        self.persist();
        id
    }

    /// Apply an edit to the template with `id`.
    pub fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<(), PlannerError> {
        let task = self.find_mut(id)?;
        task.apply(patch);
        self.persist();
        Ok(())
    }

    /// Flip completion state. For a daily template with an occurrence
    /// date this flips that date's entry in the occurrence map, so no
    /// other date's state is touched; otherwise it flips the template's
    /// own flag.
    pub fn toggle_completion(
        &mut self,
        id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<(), PlannerError> {
        let task = self.find_mut(id)?;
        match (task.recurrence, date) {
            (Recurrence::Daily, Some(date)) => {
                let done = task.completed_occurrences.entry(date).or_insert(false);
                *done = !*done;
            }
            _ => task.is_completed = !task.is_completed,
        }
        self.persist();
        Ok(())
    }

    /// Hide the template and all its instances from every read path. The
    /// occurrence map is kept; there is no unarchive.
    pub fn archive(&mut self, id: Uuid) -> Result<(), PlannerError> {
        let task = self.find_mut(id)?;
        task.is_archived = true;
        self.persist();
        Ok(())
    }

    /// The non-archived template with `id`, if any.
    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id && !t.is_archived)
    }

    /// All non-archived templates, most recent first.
    pub fn active_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.is_archived)
    }

    /// Every template including archived ones.
    pub fn all_tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Expand the collection into the entries due on `date`.
    ///
    /// A daily template yields one instance per query date from its
    /// anchor day onward, with the due moment recombined from the query
    /// date and the template's time-of-day. A one-off template appears
    /// only on its exact due day — with no recurrence to carry it
    /// forward, an overdue one-off never shows up on later dates.
    ///
    /// Entries come back unordered; callers sort by due time.
    pub fn tasks_for_date(&self, date: NaiveDate) -> Vec<DayEntry> {
        let mut entries = Vec::new();
        for task in &self.tasks {
            if task.is_archived {
                continue;
            }
            let anchor = task.due_at.date();
            if !task.recurrence.occurs_on(anchor, date) {
                continue;
            }
            match task.recurrence {
                Recurrence::Daily => {
                    let completed = task
                        .completed_occurrences
                        .get(&date)
                        .copied()
                        .unwrap_or(false);
                    entries.push(DayEntry::Instance(TaskInstance {
                        due_at: recurrence::instance_due_at(task.due_at, date),
                        date,
                        completed,
                        template: task.clone(),
                    }));
                }
                Recurrence::None => entries.push(DayEntry::Single(task.clone())),
            }
        }
        entries
    }

    pub fn tasks_for_today(&self) -> Vec<DayEntry> {
        self.tasks_for_date(chrono::Local::now().date_naive())
    }

    pub fn tasks_for_tomorrow(&self) -> Vec<DayEntry> {
        self.tasks_for_date(chrono::Local::now().date_naive() + chrono::Duration::days(1))
    }

    /// Ask the suggester for a timeline and write the result onto the
    /// template. A failed call is converted into the sentinel strings and
    /// a cleared duration, never propagated.
    ///
    /// Always targets the template — callers holding an instance must
    /// resolve its template id first. The response is applied whenever it
    /// arrives, even if the template was edited or archived in the
    /// interim; the later write wins.
    pub async fn fetch_suggestion<S: TimelineSuggester>(
        &mut self,
        id: Uuid,
        suggester: &S,
    ) -> Result<(), PlannerError> {
        let task = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(PlannerError::TaskNotFound(id))?;

        let request = SuggestionRequest {
            task_description: format!(
                "{}. Details: {}. Priority: {}. Original due date: {}",
                task.title,
                task.description,
                task.priority,
                task.due_at.format("%Y-%m-%d")
            ),
            user_history: self.history_summary(id),
        };

        let result = suggester.suggest(&request).await;

        let task = self.find_mut(id)?;
        match result {
            Ok(suggestion) => {
                task.suggested_timeline = Some(suggestion.suggested_timeline);
                task.estimated_duration = Some(suggestion.estimated_duration);
                task.reasoning = Some(suggestion.reasoning);
            }
            Err(e) => {
                log::error!("Timeline suggestion failed for {}: {}", id, e);
                task.suggested_timeline = Some(SUGGESTION_ERROR_TIMELINE.to_string());
                task.estimated_duration = None;
                task.reasoning = Some(SUGGESTION_ERROR_REASONING.to_string());
            }
        }
        self.persist();
        Ok(())
    }

    /// Free-text sketch of what else the user has going on, from a
    /// bounded sample of other active templates.
    fn history_summary(&self, exclude: Uuid) -> String {
        let mut history = String::from("User is planning tasks. ");
        let sample: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| !t.is_archived && t.id != exclude)
            .take(HISTORY_SAMPLE)
            .map(|t| format!("{} (Priority: {})", t.title, t.priority))
            .collect();
        if sample.is_empty() {
            history.push_str("No prior active task data available for this session.");
        } else {
            history.push_str(&format!(
                "Current active tasks include: {}.",
                sample.join(", ")
            ));
        }
        history
    }

    fn find_mut(&mut self, id: Uuid) -> Result<&mut Task, PlannerError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PlannerError::TaskNotFound(id))
    }
}
