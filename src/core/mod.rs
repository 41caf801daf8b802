pub mod planner;
pub mod recurrence;
pub mod schedule;
pub mod task;

pub use planner::{PlannerError, TaskPlanner};
pub use recurrence::Recurrence;
pub use schedule::{DayEntry, TaskInstance};
pub use task::{Priority, Task, TaskDraft, TaskPatch};
