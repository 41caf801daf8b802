use chrono::NaiveDate;

use nightplan::core::{Priority, Recurrence, TaskDraft, TaskPatch, TaskPlanner};
use nightplan::storage::JsonFileStore;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn daily_draft() -> TaskDraft {
    TaskDraft {
        title: "Review inbox".into(),
        description: "Clear it to zero".into(),
        due_at: d(2024, 1, 1).and_hms_opt(9, 0, 0).unwrap(),
        priority: Priority::High,
        recurrence: Recurrence::Daily,
    }
}

#[test]
fn state_survives_a_planner_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let id = {
        let mut planner = TaskPlanner::load(Box::new(JsonFileStore::new(&path)));
        let id = planner.add(daily_draft());
        planner.add(TaskDraft {
            title: "Call bank".into(),
            description: String::new(),
            due_at: d(2024, 1, 3).and_hms_opt(14, 0, 0).unwrap(),
            priority: Priority::Medium,
            recurrence: Recurrence::None,
        });
        planner.toggle_completion(id, Some(d(2024, 1, 3))).unwrap();
        id
    };

    // Fresh planner over the same file sees the same expansion state.
    let planner = TaskPlanner::load(Box::new(JsonFileStore::new(&path)));
    let entries = planner.tasks_for_date(d(2024, 1, 3));
    assert_eq!(entries.len(), 2);

    let instance = entries
        .iter()
        .find(|e| e.is_recurring_instance())
        .expect("daily instance present");
    assert_eq!(instance.template_id(), id);
    assert!(instance.is_completed());
    assert_eq!(
        instance.due_at(),
        d(2024, 1, 3).and_hms_opt(9, 0, 0).unwrap()
    );

    let single = entries
        .iter()
        .find(|e| !e.is_recurring_instance())
        .expect("one-off present");
    assert!(!single.is_completed());
}

#[test]
fn archive_and_edit_persist_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let (kept, archived) = {
        let mut planner = TaskPlanner::load(Box::new(JsonFileStore::new(&path)));
        let kept = planner.add(daily_draft());
        let archived = planner.add(daily_draft());
        planner.archive(archived).unwrap();
        planner
            .update(
                kept,
                TaskPatch {
                    title: Some("Review inbox twice".into()),
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        (kept, archived)
    };

    let planner = TaskPlanner::load(Box::new(JsonFileStore::new(&path)));
    let entries = planner.tasks_for_date(d(2024, 1, 10));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].template_id(), kept);
    assert_eq!(entries[0].title(), "Review inbox twice");
    assert!(planner.task(archived).is_none());
    // Archived templates are hidden, not deleted.
    assert!(planner.all_tasks().iter().any(|t| t.id == archived));
}

#[test]
fn corrupt_store_starts_an_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, "not json at all").unwrap();

    let mut planner = TaskPlanner::load(Box::new(JsonFileStore::new(&path)));
    assert!(planner.all_tasks().is_empty());

    // The session remains usable and overwrites the bad file on mutation.
    planner.add(daily_draft());
    let reloaded = TaskPlanner::load(Box::new(JsonFileStore::new(&path)));
    assert_eq!(reloaded.all_tasks().len(), 1);
}
