use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use nightplan::ai::AnthropicSuggester;
use nightplan::config::PlannerConfig;
use nightplan::core::{DayEntry, Priority, Recurrence, TaskDraft, TaskPatch, TaskPlanner};
use nightplan::storage::JsonFileStore;

#[derive(Parser)]
#[command(name = "nightplan", about = "Plan tomorrow's tasks from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a task for a given date and time
    Add {
        title: String,
        /// Due moment, "YYYY-MM-DD HH:MM" (or just "YYYY-MM-DD")
        #[arg(long)]
        due: String,
        #[arg(long, default_value = "")]
        description: String,
        /// low, medium, or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Repeat every day from the due date onward
        #[arg(long)]
        daily: bool,
    },
    /// List the tasks due on a date (tomorrow by default)
    List {
        /// "YYYY-MM-DD"; defaults to tomorrow
        #[arg(long)]
        date: Option<String>,
        #[arg(long, conflicts_with = "date")]
        today: bool,
    },
    /// Toggle completion for a task, or for one day of a daily task
    Toggle {
        id: Uuid,
        /// Occurrence date for a daily task, "YYYY-MM-DD"
        #[arg(long)]
        date: Option<String>,
    },
    /// Edit a task's fields
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Archive a task; it disappears from every listing
    Archive { id: Uuid },
    /// Ask the AI for a timeline suggestion for a task
    Suggest { id: Uuid },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to the systemd user journal (`journalctl --user -t nightplan -f`).
    if let Ok(journal) = systemd_journal_logger::JournalLog::new() {
        let journal = journal.with_syslog_identifier("nightplan".to_string());
        if log::set_boxed_logger(Box::new(journal)).is_ok() {
            log::set_max_level(log::LevelFilter::Info);
        }
    }

    let cli = Cli::parse();
    let config = PlannerConfig::load();
    config.ensure_dirs()?;

    let store = JsonFileStore::new(config.tasks_path());
    let mut planner = TaskPlanner::load(Box::new(store));

    match cli.command {
        Command::Add {
            title,
            due,
            description,
            priority,
            daily,
        } => {
            let draft = TaskDraft {
                title,
                description,
                due_at: parse_due(&due)?,
                priority: parse_priority(&priority)?,
                recurrence: if daily { Recurrence::Daily } else { Recurrence::None },
            };
            let id = planner.add(draft);
            println!("Added {}", id);
        }
        Command::List { date, today } => {
            let date = match (date, today) {
                (Some(raw), _) => parse_date(&raw)?,
                (None, true) => chrono::Local::now().date_naive(),
                (None, false) => chrono::Local::now().date_naive() + chrono::Duration::days(1),
            };
            print_day(date, planner.tasks_for_date(date));
        }
        Command::Toggle { id, date } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            planner.toggle_completion(id, date)?;
        }
        Command::Edit {
            id,
            title,
            description,
            due,
            priority,
        } => {
            let patch = TaskPatch {
                title,
                description,
                due_at: due.as_deref().map(parse_due).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                ..TaskPatch::default()
            };
            planner.update(id, patch)?;
        }
        Command::Archive { id } => {
            planner.archive(id)?;
        }
        Command::Suggest { id } => {
            let api_key = std::env::var("ANTHROPIC_API_KEY")
                .map_err(|_| "ANTHROPIC_API_KEY is not set")?;
            let suggester = AnthropicSuggester::with_model(api_key, &config.suggestion_model);
            planner.fetch_suggestion(id, &suggester).await?;

            match planner.all_tasks().iter().find(|t| t.id == id) {
                Some(task) => {
                    if let Some(timeline) = &task.suggested_timeline {
                        println!("Timeline:  {}", timeline);
                    }
                    if let Some(duration) = &task.estimated_duration {
                        println!("Duration:  {}", duration);
                    }
                    if let Some(reasoning) = &task.reasoning {
                        println!("Reasoning: {}", reasoning);
                    }
                }
                None => println!("Task not found"),
            }
        }
    }

    Ok(())
}

fn print_day(date: NaiveDate, mut entries: Vec<DayEntry>) {
    if entries.is_empty() {
        println!("Nothing planned for {}", date);
        return;
    }
    entries.sort_by_key(DayEntry::due_at);
    println!("Tasks for {}:", date);
    for entry in &entries {
        let mark = if entry.is_completed() { "x" } else { " " };
        let repeat = if entry.is_recurring_instance() { " (daily)" } else { "" };
        println!(
            "  [{}] {} {} [{}]{}  {}",
            mark,
            entry.due_at().format("%H:%M"),
            entry.title(),
            entry.priority(),
            repeat,
            entry.template_id(),
        );
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date {:?}, expected YYYY-MM-DD", raw))?)
}

fn parse_due(raw: &str) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(parsed) = date.and_hms_opt(0, 0, 0) {
            return Ok(parsed);
        }
    }
    Err(format!("invalid due moment {:?}, expected YYYY-MM-DD [HH:MM]", raw).into())
}

fn parse_priority(raw: &str) -> Result<Priority, Box<dyn std::error::Error>> {
    Priority::parse(raw)
        .ok_or_else(|| format!("invalid priority {:?}, expected low|medium|high", raw).into())
}
