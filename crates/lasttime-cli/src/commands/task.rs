//! Task management commands for CLI.

use chrono::{Local, NaiveDateTime};
use clap::Subcommand;
use lasttime_core::elapsed::plural;
use lasttime_core::task::parse_timestamp;
use lasttime_core::{format_elapsed, TaskRecord};

use super::open_tracker;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task name
        name: String,
    },
    /// Mark a task as completed and update its streak
    Done {
        /// Task name
        name: String,
        /// Completion time (e.g. 2024-05-01T18:30:00); defaults to now
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
    },
    /// List all tasks
    List {
        /// Print tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one task as JSON
    Show {
        /// Task name
        name: String,
    },
}

fn parse_at(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw).ok_or_else(|| format!("invalid timestamp: {raw}"))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = open_tracker()?;

    match action {
        TaskAction::Add { name } => {
            tracker.add_task(&name, now())?;
            println!("Task '{}' added with an initial streak of 0.", name.trim());
        }
        TaskAction::Done { name, at } => {
            let completion = tracker.mark_completed(&name, at.unwrap_or_else(now))?;
            println!("{}", completion.message());
            if let Some(time) = completion.record.last_completed_time {
                println!(
                    "Task '{}' marked as completed at {}.",
                    completion.name,
                    time.format(DISPLAY_FORMAT)
                );
            }
        }
        TaskAction::List { json } => {
            let tasks = tracker.list_tasks()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks found. Add some tasks first!");
            } else {
                let now = now();
                println!("--- Your Tasks ---");
                for (name, record) in &tasks {
                    print_task(name, record, now);
                }
                println!("------------------");
            }
        }
        TaskAction::Show { name } => match tracker.get_task(&name)? {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => return Err(format!("Task '{}' not found.", name.trim()).into()),
        },
    }
    Ok(())
}

fn print_task(name: &str, record: &TaskRecord, now: NaiveDateTime) {
    println!("Task: {name}");
    match record.last_completed_time {
        Some(time) => println!(
            "  Last completed: {} ({})",
            time.format(DISPLAY_FORMAT),
            format_elapsed(Some(time), now)
        ),
        None => println!("  Last completed: Never"),
    }
    println!(
        "  Current Streak: {}",
        plural(i64::from(record.current_streak), "day")
    );
    println!("  Total Completions: {}", record.total_completions);
    println!("{}", "-".repeat(20));
}
