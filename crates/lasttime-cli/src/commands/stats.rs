use lasttime_core::elapsed::plural;
use lasttime_core::{Leaders, Statistics};

use super::open_tracker;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stats = open_tracker()?.statistics()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_summary(&stats);
    }
    Ok(())
}

fn print_summary(stats: &Statistics) {
    println!("Tasks tracked: {}", stats.total_tasks);
    println!("Active streaks: {}", stats.active_streaks);
    println!(
        "Longest streak: {}",
        leaders(&stats.longest_streak, |v| plural(i64::from(v), "day"))
    );
    println!("Total completions: {}", stats.total_completions);
    println!(
        "Most completed: {}",
        leaders(&stats.most_completed, |v| {
            plural(i64::try_from(v).unwrap_or(i64::MAX), "time")
        })
    );
}

fn leaders<T: Copy>(leaders: &Leaders<T>, amount: impl Fn(T) -> String) -> String {
    if leaders.tasks.is_empty() {
        return "none".to_string();
    }
    format!("{} ({})", amount(leaders.value), leaders.tasks.join(", "))
}
