//! Seed command implementation.

use chrono::{DateTime, Duration, Utc};
use taskmanager_core::storage::TaskRepository;
use taskmanager_core::task::{CreateTaskInput, Task};
use taskmanager_storage::DynamoDbRepository;

use super::error::Result;

const TITLES: [&str; 8] = [
    "Review pull request",
    "Send invoice",
    "Update documentation",
    "Grocery shopping",
    "Book flights",
    "Reply to emails",
    "Renew passport",
    "Plan sprint",
];

/// Generate `count` tasks for `owner`, due one per day starting tomorrow.
///
/// Every other task asks for a reminder the evening before it is due.
pub fn generate_seed_tasks(owner: &str, count: u32, now: DateTime<Utc>) -> Vec<Task> {
    (0..count)
        .map(|i| {
            let due_date = now + Duration::days(i64::from(i) + 1);
            let wants_reminder = i % 2 == 0;
            let input = CreateTaskInput {
                title: TITLES[i as usize % TITLES.len()].to_string(),
                description: Some(format!("Seeded task #{}", i + 1)),
                due_date,
                reminder: Some(wants_reminder),
                reminder_time: wants_reminder.then(|| due_date - Duration::hours(12)),
            };
            Task::new(owner, &input, now)
        })
        .collect()
}

/// Insert tasks through the storage layer, returning how many were written.
pub async fn seed_tasks(repo: &DynamoDbRepository, tasks: &[Task]) -> Result<u32> {
    let mut inserted = 0;
    for task in tasks {
        repo.create_task(task).await?;
        inserted += 1;
    }
    Ok(inserted)
}
