//! Overview counters for a task list

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::{Task, TaskPriority};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Rounded to the nearest whole percent; 0 for an empty list
    pub completion_percentage: u8,
    pub due_today: usize,
    pub overdue: usize,
    /// Open tasks with high priority
    pub high_priority: usize,
}

impl TaskStats {
    pub fn compute<'a, I>(tasks: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut stats = Self::default();
        for task in tasks {
            stats.total += 1;
            if task.completed {
                stats.completed += 1;
            } else if task.priority == TaskPriority::High {
                stats.high_priority += 1;
            }
            if task.is_due_today(today) {
                stats.due_today += 1;
            }
            if task.is_overdue(today) {
                stats.overdue += 1;
            }
        }
        stats.active = stats.total - stats.completed;
        if stats.total > 0 {
            // Integer round-half-up of completed / total * 100
            stats.completion_percentage =
                ((stats.completed * 200 + stats.total) / (stats.total * 2)) as u8;
        }
        stats
    }
}
