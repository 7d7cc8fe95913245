//! Filter/sort pipeline
//!
//! Derives the displayed list from the full task set. Pure: the same
//! tasks, query and `today` always give the same ordered output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::task::{Task, TaskPriority};
use crate::Error;

/// Filter on completion state and due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    All,
    Active,
    Completed,
    DueToday,
    Overdue,
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::All
    }
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 5] = [
        Self::All,
        Self::Active,
        Self::Completed,
        Self::DueToday,
        Self::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::DueToday => "due-today",
            Self::Overdue => "overdue",
        }
    }

    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
            Self::DueToday => task.is_due_today(today),
            Self::Overdue => task.is_overdue(today),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown status filter: {}", s)))
    }
}

/// Filter on priority; `All` passes everything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PriorityFilter {
    All,
    Only(TaskPriority),
}

impl Default for PriorityFilter {
    fn default() -> Self {
        Self::All
    }
}

impl PriorityFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => task.priority == *priority,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(priority) => f.write_str(priority.as_str()),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl TryFrom<String> for PriorityFilter {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PriorityFilter> for String {
    fn from(filter: PriorityFilter) -> Self {
        filter.to_string()
    }
}

/// Ordering applied within the incomplete and completed groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    DueDate,
    Priority,
    Alphabetical,
    CreatedAt,
}

impl Default for SortKey {
    fn default() -> Self {
        Self::CreatedAt
    }
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        Self::CreatedAt,
        Self::DueDate,
        Self::Priority,
        Self::Alphabetical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
            Self::Alphabetical => "alphabetical",
            Self::CreatedAt => "createdAt",
        }
    }

    /// Human-readable label for menus
    pub fn label(&self) -> &'static str {
        match self {
            Self::DueDate => "Due Date",
            Self::Priority => "Priority",
            Self::Alphabetical => "Alphabetically",
            Self::CreatedAt => "Recently Created",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown sort key: {}", s)))
    }
}

/// Everything the pipeline needs besides the tasks and today's date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskQuery {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub search: String,
    pub sort: SortKey,
}

impl TaskQuery {
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Whether any filter hides tasks (sorting does not count)
    pub fn is_filtered(&self) -> bool {
        self.status != StatusFilter::All
            || self.priority != PriorityFilter::All
            || !self.search.trim().is_empty()
    }
}

/// Case-insensitive match against title, description or category name
///
/// `needle` must already be lowercased; empty passes everything.
fn matches_search(task: &Task, needle: &str) -> bool {
    needle.is_empty()
        || task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
        || task.category.as_str().to_lowercase().contains(needle)
}

fn lowercase_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Order two tasks: incomplete first, then by `sort`
pub fn compare(a: &Task, b: &Task, sort: SortKey) -> Ordering {
    a.completed.cmp(&b.completed).then_with(|| match sort {
        SortKey::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Priority => b
            .priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at)),
        SortKey::Alphabetical => lowercase_chars(&a.title).cmp(lowercase_chars(&b.title)),
        SortKey::CreatedAt => b.created_at.cmp(&a.created_at),
    })
}

/// Filter and sort, borrowing from `tasks`
pub fn apply_refs<'a>(tasks: &'a [Task], query: &TaskQuery, today: NaiveDate) -> Vec<&'a Task> {
    // Blank text passes everything; otherwise match it as typed
    let needle = if query.search.trim().is_empty() {
        String::new()
    } else {
        query.search.to_lowercase()
    };
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| {
            query.status.matches(t, today)
                && query.priority.matches(t)
                && matches_search(t, &needle)
        })
        .collect();

    // Stable, so equal keys keep stored order
    visible.sort_by(|a, b| compare(a, b, query.sort));
    visible
}

/// Filter and sort into an owned list
pub fn apply(tasks: &[Task], query: &TaskQuery, today: NaiveDate) -> Vec<Task> {
    apply_refs(tasks, query, today)
        .into_iter()
        .cloned()
        .collect()
}
