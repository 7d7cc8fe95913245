//! Task model definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::storage::generate_id;
use crate::Error;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TaskPriority {
    /// All priorities in cycle order
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Sort weight, higher is more urgent
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Next priority in the click-to-cycle order (wraps around)
    pub fn next(&self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown priority: {}", s)))
    }
}

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    Work,
    Personal,
    Shopping,
    Health,
    Finance,
}

impl Default for TaskCategory {
    fn default() -> Self {
        Self::Personal
    }
}

impl TaskCategory {
    /// All categories in cycle order
    pub const ALL: [TaskCategory; 5] = [
        Self::Work,
        Self::Personal,
        Self::Shopping,
        Self::Health,
        Self::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Finance => "Finance",
        }
    }

    /// Next category in the click-to-cycle order (wraps around)
    pub fn next(&self) -> Self {
        match self {
            Self::Work => Self::Personal,
            Self::Personal => Self::Shopping,
            Self::Shopping => Self::Health,
            Self::Health => Self::Finance,
            Self::Finance => Self::Work,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown category: {}", s)))
    }
}

/// A personal task
///
/// Stored as one element of the JSON array under the storage key, so the
/// field names here are the persisted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Calendar date without time; `None` means no deadline
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with the given title and a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority: TaskPriority::default(),
            category: TaskCategory::default(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    /// Whether the task is open and due exactly on `today`
    pub fn is_due_today(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date == Some(today)
    }

    /// Whether the task is open and its due date has passed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Stamp a fresh `updated_at`, never moving it backwards
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// Payload for creating a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub category: Option<TaskCategory>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Build the task record: trims text fields and fills defaults
    pub(crate) fn into_task(self) -> Task {
        let mut task = Task::new(self.title.trim());
        if let Some(description) = self.description {
            task.description = description.trim().to_string();
        }
        task.due_date = self.due_date;
        task.priority = self.priority.unwrap_or_default();
        task.category = self.category.unwrap_or_default();
        task
    }
}

/// Partial update merged over an existing task
///
/// `id` is accepted so arbitrary payloads deserialize, but the repository
/// always restores the original id after merging.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Absent keeps the current date, `null` clears it
    #[serde(default, deserialize_with = "deserialize_present")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub category: Option<TaskCategory>,
    #[serde(default)]
    pub completed: Option<bool>,
}

fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TaskPatch {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Merge every present field over `task`, id included
    pub(crate) fn merge_into(self, task: &mut Task) {
        if let Some(id) = self.id {
            task.id = id;
        }
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_task() {
        let task = Task::new("Test task");
        assert_eq!(task.title, "Test task");
        assert_eq!(task.description, "");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.category, TaskCategory::Personal);
        assert!(task.due_date.is_none());
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_task_builders() {
        let task = Task::new("Buy milk")
            .with_description("two liters")
            .with_due_date(date(2025, 3, 1))
            .with_priority(TaskPriority::High)
            .with_category(TaskCategory::Shopping);

        assert_eq!(task.description, "two liters");
        assert_eq!(task.due_date, Some(date(2025, 3, 1)));
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.category, TaskCategory::Shopping);
    }

    #[test]
    fn test_serialized_field_names() {
        let task = Task::new("Pay rent")
            .with_due_date(date(2025, 3, 1))
            .with_priority(TaskPriority::High)
            .with_category(TaskCategory::Finance);
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["dueDate"], "2025-03-01");
        assert_eq!(value["priority"], "High");
        assert_eq!(value["category"], "Finance");
        assert_eq!(value["completed"], false);
        assert!(value["createdAt"].is_string());
        assert!(value["updatedAt"].is_string());
        assert!(value.get("due_date").is_none());
    }

    #[test]
    fn test_missing_due_date_serializes_as_null() {
        let task = Task::new("No deadline");
        let value = serde_json::to_value(&task).unwrap();
        assert!(value["dueDate"].is_null());
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let raw = r#"{
            "id": "abc",
            "title": "Legacy",
            "createdAt": "2025-01-01T10:00:00.000Z",
            "updatedAt": "2025-01-01T10:00:00.000Z"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();

        assert_eq!(task.id, "abc");
        assert_eq!(task.description, "");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.category, TaskCategory::Personal);
        assert!(!task.completed);
    }

    #[test]
    fn test_priority_cycle_wraps() {
        assert_eq!(TaskPriority::Low.next(), TaskPriority::Medium);
        assert_eq!(TaskPriority::Medium.next(), TaskPriority::High);
        assert_eq!(TaskPriority::High.next(), TaskPriority::Low);
    }

    #[test]
    fn test_category_cycle_visits_every_category() {
        let mut current = TaskCategory::Work;
        let mut seen = Vec::new();
        for _ in 0..TaskCategory::ALL.len() {
            seen.push(current);
            current = current.next();
        }
        assert_eq!(seen, TaskCategory::ALL.to_vec());
        assert_eq!(current, TaskCategory::Work);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert_eq!("SHOPPING".parse::<TaskCategory>().unwrap(), TaskCategory::Shopping);
        assert!(matches!(
            "urgent".parse::<TaskPriority>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_new_task_trims_and_defaults() {
        let task = NewTask::new("  Call mom  ")
            .with_description("  weekly  ")
            .into_task();

        assert_eq!(task.title, "Call mom");
        assert_eq!(task.description, "weekly");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.category, TaskCategory::Personal);
    }

    #[test]
    fn test_patch_due_date_absent_vs_null() {
        let absent: TaskPatch = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(absent.due_date, None);

        let cleared: TaskPatch = serde_json::from_str(r#"{"dueDate": null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: TaskPatch = serde_json::from_str(r#"{"dueDate": "2025-05-04"}"#).unwrap();
        assert_eq!(set.due_date, Some(Some(date(2025, 5, 4))));
    }

    #[test]
    fn test_patch_merge() {
        let mut task = Task::new("Original").with_due_date(date(2025, 1, 1));
        TaskPatch::default()
            .with_title("Changed")
            .with_due_date(None)
            .with_completed(true)
            .merge_into(&mut task);

        assert_eq!(task.title, "Changed");
        assert!(task.due_date.is_none());
        assert!(task.completed);
    }

    #[test]
    fn test_due_predicates() {
        let today = date(2025, 6, 10);
        let due_today = Task::new("a").with_due_date(today);
        let overdue = Task::new("b").with_due_date(date(2025, 6, 9));
        let mut done = Task::new("c").with_due_date(date(2025, 6, 9));
        done.completed = true;

        assert!(due_today.is_due_today(today));
        assert!(!due_today.is_overdue(today));
        assert!(overdue.is_overdue(today));
        assert!(!overdue.is_due_today(today));
        assert!(!done.is_overdue(today));
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let mut task = Task::new("Clock");
        let future = Utc::now() + chrono::Duration::hours(1);
        task.updated_at = future;
        task.touch();
        assert_eq!(task.updated_at, future);
    }
}
