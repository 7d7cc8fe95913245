//! Task list controller
//!
//! Holds the in-memory copy of the collection and the active query. The
//! storage stays the source of truth; the cache is patched in place after
//! every successful mutation and only reloaded by [`TaskListController::refresh`].

use chrono::NaiveDate;

use crate::task::{validation, NewTask, Task, TaskPatch, TaskService, TaskStorage};
use crate::view::{self, PriorityFilter, SortKey, StatusFilter, TaskQuery, TaskStats};
use crate::{Error, Result};

/// Today's date in the local timezone, for status filters
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub struct TaskListController<S> {
    service: TaskService<S>,
    tasks: Vec<Task>,
    query: TaskQuery,
}

impl<S: TaskStorage> TaskListController<S> {
    /// Create a controller with an empty cache; call [`refresh`](Self::refresh) to fill it
    pub fn new(service: TaskService<S>) -> Self {
        Self {
            service,
            tasks: Vec::new(),
            query: TaskQuery::default(),
        }
    }

    /// Create a controller and load the current collection
    pub async fn load(service: TaskService<S>) -> Result<Self> {
        let mut controller = Self::new(service);
        controller.refresh().await?;
        Ok(controller)
    }

    pub fn service(&self) -> &TaskService<S> {
        &self.service
    }

    /// Cached tasks in stored order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn query(&self) -> &TaskQuery {
        &self.query
    }

    /// Reload the cache from storage
    pub async fn refresh(&mut self) -> Result<()> {
        self.tasks = self.service.get_all().await?;
        tracing::debug!(count = self.tasks.len(), "Refreshed task cache");
        Ok(())
    }

    fn replace_cached(&mut self, task: &Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task.clone(),
            None => self.tasks.push(task.clone()),
        }
    }

    /// Create without validation
    pub async fn create(&mut self, data: NewTask) -> Result<Task> {
        let task = self.service.create(data).await?;
        self.replace_cached(&task);
        Ok(task)
    }

    /// Validate against `today`, then create
    pub async fn create_validated(&mut self, data: NewTask, today: NaiveDate) -> Result<Task> {
        validation::validate_new_task(&data, today)?;
        self.create(data).await
    }

    pub async fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let task = self.service.update(id, patch).await?;
        self.replace_cached(&task);
        Ok(task)
    }

    /// Validate the fields the patch sets, then update
    pub async fn update_validated(
        &mut self,
        id: &str,
        patch: TaskPatch,
        today: NaiveDate,
    ) -> Result<Task> {
        validation::validate_patch(&patch, today)?;
        self.update(id, patch).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<Task> {
        let removed = self.service.delete(id).await?;
        self.tasks.retain(|t| t.id != id);
        Ok(removed)
    }

    pub async fn toggle_complete(&mut self, id: &str) -> Result<Task> {
        let task = self.service.toggle_complete(id).await?;
        self.replace_cached(&task);
        Ok(task)
    }

    async fn current(&self, id: &str) -> Result<Task> {
        if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
            return Ok(task.clone());
        }
        self.service
            .get_by_id(id)
            .await?
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    /// Move the task to the next priority (Low, Medium, High, then Low)
    pub async fn cycle_priority(&mut self, id: &str) -> Result<Task> {
        let next = self.current(id).await?.priority.next();
        self.update(id, TaskPatch::default().with_priority(next)).await
    }

    /// Move the task to the next category in display order
    pub async fn cycle_category(&mut self, id: &str) -> Result<Task> {
        let next = self.current(id).await?.category.next();
        self.update(id, TaskPatch::default().with_category(next)).await
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.query.status = status;
    }

    pub fn set_priority_filter(&mut self, priority: PriorityFilter) {
        self.query.priority = priority;
    }

    /// Set the committed search text (see [`view::SearchDebouncer`])
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.query.sort = sort;
    }

    pub fn set_query(&mut self, query: TaskQuery) {
        self.query = query;
    }

    /// Tasks to display under the current query
    pub fn visible(&self, today: NaiveDate) -> Vec<&Task> {
        view::apply_refs(&self.tasks, &self.query, today)
    }

    /// Counters over the visible tasks
    pub fn stats(&self, today: NaiveDate) -> TaskStats {
        TaskStats::compute(self.visible(today), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{MemoryTaskStorage, TaskCategory, TaskPriority, ValidationError};
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    async fn create_test_controller() -> TaskListController<Arc<MemoryTaskStorage>> {
        let storage = Arc::new(MemoryTaskStorage::new());
        TaskListController::load(TaskService::new(storage))
            .await
            .unwrap()
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_cache_follows_mutations() {
        let mut controller = create_test_controller().await;

        let a = controller.create(NewTask::new("Alpha")).await.unwrap();
        let b = controller.create(NewTask::new("Beta")).await.unwrap();
        assert_eq!(controller.tasks().len(), 2);

        controller.toggle_complete(&a.id).await.unwrap();
        assert!(controller.tasks()[0].completed);

        controller
            .update(&b.id, TaskPatch::default().with_title("Beta 2"))
            .await
            .unwrap();
        assert_eq!(controller.tasks()[1].title, "Beta 2");

        controller.delete(&a.id).await.unwrap();
        assert_eq!(controller.tasks().len(), 1);

        let stored = controller.service().get_all().await.unwrap();
        assert_eq!(stored, controller.tasks().to_vec());
    }

    #[tokio::test]
    async fn test_create_pushes_without_reload() {
        let mut controller = create_test_controller().await;
        let outside = controller
            .service()
            .create(NewTask::new("Written elsewhere"))
            .await
            .unwrap();

        let task = controller.create(NewTask::new("Mine")).await.unwrap();
        assert_eq!(controller.tasks(), &[task.clone()]);

        controller.refresh().await.unwrap();
        let ids: Vec<&str> = controller.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![outside.id.as_str(), task.id.as_str()]);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_cache_alone() {
        let mut controller = create_test_controller().await;
        controller.create(NewTask::new("Keep")).await.unwrap();

        assert!(matches!(
            controller.delete("missing").await,
            Err(Error::TaskNotFound(_))
        ));
        assert!(matches!(
            controller.cycle_priority("missing").await,
            Err(Error::TaskNotFound(_))
        ));
        assert_eq!(controller.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_create_validated_rejects_bad_input() {
        let mut controller = create_test_controller().await;

        let err = controller
            .create_validated(NewTask::new(" "), today())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::TitleRequired)));
        assert!(controller.service().get_all().await.unwrap().is_empty());

        let task = controller
            .create_validated(NewTask::new("Fine").with_due_date(today()), today())
            .await
            .unwrap();
        assert_eq!(task.due_date, Some(today()));
    }

    #[tokio::test]
    async fn test_update_validated() {
        let mut controller = create_test_controller().await;
        let task = controller.create(NewTask::new("Plan")).await.unwrap();

        let past = today().pred_opt().unwrap();
        let err = controller
            .update_validated(&task.id, TaskPatch::default().with_due_date(Some(past)), today())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::DueDateInPast(_))
        ));
    }

    #[tokio::test]
    async fn test_cycle_priority_and_category() {
        let mut controller = create_test_controller().await;
        let task = controller.create(NewTask::new("Cycle")).await.unwrap();

        let high = controller.cycle_priority(&task.id).await.unwrap();
        assert_eq!(high.priority, TaskPriority::High);
        let low = controller.cycle_priority(&task.id).await.unwrap();
        assert_eq!(low.priority, TaskPriority::Low);

        let shopping = controller.cycle_category(&task.id).await.unwrap();
        assert_eq!(shopping.category, TaskCategory::Shopping);
        assert_eq!(controller.tasks()[0].category, TaskCategory::Shopping);
    }

    #[tokio::test]
    async fn test_visible_and_stats_follow_query() {
        let mut controller = create_test_controller().await;
        controller
            .create(NewTask::new("Groceries").with_category(TaskCategory::Shopping))
            .await
            .unwrap();
        let gym = controller
            .create(NewTask::new("Gym").with_priority(TaskPriority::High))
            .await
            .unwrap();
        controller
            .create(NewTask::new("Read").with_priority(TaskPriority::Low))
            .await
            .unwrap();
        controller.toggle_complete(&gym.id).await.unwrap();

        controller.set_sort(SortKey::Alphabetical);
        assert_eq!(
            titles(&controller.visible(today())),
            vec!["Groceries", "Read", "Gym"]
        );

        controller.set_search("shop");
        assert_eq!(titles(&controller.visible(today())), vec!["Groceries"]);

        controller.set_search("");
        controller.set_status_filter(StatusFilter::Completed);
        let stats = controller.stats(today());
        assert_eq!(stats.total, 1);
        assert_eq!(stats.completion_percentage, 100);

        controller.set_query(TaskQuery::default());
        assert_eq!(controller.stats(today()).total, 3);
        assert!(!controller.query().is_filtered());
    }
}
