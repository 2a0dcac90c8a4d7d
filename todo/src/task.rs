//! Task model and read-side list projections

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item
///
/// The persisted representation is a JSON object with exactly these four
/// fields; `id` is assigned at creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, opaque to consumers
    pub id: String,
    /// Title shown in lists, non-empty
    pub title: String,
    /// Free-form description, may be empty
    pub description: String,
    /// Completion flag; toggling never removes the task
    pub complete: bool,
}

impl Task {
    /// Create a new task with a freshly generated id and `complete = false`
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            title: title.into(),
            description: description.into(),
            complete: false,
        }
    }
}

/// Three-way display filter over a task list
///
/// A pure read-side projection: filtering never mutates stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    /// Only tasks not yet completed
    #[default]
    Pending,
    /// Every task
    All,
    /// Only completed tasks
    Completed,
}

impl ListFilter {
    /// Whether a task passes this filter
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            ListFilter::Pending => !task.complete,
            ListFilter::All => true,
            ListFilter::Completed => task.complete,
        }
    }
}

/// Project a list through a display filter, preserving order
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: ListFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Case-insensitive substring search over title and description
pub fn search_tasks<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|task| {
            task.title.to_lowercase().contains(&needle) || task.description.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, complete: bool) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            complete,
        }
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Buy milk", "2% if they have it");
        assert!(!task.complete);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2% if they have it");
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_new_tasks_get_distinct_ids() {
        let a = Task::new("a", "");
        let b = Task::new("b", "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_filter_pending() {
        let tasks = vec![task("1", "a", false), task("2", "b", true), task("3", "c", false)];
        let pending = filter_tasks(&tasks, ListFilter::Pending);
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|t| !t.complete));
    }

    #[test]
    fn test_filter_completed() {
        let tasks = vec![task("1", "a", false), task("2", "b", true)];
        let completed = filter_tasks(&tasks, ListFilter::Completed);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, "2");
    }

    #[test]
    fn test_filter_all_preserves_order() {
        let tasks = vec![task("1", "a", true), task("2", "b", false), task("3", "c", true)];
        let all = filter_tasks(&tasks, ListFilter::All);
        let ids: Vec<&str> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_search_matches_title_and_description() {
        let mut tasks = vec![task("1", "Buy milk", false), task("2", "Call dentist", false)];
        tasks[1].description = "about the milk teeth".to_string();
        let hits = search_tasks(&tasks, "MILK");
        assert_eq!(hits.len(), 2);

        let hits = search_tasks(&tasks, "dentist");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[test]
    fn test_serialized_shape() {
        let task = task("a", "Buy milk", false);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "a", "title": "Buy milk", "description": "", "complete": false})
        );
    }
}
