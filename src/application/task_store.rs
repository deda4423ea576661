use super::sorting::bubble_sort_by_key;
use crate::domain::*;
use crate::ports::{EventLog, TaskRepository};
use std::collections::HashMap;
use std::sync::Arc;

/// Authoritative in-memory index of tasks.
///
/// Every mutation is written through to the repository as a full snapshot
/// and then recorded in the event log. Both of those are best-effort: a
/// failure is reported through `tracing` and the in-memory change stands.
/// Read operations hand out clones and never touch either port.
pub struct TaskStore {
    tasks: HashMap<TaskId, Task>,
    repository: Arc<dyn TaskRepository>,
    event_log: Arc<dyn EventLog>,
}

impl TaskStore {
    pub fn new(repository: Arc<dyn TaskRepository>, event_log: Arc<dyn EventLog>) -> Self {
        let loaded = match repository.load() {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!("Error loading data, starting with no tasks: {}", e);
                Vec::new()
            }
        };

        let mut tasks = HashMap::with_capacity(loaded.len());
        for task in loaded {
            let id = task.id;
            if tasks.insert(id, task).is_some() {
                tracing::warn!("Task {} appears more than once in the data file, keeping the last", id);
            }
        }
        tracing::debug!("Loaded {} tasks", tasks.len());

        Self {
            tasks,
            repository,
            event_log,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn add(&mut self, task: Task) -> DomainResult<()> {
        if self.tasks.contains_key(&task.id) {
            return Err(DomainError::DuplicateId(task.id));
        }

        let message = format!("Task created: {} - {}", task.id, task.title);
        tracing::info!("Adding task {}", task.id);
        self.tasks.insert(task.id, task);

        self.persist();
        self.record(&message);
        Ok(())
    }

    pub fn get_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Set a task's status, returning the status it had before.
    ///
    /// Setting the status a task already has changes nothing and is neither
    /// saved nor logged.
    pub fn update_status(&mut self, id: TaskId, new_status: TaskStatus) -> DomainResult<TaskStatus> {
        let task = self.tasks.get_mut(&id).ok_or(DomainError::NotFound(id))?;

        let old_status = task.status();
        if old_status == new_status {
            tracing::debug!("Task {} already {}", id, new_status);
            return Ok(old_status);
        }

        task.set_status(new_status);
        tracing::info!("Task {} moved from {} to {}", id, old_status, new_status);

        self.persist();
        self.record(&format!(
            "Task {id} status updated from {old_status} to {new_status}"
        ));
        Ok(old_status)
    }

    pub fn delete(&mut self, id: TaskId) -> DomainResult<Task> {
        let removed = self.tasks.remove(&id).ok_or(DomainError::NotFound(id))?;
        tracing::info!("Deleted task {}", id);

        self.persist();
        self.record(&format!("Task deleted: {id}"));
        Ok(removed)
    }

    /// All tasks in the index's iteration order.
    pub fn get_all(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    pub fn search_by_assignee(&self, name: &str) -> Vec<Task> {
        let mut results = Vec::new();
        for task in self.tasks.values() {
            if task.is_assigned_to(name) {
                results.push(task.clone());
            }
        }
        tracing::debug!("{} tasks assigned to {}", results.len(), name);
        results
    }

    /// Snapshot ordered Low -> High with a stable bubble sort.
    pub fn sort_by_priority(&self) -> Vec<Task> {
        let mut tasks = self.get_all();
        let passes = bubble_sort_by_key(&mut tasks, |task| task.priority);
        tracing::debug!("Sorted {} tasks by priority in {} passes", tasks.len(), passes);
        tasks
    }

    /// Snapshot in natural (due date) order.
    pub fn sort_by_due_date(&self) -> Vec<Task> {
        let mut tasks = self.get_all();
        tasks.sort_by(Task::cmp_by_due_date);
        tracing::debug!("Sorted {} tasks by due date", tasks.len());
        tasks
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save(&self.get_all()) {
            tracing::error!("Error saving data: {}", e);
        }
    }

    fn record(&self, message: &str) {
        if let Err(e) = self.event_log.log(message) {
            tracing::warn!("{}", e);
        }
    }
}
