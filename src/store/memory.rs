use super::TaskStore;
use crate::models::GenerationTask;
use crate::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Process-lifetime map with no eviction.
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<DashMap<String, GenerationTask>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn upsert(&self, task: GenerationTask) -> Result<()> {
        tracing::debug!(task_id = %task.task_id, status = ?task.status, "Storing generation task");
        self.tasks.insert(task.task_id.clone(), task);
        Ok(())
    }

    async fn get(&self, task_id: &str) -> Result<Option<GenerationTask>> {
        Ok(self.tasks.get(task_id).map(|entry| entry.value().clone()))
    }
}
