//! Task cache for the image vendor's asynchronous jobs
//!
//! Handlers only see [`TaskStore`], so a persistent backend can replace the
//! in-memory map without touching endpoint logic.

pub mod memory;

pub use memory::InMemoryTaskStore;

use crate::models::GenerationTask;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts or replaces the entry for `task.task_id`. Last writer wins.
    async fn upsert(&self, task: GenerationTask) -> Result<()>;
    async fn get(&self, task_id: &str) -> Result<Option<GenerationTask>>;
}
