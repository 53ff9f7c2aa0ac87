/// Storage port trait
///
/// Defines the repository interface for meetings, tasks and the glossary.
/// Implementations: in-memory and SQLite adapters. Both assign identifiers
/// and enforce the capacity caps inside `save_extraction`.
use crate::domain::models::{GlossaryEntry, Meeting, Task, TaskUpdate};
use crate::error::Result;
use async_trait::async_trait;

/// Meetings kept before the oldest are evicted
pub const MAX_MEETINGS: usize = 50;

/// Tasks kept before the oldest are evicted
pub const MAX_TASKS: usize = 200;

/// Capacity caps applied on every write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageLimits {
    pub max_meetings: usize,
    pub max_tasks: usize,
}

impl Default for StorageLimits {
    fn default() -> Self {
        Self {
            max_meetings: MAX_MEETINGS,
            max_tasks: MAX_TASKS,
        }
    }
}

/// Port trait for storage operations
#[async_trait]
pub trait StoragePort: Send + Sync {
    // Extraction operations
    /// Store a meeting and its tasks in one step, returning them with ids assigned
    ///
    /// Task `meeting_id`s are overwritten with the new meeting's id. Both
    /// collections are truncated to their caps (oldest first) afterwards.
    async fn save_extraction(&self, meeting: &Meeting, tasks: &[Task])
        -> Result<(Meeting, Vec<Task>)>;

    /// All stored meetings in insertion order
    async fn list_meetings(&self) -> Result<Vec<Meeting>>;

    // Task operations
    /// All stored tasks in insertion order
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn get_task(&self, id: i64) -> Result<Option<Task>>;

    /// Apply a partial update; `NotFound` if the task does not exist
    async fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Task>;

    // Glossary operations
    /// Get the glossary entries
    async fn get_glossary(&self) -> Result<Vec<GlossaryEntry>>;

    /// Replace the whole glossary
    async fn save_glossary(&self, entries: &[GlossaryEntry]) -> Result<()>;
}
