//! In-memory storage adapter
//!
//! Process-local collections behind a single mutex. Nothing survives a
//! restart; use the SQLite adapter for that.

use crate::domain::models::{GlossaryEntry, Meeting, Task, TaskUpdate};
use crate::error::{AppError, Result};
use crate::ports::storage::{StorageLimits, StoragePort};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    meetings: VecDeque<Meeting>,
    tasks: VecDeque<Task>,
    glossary: Vec<GlossaryEntry>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory storage implementation
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
    limits: StorageLimits,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: StorageLimits) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            limits,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| AppError::Storage(format!("memory store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn save_extraction(
        &self,
        meeting: &Meeting,
        tasks: &[Task],
    ) -> Result<(Meeting, Vec<Task>)> {
        let mut inner = self.lock()?;

        let meeting_id = inner.next_id();
        let mut stored_meeting = meeting.clone();
        stored_meeting.id = Some(meeting_id);

        let mut stored_tasks = Vec::with_capacity(tasks.len());
        for task in tasks {
            let mut t = task.clone();
            t.id = Some(inner.next_id());
            t.meeting_id = meeting_id;
            stored_tasks.push(t);
        }

        inner.meetings.push_back(stored_meeting.clone());
        inner.tasks.extend(stored_tasks.iter().cloned());

        while inner.meetings.len() > self.limits.max_meetings {
            inner.meetings.pop_front();
        }
        while inner.tasks.len() > self.limits.max_tasks {
            inner.tasks.pop_front();
        }

        Ok((stored_meeting, stored_tasks))
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        Ok(self.lock()?.meetings.iter().cloned().collect())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.lock()?.tasks.iter().cloned().collect())
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        Ok(self
            .lock()?
            .tasks
            .iter()
            .find(|t| t.id == Some(id))
            .cloned())
    }

    async fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Task> {
        let mut inner = self.lock()?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("task {}", id)))?;

        task.apply(update);
        Ok(task.clone())
    }

    async fn get_glossary(&self) -> Result<Vec<GlossaryEntry>> {
        Ok(self.lock()?.glossary.clone())
    }

    async fn save_glossary(&self, entries: &[GlossaryEntry]) -> Result<()> {
        self.lock()?.glossary = entries.to_vec();
        Ok(())
    }
}
