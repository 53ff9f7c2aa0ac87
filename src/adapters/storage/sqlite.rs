/// SQLite storage adapter
///
/// Implements StoragePort for SQLite database operations.
use crate::domain::models::{GlossaryEntry, Meeting, Task, TaskUpdate};
use crate::error::{AppError, Result};
use crate::ports::storage::{StorageLimits, StoragePort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

const TASK_COLUMNS: &str = "id, meeting_id, description, owner, due_date, status, task_type,
     priority, follow_up_with, context";

/// SQLite storage implementation
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
    limits: StorageLimits,
}

fn conversion_error(
    index: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, err.into())
}

fn meeting_from_row(row: &Row<'_>) -> rusqlite::Result<Meeting> {
    let participants: String = row.get(4)?;
    let processed_at: String = row.get(7)?;

    Ok(Meeting {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        date: row.get(2)?,
        duration: row.get(3)?,
        participants: serde_json::from_str(&participants).map_err(|e| conversion_error(4, e))?,
        summary: row.get(5)?,
        note_id: row.get(6)?,
        processed_at: DateTime::parse_from_rfc3339(&processed_at)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| conversion_error(7, e))?,
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status: String = row.get(5)?;
    let task_type: String = row.get(6)?;
    let priority: String = row.get(7)?;

    Ok(Task {
        id: Some(row.get(0)?),
        meeting_id: row.get(1)?,
        description: row.get(2)?,
        owner: row.get(3)?,
        due_date: row.get(4)?,
        status: status.parse().map_err(|e: String| conversion_error(5, e))?,
        task_type: task_type.parse().map_err(|e: String| conversion_error(6, e))?,
        priority: priority.parse().map_err(|e: String| conversion_error(7, e))?,
        follow_up_with: row.get(8)?,
        context: row.get(9)?,
    })
}

fn select_task(conn: &Connection, id: i64) -> rusqlite::Result<Option<Task>> {
    conn.query_row(
        &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
        params![id],
        task_from_row,
    )
    .optional()
}

impl SqliteStorage {
    /// Create a new SQLite storage with the given database path
    pub fn new(db_path: PathBuf) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            limits: StorageLimits::default(),
        })
    }

    /// Override the capacity caps (builder pattern)
    pub fn with_limits(mut self, limits: StorageLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Run database migrations
    pub fn run_migrations(&self) -> Result<()> {
        use rusqlite_migration::{Migrations, M};

        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../../migrations/001_initial.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AppError::Storage(format!("connection lock poisoned: {}", e)))
    }
}

#[async_trait]
impl StoragePort for SqliteStorage {
    async fn save_extraction(
        &self,
        meeting: &Meeting,
        tasks: &[Task],
    ) -> Result<(Meeting, Vec<Task>)> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO meetings (title, date, duration, participants, summary, note_id, processed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                meeting.title,
                meeting.date,
                meeting.duration,
                serde_json::to_string(&meeting.participants)?,
                meeting.summary,
                meeting.note_id,
                meeting.processed_at.to_rfc3339(),
            ],
        )?;
        let meeting_id = tx.last_insert_rowid();

        let mut stored_meeting = meeting.clone();
        stored_meeting.id = Some(meeting_id);

        let mut stored_tasks = Vec::with_capacity(tasks.len());
        for task in tasks {
            tx.execute(
                "INSERT INTO tasks (meeting_id, description, owner, due_date, status, task_type,
                                    priority, follow_up_with, context)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    meeting_id,
                    task.description,
                    task.owner,
                    task.due_date,
                    task.status.to_string(),
                    task.task_type.to_string(),
                    task.priority.to_string(),
                    task.follow_up_with,
                    task.context,
                ],
            )?;

            let mut t = task.clone();
            t.id = Some(tx.last_insert_rowid());
            t.meeting_id = meeting_id;
            stored_tasks.push(t);
        }

        tx.execute(
            "DELETE FROM meetings WHERE id NOT IN
             (SELECT id FROM meetings ORDER BY id DESC LIMIT ?1)",
            params![self.limits.max_meetings as i64],
        )?;
        tx.execute(
            "DELETE FROM tasks WHERE id NOT IN
             (SELECT id FROM tasks ORDER BY id DESC LIMIT ?1)",
            params![self.limits.max_tasks as i64],
        )?;

        tx.commit()?;
        Ok((stored_meeting, stored_tasks))
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, date, duration, participants, summary, note_id, processed_at
             FROM meetings ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], meeting_from_row)?;

        let mut meetings = Vec::new();
        for meeting_result in rows {
            meetings.push(meeting_result?);
        }

        Ok(meetings)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks ORDER BY id ASC",
            TASK_COLUMNS
        ))?;

        let rows = stmt.query_map([], task_from_row)?;

        let mut tasks = Vec::new();
        for task_result in rows {
            tasks.push(task_result?);
        }

        Ok(tasks)
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.lock()?;
        Ok(select_task(&conn, id)?)
    }

    async fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Task> {
        // Read and write under one lock so concurrent patches to different
        // fields both land
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut task =
            select_task(&tx, id)?.ok_or_else(|| AppError::NotFound(format!("task {}", id)))?;
        task.apply(update);

        tx.execute(
            "UPDATE tasks SET description = ?1, owner = ?2, due_date = ?3, status = ?4, priority = ?5
             WHERE id = ?6",
            params![
                task.description,
                task.owner,
                task.due_date,
                task.status.to_string(),
                task.priority.to_string(),
                id,
            ],
        )?;

        tx.commit()?;
        Ok(task)
    }

    async fn get_glossary(&self) -> Result<Vec<GlossaryEntry>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT canonical, aliases FROM glossary ORDER BY position ASC")?;

        let rows = stmt.query_map([], |row| {
            let aliases: String = row.get(1)?;
            Ok(GlossaryEntry {
                canonical: row.get(0)?,
                aliases: serde_json::from_str(&aliases).map_err(|e| conversion_error(1, e))?,
            })
        })?;

        let mut entries = Vec::new();
        for entry_result in rows {
            entries.push(entry_result?);
        }

        Ok(entries)
    }

    async fn save_glossary(&self, entries: &[GlossaryEntry]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM glossary", [])?;
        for (position, entry) in entries.iter().enumerate() {
            tx.execute(
                "INSERT INTO glossary (position, canonical, aliases) VALUES (?1, ?2, ?3)",
                params![
                    position as i64,
                    entry.canonical,
                    serde_json::to_string(&entry.aliases)?,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Priority, TaskStatus, TaskType};
    use tempfile::tempdir;

    fn open(path: PathBuf) -> SqliteStorage {
        let storage = SqliteStorage::new(path).unwrap();
        storage.run_migrations().unwrap();
        storage
    }

    fn sample_meeting(title: &str) -> Meeting {
        let mut meeting = Meeting::new(title.to_string(), "2024-02-02".to_string());
        meeting.participants = vec!["Ana".to_string(), "Robert".to_string()];
        meeting.note_id = Some("note-1".to_string());
        meeting
    }

    fn sample_task(description: &str) -> Task {
        let mut task = Task::new(description.to_string(), "Ana".to_string());
        task.task_type = TaskType::FollowUp;
        task.priority = Priority::High;
        task.follow_up_with = Some("Robert".to_string());
        task
    }

    #[tokio::test]
    async fn test_save_and_list() {
        let dir = tempdir().unwrap();
        let storage = open(dir.path().join("tasks.db"));

        let (meeting, tasks) = storage
            .save_extraction(&sample_meeting("Planning"), &[sample_task("Send notes")])
            .await
            .unwrap();

        let meetings = storage.list_meetings().await.unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0], meeting);

        let stored = storage.list_tasks().await.unwrap();
        assert_eq!(stored, tasks);
        assert_eq!(stored[0].meeting_id, meeting.id.unwrap());
        assert_eq!(stored[0].task_type, TaskType::FollowUp);
    }

    #[tokio::test]
    async fn test_caps_enforced_in_write_path() {
        let dir = tempdir().unwrap();
        let storage = open(dir.path().join("tasks.db")).with_limits(StorageLimits {
            max_meetings: 2,
            max_tasks: 3,
        });

        for i in 0..3 {
            storage
                .save_extraction(
                    &sample_meeting(&format!("m{}", i)),
                    &[sample_task("a"), sample_task("b")],
                )
                .await
                .unwrap();
        }

        let titles: Vec<String> = storage
            .list_meetings()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["m1", "m2"]);
        assert_eq!(storage.list_tasks().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.db");

        {
            let storage = open(path.clone());
            storage
                .save_extraction(&sample_meeting("Retro"), &[sample_task("Fix CI")])
                .await
                .unwrap();
            storage
                .save_glossary(&[GlossaryEntry {
                    canonical: "Robert".to_string(),
                    aliases: vec!["Bob".to_string()],
                }])
                .await
                .unwrap();
        }

        let storage = open(path);
        assert_eq!(storage.list_meetings().await.unwrap()[0].title, "Retro");
        assert_eq!(storage.list_tasks().await.unwrap()[0].description, "Fix CI");
        assert_eq!(storage.get_glossary().await.unwrap()[0].aliases, vec!["Bob"]);
    }

    #[tokio::test]
    async fn test_update_task() {
        let dir = tempdir().unwrap();
        let storage = open(dir.path().join("tasks.db"));
        let (_, tasks) = storage
            .save_extraction(&sample_meeting("Planning"), &[sample_task("Send notes")])
            .await
            .unwrap();
        let id = tasks[0].id.unwrap();

        let update = TaskUpdate {
            status: Some(TaskStatus::InProgress),
            owner: Some("Robert".to_string()),
            ..Default::default()
        };
        let updated = storage.update_task(id, &update).await.unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);

        let reloaded = storage.get_task(id).await.unwrap().unwrap();
        assert_eq!(reloaded.owner, "Robert");
        assert_eq!(reloaded.status, TaskStatus::InProgress);

        assert!(matches!(
            storage.update_task(id + 100, &update).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_to_different_fields_both_land() {
        let dir = tempdir().unwrap();
        let storage = std::sync::Arc::new(open(dir.path().join("tasks.db")));
        let tasks: Vec<Task> = (0..100).map(|i| sample_task(&format!("Task {}", i))).collect();
        let (_, stored) = storage
            .save_extraction(&sample_meeting("Standup"), &tasks)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for task in &stored {
            let id = task.id.unwrap();
            let status_store = std::sync::Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                let update = TaskUpdate {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                };
                status_store.update_task(id, &update).await
            }));
            let priority_store = std::sync::Arc::clone(&storage);
            handles.push(tokio::spawn(async move {
                let update = TaskUpdate {
                    priority: Some(Priority::Low),
                    ..Default::default()
                };
                priority_store.update_task(id, &update).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        for task in storage.list_tasks().await.unwrap() {
            assert_eq!(task.status, TaskStatus::Done, "status lost on {:?}", task.id);
            assert_eq!(task.priority, Priority::Low, "priority lost on {:?}", task.id);
        }
    }
}
