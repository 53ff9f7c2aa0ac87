/// Domain models for Transcript Tasks
///
/// These models represent core business entities and are storage-agnostic.
/// Field names are camelCase on the wire to match what the board client reads.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kanban column a task sits in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "todo"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!("unknown task status: {}", s)),
        }
    }
}

/// Whether a task is the owner's own work or a nudge to someone else
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TaskType {
    #[default]
    #[serde(rename = "action")]
    Action,
    #[serde(rename = "follow-up", alias = "follow_up", alias = "followup")]
    FollowUp,
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskType::Action => write!(f, "action"),
            TaskType::FollowUp => write!(f, "follow-up"),
        }
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "action" => Ok(TaskType::Action),
            "follow-up" | "follow_up" | "followup" => Ok(TaskType::FollowUp),
            _ => Err(format!("unknown task type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("unknown priority: {}", s)),
        }
    }
}

/// Represents a processed meeting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: Option<i64>,
    pub title: String,
    pub date: String,
    pub duration: String,
    pub participants: Vec<String>,
    pub summary: String,
    pub note_id: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl Meeting {
    /// Creates a new, not yet stored, meeting
    pub fn new(title: String, date: String) -> Self {
        Self {
            id: None,
            title,
            date,
            duration: String::new(),
            participants: Vec::new(),
            summary: String::new(),
            note_id: None,
            processed_at: Utc::now(),
        }
    }
}

/// Represents an action item extracted from a meeting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<i64>,
    /// Not enforced: the meeting may already have been evicted.
    pub meeting_id: i64,
    pub description: String,
    pub owner: String,
    pub due_date: String,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub priority: Priority,
    pub follow_up_with: Option<String>,
    pub context: Option<String>,
}

impl Task {
    /// Creates a new task in the initial `todo` column
    pub fn new(description: String, owner: String) -> Self {
        Self {
            id: None,
            meeting_id: 0,
            description,
            owner,
            due_date: String::new(),
            status: TaskStatus::Todo,
            task_type: TaskType::Action,
            priority: Priority::Medium,
            follow_up_with: None,
            context: None,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(owner) = &update.owner {
            self.owner = owner.clone();
        }
        if let Some(due_date) = &update.due_date {
            self.due_date = due_date.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
    }
}

/// Fields a client may change on an existing task
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub owner: Option<String>,
    pub due_date: Option<String>,
    pub description: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.owner.is_none()
            && self.due_date.is_none()
            && self.description.is_none()
    }
}

/// A canonical participant name and the spellings that refer to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryEntry {
    pub canonical: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}
