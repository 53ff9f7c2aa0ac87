//! Parsing of the model's extraction response
//!
//! The model is asked for bare JSON but routinely wraps it in markdown fences
//! or a sentence of preamble. Everything from the first `{` to the last `}`
//! is taken as the candidate object.

use crate::domain::glossary::Glossary;
use crate::domain::models::{Meeting, Priority, Task, TaskType};
use crate::error::{AppError, Result};
use serde::Deserialize;

pub const DEFAULT_TITLE: &str = "Untitled meeting";
pub const DEFAULT_OWNER: &str = "Unassigned";

/// Meeting block as the model returns it
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractedMeeting {
    pub title: Option<String>,
    pub date: Option<String>,
    pub duration: Option<String>,
    pub participants: Option<Vec<String>>,
    pub summary: Option<String>,
}

/// Task as the model returns it; enum-like fields stay loose strings
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractedTask {
    pub description: Option<String>,
    pub owner: Option<String>,
    pub due_date: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    pub priority: Option<String>,
    pub follow_up_with: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Extraction {
    pub meeting: Option<ExtractedMeeting>,
    pub tasks: Option<Vec<ExtractedTask>>,
}

/// Metadata supplied alongside the transcript; wins over the model's guesses
#[derive(Debug, Clone, Default)]
pub struct TranscriptMetadata {
    pub title: Option<String>,
    pub date: Option<String>,
    pub note_id: Option<String>,
}

/// Slice from the first `{` to the last `}`, if both exist in that order
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse raw model output into an [`Extraction`]
pub fn parse_extraction(raw: &str) -> Result<Extraction> {
    let block = extract_json_block(raw).ok_or_else(|| AppError::ExtractionParse {
        message: "no JSON object found in model response".to_string(),
        raw: raw.to_string(),
    })?;

    serde_json::from_str(block).map_err(|e| AppError::ExtractionParse {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
}

impl Extraction {
    /// Turn the parsed response into unsaved records
    ///
    /// Tasks carry `meeting_id` 0 until the store assigns the real one.
    pub fn into_records(
        self,
        metadata: &TranscriptMetadata,
        glossary: &Glossary,
        today: &str,
    ) -> (Meeting, Vec<Task>) {
        let extracted = self.meeting.unwrap_or_default();

        let title = non_blank(metadata.title.clone())
            .or_else(|| non_blank(extracted.title))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let date = non_blank(metadata.date.clone())
            .or_else(|| non_blank(extracted.date))
            .unwrap_or_else(|| today.to_string());

        let mut participants: Vec<String> = Vec::new();
        for name in extracted.participants.unwrap_or_default() {
            if name.trim().is_empty() {
                continue;
            }
            let resolved = glossary.resolve(&name);
            if !participants.contains(&resolved) {
                participants.push(resolved);
            }
        }

        let mut meeting = Meeting::new(title, date);
        meeting.duration = non_blank(extracted.duration).unwrap_or_default();
        meeting.participants = participants;
        meeting.summary = non_blank(extracted.summary).unwrap_or_default();
        meeting.note_id = non_blank(metadata.note_id.clone());

        let tasks = self
            .tasks
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| {
                let description = non_blank(raw.description)?;
                let owner = non_blank(raw.owner)
                    .map(|o| glossary.resolve(&o))
                    .unwrap_or_else(|| DEFAULT_OWNER.to_string());

                let mut task = Task::new(description, owner);
                task.due_date = non_blank(raw.due_date).unwrap_or_default();
                task.task_type = raw
                    .task_type
                    .and_then(|t| t.parse::<TaskType>().ok())
                    .unwrap_or_default();
                task.priority = raw
                    .priority
                    .and_then(|p| p.parse::<Priority>().ok())
                    .unwrap_or_default();
                task.follow_up_with = non_blank(raw.follow_up_with).map(|p| glossary.resolve(&p));
                task.context = non_blank(raw.context);
                Some(task)
            })
            .collect();

        (meeting, tasks)
    }
}
