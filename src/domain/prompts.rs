//! Prompt templates for LLM calls
//!
//! Provides the fixed extraction prompt and the ask-AI prompt, plus helpers
//! that fill in their placeholders.

/// Default prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// Prompt for turning a transcript into meeting and task JSON
    pub fn extraction() -> &'static str {
        r#"You are an expert at extracting action items from meetings. Analyze the following meeting transcript.

Meeting Transcript:
{transcript}

{context}

Respond with ONLY a JSON object, no commentary, in exactly this shape:
{
  "meeting": {
    "title": "short descriptive title",
    "date": "YYYY-MM-DD or empty string",
    "duration": "e.g. 45 minutes, or empty string",
    "participants": ["Full Name", "..."],
    "summary": "2-4 sentence summary of the meeting"
  },
  "tasks": [
    {
      "description": "specific, actionable task",
      "owner": "person responsible, or Unassigned",
      "dueDate": "YYYY-MM-DD or empty string",
      "type": "action or follow-up",
      "priority": "high, medium or low",
      "followUpWith": "person to follow up with, or null",
      "context": "one sentence of surrounding context, or null"
    }
  ]
}

Use "follow-up" for tasks whose point is to check back with someone else. If there are no action items, return an empty tasks array."#
    }

    /// Prompt for answering a question over stored meetings and tasks
    pub fn ask() -> &'static str {
        r#"You are a helpful assistant for a team's meeting action items. Answer the user's question using only the data below. If the data does not contain the answer, say so.

Meetings and tasks (JSON):
{data}

Conversation so far:
{history}

User question: {question}

Answer concisely in plain text."#
    }

    /// Fill the extraction template
    ///
    /// The transcript goes in last so text inside it is never treated as a placeholder.
    pub fn render_extraction(transcript: &str, context: &str) -> String {
        Self::extraction()
            .replace("{context}", context)
            .replace("{transcript}", transcript)
    }

    /// Fill the ask template
    pub fn render_ask(data: &str, history: &str, question: &str) -> String {
        Self::ask()
            .replace("{question}", question)
            .replace("{history}", history)
            .replace("{data}", data)
    }
}
