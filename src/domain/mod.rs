/// Domain layer - core business models
///
/// These models are storage-agnostic and represent core business entities.
pub mod extraction;
pub mod glossary;
pub mod models;
pub mod prompts;

pub use extraction::{parse_extraction, Extraction, TranscriptMetadata};
pub use glossary::Glossary;
pub use models::{
    GlossaryEntry, Meeting, Priority, Task, TaskStatus, TaskType, TaskUpdate,
};
pub use prompts::PromptTemplates;
