/// Utility modules
pub mod transcript_file;

pub use transcript_file::{parse_transcript_file, TranscriptFormat};
