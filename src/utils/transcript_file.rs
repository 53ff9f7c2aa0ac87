//! Transcript file utilities
//!
//! Turns exported transcript files (plain text, WebVTT, SRT, JSON) into the
//! plain `Speaker: text` form the extraction prompt expects.

use crate::error::{AppError, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Recognized transcript file formats
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    Text,
    Vtt,
    Srt,
    Json,
}

impl std::fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptFormat::Text => write!(f, "text"),
            TranscriptFormat::Vtt => write!(f, "vtt"),
            TranscriptFormat::Srt => write!(f, "srt"),
            TranscriptFormat::Json => write!(f, "json"),
        }
    }
}

impl TranscriptFormat {
    /// Detect the format from a file name's extension
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" | "md" => Ok(TranscriptFormat::Text),
            "vtt" => Ok(TranscriptFormat::Vtt),
            "srt" => Ok(TranscriptFormat::Srt),
            "json" => Ok(TranscriptFormat::Json),
            _ => Err(AppError::InvalidInput(format!(
                "Unsupported transcript file type: {}",
                filename
            ))),
        }
    }
}

/// Parse file contents into transcript text
///
/// # Returns
/// The cleaned transcript; an error if nothing usable remains
pub fn parse_transcript_file(filename: &str, contents: &str) -> Result<(String, TranscriptFormat)> {
    let format = TranscriptFormat::from_filename(filename)?;
    // Strip a UTF-8 BOM some exporters prepend
    let contents = contents.trim_start_matches('\u{feff}');

    let transcript = match format {
        TranscriptFormat::Text => contents.trim().to_string(),
        TranscriptFormat::Vtt => parse_vtt(contents),
        TranscriptFormat::Srt => parse_srt(contents),
        TranscriptFormat::Json => parse_json(contents)?,
    };

    if transcript.trim().is_empty() {
        return Err(AppError::InvalidInput(format!(
            "No transcript text found in {}",
            filename
        )));
    }

    log::info!(
        "Parsed {} transcript '{}' ({} characters)",
        format,
        filename,
        transcript.len()
    );
    Ok((transcript, format))
}

fn is_timing_line(line: &str) -> bool {
    line.contains("-->")
}

/// Rewrite `<v Speaker>text` as `Speaker: text` and drop other inline tags
fn clean_vtt_cue_line(line: &str) -> String {
    let mut speaker: Option<String> = None;
    let mut text = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) => {
                let tag = &after[..close];
                if speaker.is_none() {
                    if let Some(name) = tag.strip_prefix("v ") {
                        speaker = Some(name.trim().to_string());
                    } else if let Some(classed) = tag.strip_prefix("v.") {
                        // "<v.loud Ana>" carries classes before the name
                        let name = classed.split_once(' ').map(|(_, n)| n).unwrap_or("");
                        speaker = Some(name.trim().to_string());
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                text.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    text.push_str(rest);

    let text = text.trim();
    match speaker {
        Some(name) if !name.is_empty() => format!("{}: {}", name, text),
        _ => text.to_string(),
    }
}

fn parse_vtt(contents: &str) -> String {
    let mut lines = Vec::new();

    for block in contents.replace("\r\n", "\n").split("\n\n") {
        let block_lines: Vec<&str> = block.lines().map(str::trim).collect();
        let first = block_lines.first().copied().unwrap_or("");

        if first.starts_with("WEBVTT")
            || first.starts_with("NOTE")
            || first.starts_with("STYLE")
            || first.starts_with("REGION")
        {
            continue;
        }

        // Cue text follows the timing line; an optional cue id precedes it
        let Some(timing_index) = block_lines.iter().position(|l| is_timing_line(l)) else {
            continue;
        };

        for line in &block_lines[timing_index + 1..] {
            if line.is_empty() {
                continue;
            }
            let cleaned = clean_vtt_cue_line(line);
            if !cleaned.is_empty() {
                lines.push(cleaned);
            }
        }
    }

    lines.join("\n")
}

/// Cue text of each block; the counter and timing line come before it
fn parse_srt(contents: &str) -> String {
    let normalized = contents.replace("\r\n", "\n");
    let mut lines = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in normalized.lines().map(str::trim).chain(std::iter::once("")) {
        if !line.is_empty() {
            block.push(line);
            continue;
        }
        if let Some(timing_index) = block.iter().position(|l| is_timing_line(l)) {
            lines.extend_from_slice(&block[timing_index + 1..]);
        }
        block.clear();
    }

    lines.join("\n")
}

fn segment_line(segment: &Value) -> Option<String> {
    let text = segment.get("text")?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    match segment.get("speaker").and_then(Value::as_str) {
        Some(speaker) if !speaker.trim().is_empty() => {
            Some(format!("{}: {}", speaker.trim(), text))
        }
        _ => Some(text.to_string()),
    }
}

fn parse_json(contents: &str) -> Result<String> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|e| AppError::InvalidInput(format!("Invalid JSON transcript: {}", e)))?;

    if let Some(text) = value.get("transcript").and_then(Value::as_str) {
        return Ok(text.trim().to_string());
    }

    let segments = value
        .as_array()
        .or_else(|| value.get("segments").and_then(Value::as_array))
        .ok_or_else(|| {
            AppError::InvalidInput(
                "JSON transcript needs a 'transcript' string or a list of segments".to_string(),
            )
        })?;

    Ok(segments
        .iter()
        .filter_map(segment_line)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            TranscriptFormat::from_filename("notes.TXT").unwrap(),
            TranscriptFormat::Text
        );
        assert_eq!(
            TranscriptFormat::from_filename("call.vtt").unwrap(),
            TranscriptFormat::Vtt
        );
        assert!(TranscriptFormat::from_filename("call.docx").is_err());
        assert!(TranscriptFormat::from_filename("no_extension").is_err());
    }

    #[test]
    fn test_parse_vtt() {
        let vtt = "WEBVTT\n\nNOTE exported by Teams\n\n1\n00:00:01.000 --> 00:00:04.000\n<v Ana Lopez>I'll send the deck by Friday.</v>\n\n00:00:05.000 --> 00:00:07.000\n<v.loud Bob>Great, <b>thanks</b>.</v>\n";
        let (text, format) = parse_transcript_file("meeting.vtt", vtt).unwrap();
        assert_eq!(format, TranscriptFormat::Vtt);
        assert_eq!(
            text,
            "Ana Lopez: I'll send the deck by Friday.\nBob: Great, thanks."
        );
    }

    #[test]
    fn test_parse_srt() {
        let srt = "1\r\n00:00:01,000 --> 00:00:02,000\r\nHello team.\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nLet's start.\r\n";
        let (text, _) = parse_transcript_file("meeting.srt", srt).unwrap();
        assert_eq!(text, "Hello team.\nLet's start.");
    }

    #[test]
    fn test_parse_srt_keeps_numeric_dialogue() {
        let srt = "1\n00:00:01,000 --> 00:00:02,000\nHow many tickets are open?\n\n\
                   2\n00:00:03,000 --> 00:00:04,000\n42\n\n\
                   3\n00:00:05,000 --> 00:00:06,000\nTarget is\n2024\n";
        let (text, _) = parse_transcript_file("standup.srt", srt).unwrap();
        assert_eq!(text, "How many tickets are open?\n42\nTarget is\n2024");
    }

    #[test]
    fn test_parse_json_variants() {
        let (text, _) =
            parse_transcript_file("a.json", r#"{"transcript": "  Ana: hi  "}"#).unwrap();
        assert_eq!(text, "Ana: hi");

        let (text, _) = parse_transcript_file(
            "b.json",
            r#"[{"speaker": "Ana", "text": "hi"}, {"text": "no speaker"}, {"text": ""}]"#,
        )
        .unwrap();
        assert_eq!(text, "Ana: hi\nno speaker");

        let (text, _) = parse_transcript_file(
            "c.json",
            r#"{"segments": [{"speaker": "Bob", "text": "ok"}]}"#,
        )
        .unwrap();
        assert_eq!(text, "Bob: ok");
    }

    #[test]
    fn test_empty_result_rejected() {
        assert!(matches!(
            parse_transcript_file("empty.vtt", "WEBVTT\n\n"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_transcript_file("bad.json", "{ nope"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bom_is_stripped() {
        let (text, _) = parse_transcript_file("bom.txt", "\u{feff}Ana: hello").unwrap();
        assert_eq!(text, "Ana: hello");
    }
}
