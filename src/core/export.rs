//! Transcript export: the one file-format artifact the client produces.
//!
//! `<title>-<YYYY-MM-DD>.txt`, one `SENDER: text` block per message followed
//! by its timestamp, with a blank line between entries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use log::info;

use crate::core::message::Message;

/// Renders the conversation as plain text.
pub fn transcript_body(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(message.sender.label());
        out.push_str(": ");
        out.push_str(&message.text);
        out.push('\n');
        out.push_str(&message.timestamp.to_rfc3339());
        out.push_str("\n\n");
    }
    out
}

/// Builds the export filename for a given day. Path-hostile characters in the
/// title are replaced so the result is always a valid single filename.
pub fn transcript_filename(title: &str, date: NaiveDate) -> String {
    let safe: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            other => other,
        })
        .collect();
    format!("{}-{}.txt", safe, date.format("%Y-%m-%d"))
}

/// Writes the transcript into `dir` and returns the full path.
pub fn write_transcript(title: &str, messages: &[Message], dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(transcript_filename(title, Utc::now().date_naive()));
    fs::write(&path, transcript_body(messages))?;
    info!("Transcript exported to {}", path.display());
    Ok(path)
}
