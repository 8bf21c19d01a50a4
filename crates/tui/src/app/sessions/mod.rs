use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::app::util::text::truncate_chars;

const SUMMARY_SCAN_LINES: usize = 10;
const SUMMARY_PREVIEW_CHARS: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: String,
    pub first_message: String,
    pub timestamp: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// The session store keys project directories by the working directory with
/// path separators flattened to dashes.
pub fn cwd_to_project_dir(cwd: &str) -> String {
    cwd.replace(['/', '\\'], "-")
}

pub fn sessions_root(project_dir: &str) -> Option<PathBuf> {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(
        PathBuf::from(home)
            .join(".claude")
            .join("projects")
            .join(project_dir),
    )
}

/// Message content is either a plain string or an array of `{type, text}`
/// blocks; anything else renders empty.
fn message_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect(),
        _ => String::new(),
    }
}

fn record_content<'a>(record: &'a Value, expected_type: &str) -> Option<&'a Value> {
    if record.get("type").and_then(Value::as_str) != Some(expected_type) {
        return None;
    }
    record.get("message").and_then(|message| message.get("content"))
}

/// First user message of a session, flattened to one preview line. Records
/// that fail to parse are skipped, same as on the live stream.
pub fn parse_session_summary(session_id: &str, lines: &[String]) -> Option<SessionSummary> {
    for line in lines {
        let Ok(record) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        let Some(content) = record_content(&record, "user") else {
            continue;
        };
        let text = message_text(content);
        if text.is_empty() {
            continue;
        }
        let first_message = truncate_chars(&text.replace('\n', " "), SUMMARY_PREVIEW_CHARS + 3);
        let timestamp = record
            .get("timestamp")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Some(SessionSummary {
            session_id: session_id.to_string(),
            first_message,
            timestamp,
        });
    }
    None
}

pub fn parse_session_history(lines: impl IntoIterator<Item = String>) -> Vec<ChatMessage> {
    let mut messages = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<Value>(&line) else {
            continue;
        };
        if let Some(content) = record_content(&record, "user") {
            let text = message_text(content);
            if !text.is_empty() {
                messages.push(ChatMessage {
                    role: ChatRole::User,
                    text,
                });
            }
        } else if let Some(content) = record_content(&record, "assistant") {
            let text: String = content
                .as_array()
                .into_iter()
                .flatten()
                .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect();
            if !text.is_empty() {
                messages.push(ChatMessage {
                    role: ChatRole::Assistant,
                    text,
                });
            }
        }
    }
    messages
}

pub fn load_session_history(project_dir: &str, session_id: &str) -> std::io::Result<Vec<ChatMessage>> {
    let root = sessions_root(project_dir).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not set")
    })?;
    let file = File::open(root.join(format!("{session_id}.jsonl")))?;
    let lines = BufReader::new(file).lines().collect::<Result<Vec<_>, _>>()?;
    Ok(parse_session_history(lines))
}

/// Scan the project's session files, newest first. The first user message is
/// always near the top of a file, so only the leading lines are read.
pub fn list_sessions(project_dir: &str) -> std::io::Result<Vec<SessionSummary>> {
    let root = sessions_root(project_dir).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not set")
    })?;
    let mut summaries = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        let Some(session_id) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(".jsonl"))
        else {
            continue;
        };
        let Ok(file) = File::open(&path) else {
            continue;
        };
        let lines: Vec<String> = BufReader::new(file)
            .lines()
            .take(SUMMARY_SCAN_LINES)
            .map_while(Result::ok)
            .collect();
        if let Some(summary) = parse_session_summary(session_id, &lines) {
            summaries.push(summary);
        }
    }
    // ISO-8601 timestamps sort lexicographically; newest first.
    summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::{
        cwd_to_project_dir, parse_session_history, parse_session_summary, ChatRole,
    };

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn cwd_flattens_path_separators() {
        assert_eq!(cwd_to_project_dir("/home/user/proj"), "-home-user-proj");
    }

    #[test]
    fn summary_takes_first_user_message() {
        let summary = parse_session_summary(
            "abc",
            &lines(&[
                r#"{"type":"summary","summary":"old"}"#,
                r#"{"type":"user","message":{"role":"user","content":"fix the bug"},"timestamp":"2026-08-01T10:00:00Z"}"#,
            ]),
        )
        .unwrap();
        assert_eq!(summary.session_id, "abc");
        assert_eq!(summary.first_message, "fix the bug");
        assert_eq!(summary.timestamp, "2026-08-01T10:00:00Z");
    }

    #[test]
    fn summary_joins_block_content_and_flattens_newlines() {
        let summary = parse_session_summary(
            "abc",
            &lines(&[
                r#"{"type":"user","message":{"content":[{"type":"text","text":"line one"},{"type":"text","text":"\nline two"}]},"timestamp":"t"}"#,
            ]),
        )
        .unwrap();
        assert_eq!(summary.first_message, "line one line two");
    }

    #[test]
    fn summary_truncates_long_messages() {
        let long = "x".repeat(80);
        let record = format!(
            r#"{{"type":"user","message":{{"content":"{long}"}},"timestamp":"t"}}"#
        );
        let summary = parse_session_summary("abc", &lines(&[record.as_str()])).unwrap();
        assert_eq!(summary.first_message.chars().count(), 53);
        assert!(summary.first_message.ends_with("..."));
    }

    #[test]
    fn summary_skips_malformed_lines_and_may_find_none() {
        assert_eq!(
            parse_session_summary("abc", &lines(&["not json", r#"{"type":"assistant"}"#])),
            None
        );
    }

    #[test]
    fn history_replays_user_and_assistant_turns() {
        let messages = parse_session_history(lines(&[
            r#"{"type":"user","message":{"content":"hello"}}"#,
            "",
            "broken line",
            r#"{"type":"assistant","message":{"content":[{"type":"text","text":"hi "},{"type":"tool_use","name":"bash"},{"type":"text","text":"there"}]}}"#,
        ]));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].text, "hello");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].text, "hi there");
    }

    #[test]
    fn history_drops_assistant_records_without_text() {
        let messages = parse_session_history(lines(&[
            r#"{"type":"assistant","message":{"content":[{"type":"tool_use","name":"bash"}]}}"#,
        ]));
        assert!(messages.is_empty());
    }
}
