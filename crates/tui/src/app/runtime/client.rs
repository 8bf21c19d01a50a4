use serde::Serialize;
use std::env;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::decoder::{ProtocolEvent, StreamDecoder};
use crate::cli::CliOptions;

const STDOUT_CHUNK_SIZE: usize = 8192;

/// Everything the UI loop hears from the subprocess, in arrival order.
/// `Eof` is sent exactly once, after the final decoder flush.
pub enum RuntimeMessage {
    Event(ProtocolEvent),
    Stderr(String),
    Eof,
}

pub type ClaudeSpawn = (Child, BufWriter<ChildStdin>, Receiver<RuntimeMessage>);
type ClaudeSpawnResult = Result<ClaudeSpawn, Box<dyn std::error::Error>>;

fn split_args(value: &str) -> Vec<String> {
    match shell_words::split(value) {
        Ok(parts) => parts.into_iter().filter(|part| !part.is_empty()).collect(),
        Err(error) => {
            if !cfg!(test) {
                let _ = writeln!(
                    std::io::stderr(),
                    "[clatui] CLATUI_CLAUDE_ARGS parse warning ({error}); falling back to whitespace split"
                );
            }
            value
                .split_whitespace()
                .filter(|part| !part.is_empty())
                .map(|part| part.to_string())
                .collect()
        }
    }
}

/// Chunked stdout reader. The decoder is created here and never leaves this
/// thread; its line buffer dies with the subprocess.
fn spawn_stdout_reader<T: Read + Send + 'static>(stdout: T, tx: Sender<RuntimeMessage>) {
    thread::spawn(move || {
        let mut stdout = stdout;
        let mut decoder = StreamDecoder::new();
        let mut chunk = [0u8; STDOUT_CHUNK_SIZE];
        loop {
            match stdout.read(&mut chunk) {
                Ok(0) => break,
                Ok(read) => {
                    for event in decoder.decode(&chunk[..read]) {
                        if tx.send(RuntimeMessage::Event(event)).is_err() {
                            return;
                        }
                    }
                }
                Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        for event in decoder.flush() {
            if tx.send(RuntimeMessage::Event(event)).is_err() {
                return;
            }
        }
        let _ = tx.send(RuntimeMessage::Eof);
    });
}

fn spawn_stderr_reader<T: Read + Send + 'static>(stderr: T, tx: Sender<RuntimeMessage>) {
    thread::spawn(move || {
        let mut reader = BufReader::new(stderr);
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let trimmed = line.trim_end();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if tx.send(RuntimeMessage::Stderr(trimmed.to_string())).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
}

pub fn spawn_claude(opts: &CliOptions, resume_session: Option<&str>) -> ClaudeSpawnResult {
    let claude_cmd = env::var("CLATUI_CLAUDE_CMD").unwrap_or_else(|_| "claude".to_string());
    let mut claude_args = env::var("CLATUI_CLAUDE_ARGS")
        .map(|value| split_args(&value))
        .unwrap_or_default();
    claude_args.extend(crate::cli::build_claude_args(opts, resume_session));

    let mut child = Command::new(claude_cmd)
        .args(claude_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let child_stdin = BufWriter::new(child.stdin.take().expect("stdin missing"));
    let child_stdout = child.stdout.take().expect("stdout missing");
    let child_stderr = child.stderr.take().expect("stderr missing");
    let (tx, rx) = mpsc::channel::<RuntimeMessage>();
    spawn_stdout_reader(child_stdout, tx.clone());
    spawn_stderr_reader(child_stderr, tx);

    Ok((child, child_stdin, rx))
}

#[derive(Serialize)]
struct UserTurnMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct UserTurn<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    message: UserTurnMessage<'a>,
    session_id: &'a str,
    parent_tool_use_id: Option<()>,
}

fn user_turn_line(session_id: &str, content: &str) -> String {
    let turn = UserTurn {
        kind: "user",
        message: UserTurnMessage {
            role: "user",
            content,
        },
        session_id,
        parent_tool_use_id: None,
    };
    let mut line = serde_json::to_string(&turn).unwrap_or_default();
    line.push('\n');
    line
}

/// One user turn, newline-terminated, on the subprocess stdin.
pub fn send_user_message(
    writer: &mut BufWriter<ChildStdin>,
    session_id: &str,
    content: &str,
) -> std::io::Result<()> {
    writer.write_all(user_turn_line(session_id, content).as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{split_args, user_turn_line};
    use serde_json::{json, Value};

    #[test]
    fn split_args_supports_quoted_values() {
        let args = split_args("claude --append-system-prompt \"be brief\"");
        assert_eq!(args, vec!["claude", "--append-system-prompt", "be brief"]);
    }

    #[test]
    fn split_args_falls_back_when_quotes_are_unbalanced() {
        let args = split_args("claude \"unterminated");
        assert_eq!(args, vec!["claude", "\"unterminated"]);
    }

    #[test]
    fn user_turn_line_matches_wire_shape() {
        let line = user_turn_line("default", "hello");
        assert!(line.ends_with('\n'));
        let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(
            parsed,
            json!({
                "type": "user",
                "message": { "role": "user", "content": "hello" },
                "session_id": "default",
                "parent_tool_use_id": null,
            })
        );
    }
}
