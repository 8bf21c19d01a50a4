use serde_json::Value;

/// One decoded line of the claude CLI's stream-json output. A single
/// assistant message can fan out into several events, one per content block,
/// in block order. Anything well-formed but unrecognized is preserved as
/// `Unknown`; whether to show it is the consumer's call.
#[derive(Clone, Debug, PartialEq)]
pub enum ProtocolEvent {
    Init {
        session_id: String,
        model: String,
    },
    AssistantText {
        text: String,
    },
    ToolUse {
        tool_name: String,
        tool_use_id: String,
        input: serde_json::Map<String, Value>,
    },
    Result {
        text: String,
        cost_usd: f64,
        is_error: bool,
    },
    Unknown {
        raw: Value,
    },
}

/// Incremental NDJSON decoder for one subprocess stdout. Bytes arrive in
/// arbitrary chunks; a multi-byte UTF-8 sequence split across chunks is held
/// back in `pending` until completed, and the unterminated tail line lives in
/// `buffer` until its newline (or `flush`) arrives. Nothing in here returns
/// an error: the producer is an external process and garbage on the stream
/// must never take the UI down.
#[derive(Default)]
pub struct StreamDecoder {
    pending: Vec<u8>,
    buffer: String,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, chunk: &[u8]) -> Vec<ProtocolEvent> {
        self.absorb(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            parse_line(&line, &mut events);
        }
        events
    }

    /// Call exactly once when the stream ends; handles a final line with no
    /// trailing newline.
    pub fn flush(&mut self) -> Vec<ProtocolEvent> {
        if !self.pending.is_empty() {
            // The stream is over, so a held-back partial sequence can no
            // longer be completed.
            let tail = std::mem::take(&mut self.pending);
            self.buffer.push_str(&String::from_utf8_lossy(&tail));
        }
        let rest = std::mem::take(&mut self.buffer);
        let mut events = Vec::new();
        parse_line(&rest, &mut events);
        events
    }

    fn absorb(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
        let mut bytes = std::mem::take(&mut self.pending);
        loop {
            match std::str::from_utf8(&bytes) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    bytes.clear();
                    break;
                }
                Err(error) => {
                    let valid = error.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&bytes[..valid]));
                    match error.error_len() {
                        Some(skip) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            bytes.drain(..valid + skip);
                        }
                        None => {
                            // Incomplete sequence at the chunk boundary; keep
                            // the tail for the next chunk.
                            bytes.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }
        self.pending = bytes;
    }
}

fn parse_line(line: &str, events: &mut Vec<ProtocolEvent>) {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return;
    }
    let Ok(parsed) = serde_json::from_str::<Value>(trimmed) else {
        // Best-effort streaming: a malformed line is dropped, not an error.
        return;
    };

    match parsed.get("type").and_then(Value::as_str) {
        Some("system") if parsed.get("subtype").and_then(Value::as_str) == Some("init") => {
            events.push(ProtocolEvent::Init {
                session_id: string_field(&parsed, "session_id"),
                model: string_field(&parsed, "model"),
            });
        }
        Some("assistant") => {
            let blocks = parsed
                .get("message")
                .and_then(|message| message.get("content"))
                .and_then(Value::as_array);
            for block in blocks.into_iter().flatten() {
                match block.get("type").and_then(Value::as_str) {
                    Some("text") => events.push(ProtocolEvent::AssistantText {
                        text: string_field(block, "text"),
                    }),
                    Some("tool_use") => events.push(ProtocolEvent::ToolUse {
                        tool_name: string_field(block, "name"),
                        tool_use_id: string_field(block, "id"),
                        input: block
                            .get("input")
                            .and_then(Value::as_object)
                            .cloned()
                            .unwrap_or_default(),
                    }),
                    _ => {}
                }
            }
        }
        Some("result") => {
            events.push(ProtocolEvent::Result {
                text: string_field(&parsed, "result"),
                cost_usd: parsed
                    .get("total_cost_usd")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
                is_error: parsed
                    .get("is_error")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            });
        }
        _ => events.push(ProtocolEvent::Unknown { raw: parsed }),
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
