#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
    System,
    User,
    Assistant,
    Status,
    Debug,
    Space,
    Error,
}

#[derive(Clone, Debug)]
pub struct LogLine {
    kind: LogKind,
    text: String,
}

impl LogLine {
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> LogKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
