use serde_json::Value;

use crate::app::util::text::truncate_chars;

const MAX_INPUT_PREVIEW: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatPhase {
    Idle,
    Waiting,
}

/// A `tool_use` event pending user confirmation. `selected` indexes the
/// Allow/Deny options.
pub struct PermissionDialogState {
    pub tool_name: String,
    pub tool_use_id: String,
    pub input: serde_json::Map<String, Value>,
    pub selected: usize,
}

impl PermissionDialogState {
    pub fn new(tool_name: String, tool_use_id: String, input: serde_json::Map<String, Value>) -> Self {
        Self {
            tool_name,
            tool_use_id,
            input,
            selected: 0,
        }
    }

    pub fn input_preview(&self) -> String {
        let rendered = Value::Object(self.input.clone()).to_string();
        truncate_chars(&rendered, MAX_INPUT_PREVIEW)
    }
}

pub struct SessionPickerState {
    pub title: String,
    pub header: String,
    pub rows: Vec<String>,
    pub session_ids: Vec<String>,
    pub selected: usize,
}
