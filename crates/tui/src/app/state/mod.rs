mod input;
mod log;
mod ui;

pub(crate) use input::InputState;
pub(crate) use log::{LogKind, LogLine};
pub(crate) use ui::{ChatPhase, PermissionDialogState, SessionPickerState};
