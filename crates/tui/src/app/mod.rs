pub(crate) mod handlers;
pub(crate) mod runtime;
pub(crate) mod sessions;
pub(crate) mod state;
pub(crate) mod util;
pub(crate) mod view;

use std::time::{Duration, Instant};

use crate::app::state::{
    ChatPhase, InputState, LogKind, LogLine, PermissionDialogState, SessionPickerState,
};

pub struct AppState {
    pub log: Vec<LogLine>,
    pub input: InputState,
    pub scroll_from_bottom: usize,
    pub last_log_viewport_height: usize,
    pub phase: ChatPhase,
    pub permission_dialog: Option<PermissionDialogState>,
    pub session_picker: Option<SessionPickerState>,
    pub session_id: Option<String>,
    pub model: Option<String>,
    pub total_cost_usd: f64,
    pub debug_print: bool,
    pub spinner_index: usize,
    pub spinner_last_tick: Instant,
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            input: InputState::default(),
            scroll_from_bottom: 0,
            last_log_viewport_height: 0,
            phase: ChatPhase::Idle,
            permission_dialog: None,
            session_picker: None,
            session_id: None,
            model: None,
            total_cost_usd: 0.0,
            debug_print: false,
            spinner_index: 0,
            spinner_last_tick: Instant::now(),
            should_quit: false,
        }
    }
}

impl AppState {
    pub fn is_waiting(&self) -> bool {
        self.phase == ChatPhase::Waiting
    }

    pub fn push_line(&mut self, kind: LogKind, text: impl Into<String>) {
        self.log.push(LogLine::new(kind, text));
    }

    /// Transcript lines never embed newlines; split here so wrap counting
    /// stays per-row.
    pub fn push_multiline(&mut self, kind: LogKind, text: &str) {
        for line in text.split('\n') {
            self.log.push(LogLine::new(kind, line.trim_end_matches('\r')));
        }
    }

    pub fn open_permission_dialog(&mut self, dialog: PermissionDialogState) {
        self.scroll_from_bottom = 0;
        self.permission_dialog = Some(dialog);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_page_up(&mut self) {
        let page = self.last_log_viewport_height.saturating_sub(1).max(1);
        self.scroll_up(page);
    }

    pub fn scroll_page_down(&mut self) {
        let page = self.last_log_viewport_height.saturating_sub(1).max(1);
        self.scroll_down(page);
    }

    pub fn spinner_frame(&self) -> &'static str {
        const FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];
        FRAMES[self.spinner_index % FRAMES.len()]
    }

    pub fn update_spinner(&mut self, now: Instant) -> bool {
        if !self.is_waiting() {
            self.spinner_index = 0;
            self.spinner_last_tick = now;
            return false;
        }
        if now.duration_since(self.spinner_last_tick) >= Duration::from_millis(120) {
            self.spinner_last_tick = now;
            self.spinner_index = self.spinner_index.saturating_add(1);
            return true;
        }
        false
    }

    pub fn short_session_id(&self) -> Option<String> {
        self.session_id
            .as_deref()
            .map(|id| id.chars().take(8).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::AppState;
    use crate::app::state::{ChatPhase, LogKind};
    use std::time::{Duration, Instant};

    #[test]
    fn push_multiline_splits_on_newlines() {
        let mut app = AppState::default();
        app.push_multiline(LogKind::Assistant, "one\ntwo\r\nthree");
        let texts: Vec<&str> = app.log.iter().map(|line| line.text()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn spinner_only_advances_while_waiting() {
        let mut app = AppState::default();
        let later = Instant::now() + Duration::from_millis(500);
        assert!(!app.update_spinner(later));
        app.phase = ChatPhase::Waiting;
        assert!(app.update_spinner(later + Duration::from_millis(500)));
        assert_eq!(app.spinner_index, 1);
    }

    #[test]
    fn scroll_clamps_at_bottom() {
        let mut app = AppState::default();
        app.scroll_down(5);
        assert_eq!(app.scroll_from_bottom, 0);
        app.scroll_up(3);
        app.scroll_down(1);
        assert_eq!(app.scroll_from_bottom, 2);
    }

    #[test]
    fn short_session_id_truncates() {
        let mut app = AppState::default();
        app.session_id = Some("0123456789abcdef".to_string());
        assert_eq!(app.short_session_id().as_deref(), Some("01234567"));
    }
}
