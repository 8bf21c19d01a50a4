mod app;
mod cli;

use crossterm::cursor::Show;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::BufWriter;
use std::process::{Child, ChildStdin};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crate::app::handlers::confirm::{handle_permission_key, PermissionDecision};
use crate::app::handlers::picker::{handle_picker_key, PickerAction};
use crate::app::runtime::{send_user_message, spawn_claude, ProtocolEvent, RuntimeMessage};
use crate::app::sessions::{self, cwd_to_project_dir, ChatMessage, ChatRole, SessionSummary};
use crate::app::state::{ChatPhase, LogKind, PermissionDialogState, SessionPickerState};
use crate::app::util::text::{sanitize_paste, truncate_chars};
use crate::app::view::ui::draw_ui;
use crate::app::AppState;
use crate::cli::{parse_cli_args, CliOptions, ResumeMode};

const MAX_RUNTIME_MESSAGES_PER_TICK: usize = 300;
const MAX_UNKNOWN_PREVIEW: usize = 200;

fn env_truthy(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .as_deref()
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

struct TerminalRestoreGuard;

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = stdout.execute(DisableBracketedPaste);
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.execute(Show);
    }
}

struct RuntimeHandle {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    rx: Receiver<RuntimeMessage>,
}

fn current_project_dir() -> String {
    std::env::current_dir()
        .map(|cwd| cwd_to_project_dir(&cwd.to_string_lossy()))
        .unwrap_or_default()
}

fn apply_event(app: &mut AppState, event: ProtocolEvent) {
    match event {
        ProtocolEvent::Init { session_id, model } => {
            app.push_line(LogKind::Status, format!("[Connected] model: {model}"));
            app.session_id = Some(session_id);
            app.model = Some(model);
        }
        ProtocolEvent::AssistantText { text } => {
            app.push_multiline(LogKind::Assistant, &text);
            app.push_line(LogKind::Space, "");
            app.phase = ChatPhase::Idle;
        }
        ProtocolEvent::ToolUse {
            tool_name,
            tool_use_id,
            input,
        } => {
            app.open_permission_dialog(PermissionDialogState::new(tool_name, tool_use_id, input));
        }
        ProtocolEvent::Result {
            text,
            cost_usd,
            is_error,
        } => {
            if is_error {
                app.push_line(LogKind::Error, format!("[Error] {text}"));
            } else {
                app.push_line(LogKind::Status, format!("[Done] cost: ${cost_usd:.4}"));
            }
            app.push_line(LogKind::Space, "");
            // total_cost_usd on the wire is already cumulative for the session.
            app.total_cost_usd = cost_usd;
            app.phase = ChatPhase::Idle;
        }
        ProtocolEvent::Unknown { raw } => {
            if app.debug_print {
                app.push_line(
                    LogKind::Debug,
                    truncate_chars(&raw.to_string(), MAX_UNKNOWN_PREVIEW),
                );
            }
        }
    }
}

struct DrainOutcome {
    redraw: bool,
    eof: bool,
}

fn process_runtime_messages(app: &mut AppState, rx: &Receiver<RuntimeMessage>) -> DrainOutcome {
    let mut outcome = DrainOutcome {
        redraw: false,
        eof: false,
    };
    let mut processed = 0usize;
    while processed < MAX_RUNTIME_MESSAGES_PER_TICK {
        match rx.try_recv() {
            Ok(RuntimeMessage::Event(event)) => {
                processed += 1;
                apply_event(app, event);
                outcome.redraw = true;
            }
            Ok(RuntimeMessage::Stderr(line)) => {
                processed += 1;
                if app.debug_print {
                    app.push_line(LogKind::Debug, format!("[stderr] {line}"));
                    outcome.redraw = true;
                }
            }
            Ok(RuntimeMessage::Eof) => {
                outcome.eof = true;
                outcome.redraw = true;
                break;
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
    if processed == MAX_RUNTIME_MESSAGES_PER_TICK {
        // Keep the UI responsive under heavy output by yielding each tick.
        outcome.redraw = true;
    }
    outcome
}

fn format_session_updated(value: &str) -> String {
    let trimmed = value.trim_end_matches('Z').replace('T', " ");
    truncate_chars(&trimmed, 19)
}

fn build_session_picker(summaries: &[SessionSummary]) -> SessionPickerState {
    let mut rows = Vec::new();
    let mut session_ids = Vec::new();
    for summary in summaries {
        let updated = format_session_updated(&summary.timestamp);
        let short_id: String = summary.session_id.chars().take(8).collect();
        rows.push(format!(
            "{updated} | {short_id} | {}",
            summary.first_message
        ));
        session_ids.push(summary.session_id.clone());
    }
    SessionPickerState {
        title: "Resume session".to_string(),
        header: "Updated (UTC)       | Session  | First message".to_string(),
        rows,
        session_ids,
        selected: 0,
    }
}

fn replay_history(app: &mut AppState, messages: &[ChatMessage]) {
    for message in messages {
        match message.role {
            ChatRole::User => {
                app.push_multiline(LogKind::User, &format!("> {}", message.text));
            }
            ChatRole::Assistant => {
                app.push_multiline(LogKind::Assistant, &message.text);
            }
        }
        app.push_line(LogKind::Space, "");
    }
}

fn start_runtime(
    app: &mut AppState,
    runtime: &mut Option<RuntimeHandle>,
    opts: &CliOptions,
    resume_session: Option<&str>,
) {
    match spawn_claude(opts, resume_session) {
        Ok((child, stdin, rx)) => {
            *runtime = Some(RuntimeHandle { child, stdin, rx });
        }
        Err(error) => {
            app.push_line(LogKind::Error, format!("failed to start claude: {error}"));
        }
    }
}

fn resume_session(
    app: &mut AppState,
    runtime: &mut Option<RuntimeHandle>,
    opts: &CliOptions,
    session_id: &str,
) {
    match sessions::load_session_history(&current_project_dir(), session_id) {
        Ok(messages) => replay_history(app, &messages),
        Err(error) => {
            app.push_line(LogKind::Error, format!("history load failed: {error}"));
        }
    }
    app.session_id = Some(session_id.to_string());
    let short_id: String = session_id.chars().take(8).collect();
    app.push_line(LogKind::Status, format!("Resume session {short_id}"));
    app.push_line(LogKind::Space, "");
    start_runtime(app, runtime, opts, Some(session_id));
}

fn submit_message(app: &mut AppState, runtime: &mut Option<RuntimeHandle>) {
    let message = app.input.current();
    if message.trim().is_empty() || app.is_waiting() {
        return;
    }
    let Some(rt) = runtime.as_mut() else {
        app.push_line(LogKind::Error, "claude is not running");
        return;
    };
    app.push_line(LogKind::User, format!("> {message}"));
    let session_id = app.session_id.clone().unwrap_or_else(|| "default".to_string());
    match send_user_message(&mut rt.stdin, &session_id, &message) {
        Ok(()) => {
            app.input.record_history(&message);
            app.input.clear();
            app.phase = ChatPhase::Waiting;
            app.scroll_from_bottom = 0;
        }
        Err(error) => {
            app.push_line(LogKind::Error, format!("send error: {error}"));
        }
    }
}

fn handle_key(
    app: &mut AppState,
    runtime: &mut Option<RuntimeHandle>,
    opts: &CliOptions,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return true;
    }

    if app.session_picker.is_some() {
        let action = app
            .session_picker
            .as_mut()
            .and_then(|picker| handle_picker_key(picker, key));
        if let Some(action) = action {
            app.session_picker = None;
            match action {
                PickerAction::Resume(session_id) => {
                    resume_session(app, runtime, opts, &session_id);
                }
                PickerAction::StartFresh => {
                    start_runtime(app, runtime, opts, None);
                }
            }
        }
        return true;
    }

    if app.permission_dialog.is_some() {
        let decision = app
            .permission_dialog
            .as_mut()
            .and_then(|dialog| handle_permission_key(dialog, key));
        if let Some(decision) = decision {
            if let Some(dialog) = app.permission_dialog.take() {
                let line = match decision {
                    PermissionDecision::Allow => format!("[Approved] {}", dialog.tool_name),
                    PermissionDecision::Deny => format!("[Denied] {}", dialog.tool_name),
                };
                app.push_line(LogKind::Status, line);
                if app.debug_print {
                    app.push_line(
                        LogKind::Debug,
                        format!("tool_use_id: {}", dialog.tool_use_id),
                    );
                }
            }
            app.phase = ChatPhase::Waiting;
        }
        return true;
    }

    match (key, modifiers) {
        (KeyCode::Esc, _) => app.should_quit = true,
        (KeyCode::Enter, _) => submit_message(app, runtime),
        (KeyCode::Char('u'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.input.kill_line();
        }
        (KeyCode::Char('k'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.input.kill_to_end();
        }
        (KeyCode::Char('w'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.input.delete_word_back();
        }
        (KeyCode::Char('a'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.input.move_home();
        }
        (KeyCode::Char('e'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.input.move_end();
        }
        (KeyCode::Left, _) => app.input.move_left(),
        (KeyCode::Right, _) => app.input.move_right(),
        (KeyCode::Home, _) => app.input.move_home(),
        (KeyCode::End, _) => app.input.move_end(),
        (KeyCode::Backspace, _) => app.input.backspace(),
        (KeyCode::Delete, _) => app.input.delete(),
        (KeyCode::Up, _) => app.input.history_up(),
        (KeyCode::Down, _) => app.input.history_down(),
        (KeyCode::PageUp, _) => app.scroll_page_up(),
        (KeyCode::PageDown, _) => app.scroll_page_down(),
        (KeyCode::Char(ch), mods)
            if !mods.contains(KeyModifiers::CONTROL) && !mods.contains(KeyModifiers::ALT) =>
        {
            app.input.insert_char(ch);
        }
        _ => return false,
    }
    true
}

fn handle_paste(app: &mut AppState, text: &str) -> bool {
    if app.session_picker.is_some() || app.permission_dialog.is_some() {
        return false;
    }
    let sanitized = sanitize_paste(text);
    // Single-line composer: line breaks inside a paste become spaces.
    let flattened: String = sanitized
        .chars()
        .map(|ch| if ch == '\n' { ' ' } else { ch })
        .collect();
    app.input.insert_str(&flattened);
    true
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    opts: &CliOptions,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let mut app = AppState::default();
    app.debug_print = opts.debug_print || env_truthy("CLATUI_DEBUG");
    let mut runtime: Option<RuntimeHandle> = None;
    let mut exit_status: Option<String> = None;

    app.push_line(LogKind::System, "Welcome to clatui!");
    app.push_line(
        LogKind::System,
        "Type a message and press Enter. Esc or Ctrl+C quits.",
    );
    app.push_line(LogKind::Space, "");

    match &opts.resume {
        ResumeMode::Picker => {
            let summaries = match sessions::list_sessions(&current_project_dir()) {
                Ok(summaries) => summaries,
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => Vec::new(),
                Err(error) => {
                    app.push_line(LogKind::Error, format!("session scan failed: {error}"));
                    Vec::new()
                }
            };
            if summaries.is_empty() {
                app.push_line(LogKind::Status, "No saved sessions found.");
                app.push_line(LogKind::Space, "");
                start_runtime(&mut app, &mut runtime, opts, None);
            } else {
                app.session_picker = Some(build_session_picker(&summaries));
            }
        }
        ResumeMode::Id(session_id) => {
            let session_id = session_id.clone();
            resume_session(&mut app, &mut runtime, opts, &session_id);
        }
        ResumeMode::None => start_runtime(&mut app, &mut runtime, opts, None),
    }

    let mut needs_redraw = true;
    loop {
        if let Some(rt) = runtime.as_mut() {
            let drained = process_runtime_messages(&mut app, &rt.rx);
            if drained.redraw {
                needs_redraw = true;
            }
            if drained.eof {
                // Stream over: the one-time exit notification.
                let status = match rt.child.wait() {
                    Ok(status) => status.to_string(),
                    Err(error) => format!("wait failed: {error}"),
                };
                exit_status = Some(status);
                app.should_quit = true;
            }
        }
        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key(&mut app, &mut runtime, opts, key.code, key.modifiers) {
                        needs_redraw = true;
                    }
                }
                Event::Paste(text) => {
                    if handle_paste(&mut app, &text) {
                        needs_redraw = true;
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }

        if app.update_spinner(Instant::now()) {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| draw_ui(f, &mut app))?;
            needs_redraw = false;
        }
        if app.should_quit {
            break;
        }
    }

    if let Some(rt) = runtime.as_mut() {
        let _ = rt.child.kill();
        let _ = rt.child.wait();
    }
    Ok(exit_status)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = parse_cli_args(std::env::args().skip(1));

    let restore_guard = TerminalRestoreGuard;
    let mut stdout = std::io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    // Deliver multi-line paste as Event::Paste instead of a stream of Enter
    // keypresses.
    let _ = stdout.execute(EnableBracketedPaste);
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &opts);
    drop(restore_guard);

    if let Some(status) = result? {
        println!("claude exited: {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_event, build_session_picker, format_session_updated};
    use crate::app::runtime::ProtocolEvent;
    use crate::app::sessions::SessionSummary;
    use crate::app::state::{ChatPhase, LogKind};
    use crate::app::AppState;
    use serde_json::json;

    #[test]
    fn init_event_records_session_and_model() {
        let mut app = AppState::default();
        apply_event(
            &mut app,
            ProtocolEvent::Init {
                session_id: "abc-123".to_string(),
                model: "m1".to_string(),
            },
        );
        assert_eq!(app.session_id.as_deref(), Some("abc-123"));
        assert_eq!(app.model.as_deref(), Some("m1"));
        assert!(app
            .log
            .iter()
            .any(|line| line.text() == "[Connected] model: m1"));
    }

    #[test]
    fn assistant_text_returns_to_idle() {
        let mut app = AppState::default();
        app.phase = ChatPhase::Waiting;
        apply_event(
            &mut app,
            ProtocolEvent::AssistantText {
                text: "hello\nthere".to_string(),
            },
        );
        assert_eq!(app.phase, ChatPhase::Idle);
        let texts: Vec<&str> = app.log.iter().map(|line| line.text()).collect();
        assert_eq!(texts, vec!["hello", "there", ""]);
    }

    #[test]
    fn tool_use_opens_the_permission_dialog() {
        let mut app = AppState::default();
        app.scroll_from_bottom = 4;
        apply_event(
            &mut app,
            ProtocolEvent::ToolUse {
                tool_name: "bash".to_string(),
                tool_use_id: "tool_1".to_string(),
                input: json!({"command":"ls"}).as_object().cloned().unwrap_or_default(),
            },
        );
        let dialog = app.permission_dialog.as_ref().expect("dialog open");
        assert_eq!(dialog.tool_name, "bash");
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[test]
    fn result_event_reports_cost_or_error() {
        let mut app = AppState::default();
        app.phase = ChatPhase::Waiting;
        apply_event(
            &mut app,
            ProtocolEvent::Result {
                text: String::new(),
                cost_usd: 0.0123,
                is_error: false,
            },
        );
        assert_eq!(app.phase, ChatPhase::Idle);
        assert!(app.log.iter().any(|line| line.text() == "[Done] cost: $0.0123"));

        apply_event(
            &mut app,
            ProtocolEvent::Result {
                text: "boom".to_string(),
                cost_usd: 0.0,
                is_error: true,
            },
        );
        assert!(app
            .log
            .iter()
            .any(|line| line.kind() == LogKind::Error && line.text() == "[Error] boom"));
    }

    #[test]
    fn unknown_events_surface_only_in_debug_mode() {
        let mut app = AppState::default();
        apply_event(
            &mut app,
            ProtocolEvent::Unknown {
                raw: json!({"type":"stream_event"}),
            },
        );
        assert!(app.log.is_empty());

        app.debug_print = true;
        apply_event(
            &mut app,
            ProtocolEvent::Unknown {
                raw: json!({"type":"stream_event"}),
            },
        );
        assert_eq!(app.log.len(), 1);
        assert_eq!(app.log[0].kind(), LogKind::Debug);
    }

    #[test]
    fn session_picker_rows_pair_with_ids() {
        let picker = build_session_picker(&[SessionSummary {
            session_id: "0123456789".to_string(),
            first_message: "fix the bug".to_string(),
            timestamp: "2026-08-01T10:00:00Z".to_string(),
        }]);
        assert_eq!(picker.session_ids, vec!["0123456789".to_string()]);
        assert_eq!(picker.rows.len(), 1);
        assert!(picker.rows[0].starts_with("2026-08-01 10:00:00 | 01234567 | fix the bug"));
    }

    #[test]
    fn session_updated_column_is_fixed_width() {
        assert_eq!(
            format_session_updated("2026-08-01T10:00:00Z"),
            "2026-08-01 10:00:00"
        );
        assert_eq!(
            format_session_updated("2026-08-01T10:00:00.123Z"),
            "2026-08-01 10:00..."
        );
    }
}
