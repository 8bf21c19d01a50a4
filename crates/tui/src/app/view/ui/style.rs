use ratatui::style::{Color, Modifier, Style};

use crate::app::state::LogKind;

pub(super) fn style_for(kind: LogKind) -> Style {
    match kind {
        LogKind::System => Style::default().fg(Color::Cyan),
        LogKind::User => Style::default().fg(Color::Green),
        LogKind::Assistant => Style::default().fg(Color::White),
        LogKind::Status => Style::default().fg(Color::Blue),
        LogKind::Debug => Style::default().add_modifier(Modifier::DIM),
        LogKind::Space => Style::default(),
        LogKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

pub(super) fn prompt_style() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

pub(super) fn waiting_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub(super) fn dialog_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub(super) fn dialog_hint_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

pub(super) fn selected_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub(super) fn muted_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}
