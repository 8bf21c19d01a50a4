use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::style::{dialog_hint_style, dialog_style, muted_style, selected_style};
use crate::app::handlers::confirm::ALLOW_INDEX;
use crate::app::state::{PermissionDialogState, SessionPickerState};
use crate::app::util::text::truncate_to_width;

pub(super) fn permission_lines(dialog: &PermissionDialogState) -> Vec<Line<'static>> {
    let mut option_spans = vec![Span::raw("  ")];
    if dialog.selected == ALLOW_INDEX {
        option_spans.push(Span::styled("[Allow]", selected_style()));
        option_spans.push(Span::raw("  "));
        option_spans.push(Span::raw("[Deny]"));
    } else {
        option_spans.push(Span::raw("[Allow]"));
        option_spans.push(Span::raw("  "));
        option_spans.push(Span::styled("[Deny]", selected_style()));
    }

    vec![
        Line::from(Span::styled(
            format!("Tool: {}", dialog.tool_name),
            dialog_style(),
        )),
        Line::from(Span::styled(
            format!("Input: {}", dialog.input_preview()),
            dialog_style(),
        )),
        Line::from(option_spans),
        Line::from(Span::styled("Allow? (y/n)", dialog_hint_style())),
    ]
}

pub(super) fn render_permission_dialog(
    f: &mut Frame,
    area: Rect,
    dialog: &PermissionDialogState,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let mut lines = permission_lines(dialog);
    lines.truncate(area.height as usize);
    f.render_widget(Paragraph::new(lines), area);
}

pub(super) fn render_session_picker(f: &mut Frame, area: Rect, picker: &SessionPickerState) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let width = area.width as usize;
    let mut lines = vec![
        Line::from(Span::styled(picker.title.clone(), dialog_hint_style())),
        Line::from(Span::styled(
            truncate_to_width(&picker.header, width),
            muted_style(),
        )),
    ];

    let visible_rows = (area.height as usize).saturating_sub(lines.len());
    let start = picker
        .selected
        .saturating_sub(visible_rows.saturating_sub(1));
    for (offset, row) in picker.rows.iter().skip(start).take(visible_rows).enumerate() {
        let index = start + offset;
        let marker = if index == picker.selected { "> " } else { "  " };
        let text = truncate_to_width(&format!("{marker}{row}"), width);
        let line = if index == picker.selected {
            Line::from(Span::styled(text, selected_style()))
        } else {
            Line::from(Span::raw(text))
        };
        lines.push(line);
    }

    f.render_widget(Paragraph::new(lines), area);
}
