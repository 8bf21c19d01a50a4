use ratatui::text::{Line, Span};

use super::style::{muted_style, waiting_style};
use crate::app::util::text::truncate_to_width;
use crate::app::AppState;

pub(super) fn build_waiting_line(app: &AppState) -> Line<'static> {
    Line::from(Span::styled(
        format!("{} Thinking...", app.spinner_frame()),
        waiting_style(),
    ))
}

pub(super) fn build_status_line(app: &AppState, width: usize) -> Line<'static> {
    let mut segments = Vec::new();
    segments.push(format!("model: {}", app.model.as_deref().unwrap_or("-")));
    if let Some(short_id) = app.short_session_id() {
        segments.push(format!("session: {short_id}"));
    }
    if app.total_cost_usd > 0.0 {
        segments.push(format!("cost: ${:.4}", app.total_cost_usd));
    }
    segments.push("PgUp/PgDn scroll".to_string());
    segments.push("Ctrl+C quit".to_string());
    let status_text = truncate_to_width(&segments.join("  •  "), width);
    Line::from(Span::styled(status_text, muted_style()))
}

#[cfg(test)]
mod tests {
    use super::build_status_line;
    use crate::app::AppState;

    fn line_text(line: &ratatui::text::Line) -> String {
        line.spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn status_line_reports_model_session_and_cost() {
        let mut app = AppState::default();
        app.model = Some("m1".to_string());
        app.session_id = Some("abcdef012345".to_string());
        app.total_cost_usd = 0.0123;
        let text = line_text(&build_status_line(&app, 200));
        assert!(text.contains("model: m1"));
        assert!(text.contains("session: abcdef01"));
        assert!(text.contains("cost: $0.0123"));
    }

    #[test]
    fn status_line_is_clipped_to_width() {
        let app = AppState::default();
        let text = line_text(&build_status_line(&app, 10));
        assert!(text.chars().count() <= 10);
    }
}
