use ratatui::text::{Line, Span};

use super::style::style_for;
use crate::app::util::text::wrap_line;
use crate::app::AppState;

/// Soft-wraps the whole transcript to `width` columns, one `Line` per
/// terminal row.
pub(super) fn wrap_log_lines(app: &AppState, width: usize) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    for line in &app.log {
        let style = style_for(line.kind());
        for piece in wrap_line(line.text(), width) {
            out.push(Line::from(Span::styled(piece, style)));
        }
    }
    out
}
