use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::style::prompt_style;
use crate::app::state::InputState;
use crate::app::util::text::{
    cursor_column, text_width, truncate_to_width, window_by_columns, PROMPT_PREFIX,
};

pub(super) struct InputLineLayout {
    pub(super) spans: Vec<Span<'static>>,
    pub(super) cursor_x: u16,
}

/// Lays the composer out in one terminal row. When the cursor column runs
/// past the right edge the whole line (prefix included) is scrolled left by
/// display columns so the cursor stays visible.
pub(super) fn compute_input_line(input: &InputState, width: usize) -> InputLineLayout {
    if width == 0 {
        return InputLineLayout {
            spans: Vec::new(),
            cursor_x: 0,
        };
    }

    let text = input.current();
    let column = cursor_column(&text, input.cursor);
    if column < width {
        let prefix_width = text_width(PROMPT_PREFIX);
        let visible = truncate_to_width(&text, width.saturating_sub(prefix_width));
        return InputLineLayout {
            spans: vec![
                Span::styled(PROMPT_PREFIX, prompt_style()),
                Span::raw(visible),
            ],
            cursor_x: column as u16,
        };
    }

    let offset = column + 1 - width;
    let full = format!("{PROMPT_PREFIX}{text}");
    InputLineLayout {
        spans: vec![Span::raw(window_by_columns(&full, offset, width))],
        cursor_x: (column - offset) as u16,
    }
}

pub(super) fn render_input(f: &mut Frame, area: Rect, input: &InputState) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let layout = compute_input_line(input, area.width as usize);
    f.render_widget(Paragraph::new(Line::from(layout.spans)), area);
    f.set_cursor_position((area.x + layout.cursor_x.min(area.width - 1), area.y));
}

#[cfg(test)]
mod tests {
    use super::compute_input_line;
    use crate::app::state::InputState;

    fn plain_text(layout: &super::InputLineLayout) -> String {
        layout
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn short_input_renders_in_place() {
        let mut input = InputState::default();
        input.set_from("hello");
        let layout = compute_input_line(&input, 40);
        assert_eq!(plain_text(&layout), "> hello");
        assert_eq!(layout.cursor_x, 7);
    }

    #[test]
    fn wide_glyphs_move_the_cursor_two_columns() {
        let mut input = InputState::default();
        input.set_from("안녕");
        input.cursor = 1;
        let layout = compute_input_line(&input, 40);
        assert_eq!(layout.cursor_x, 4);
    }

    #[test]
    fn long_input_scrolls_left_keeping_cursor_at_edge() {
        let mut input = InputState::default();
        input.set_from(&"x".repeat(30));
        let layout = compute_input_line(&input, 10);
        assert_eq!(layout.cursor_x, 9);
        // Nine trailing columns of text; the cursor itself takes the tenth.
        assert_eq!(plain_text(&layout), "x".repeat(9));
    }

    #[test]
    fn zero_width_area_is_a_noop() {
        let input = InputState::default();
        let layout = compute_input_line(&input, 0);
        assert!(layout.spans.is_empty());
        assert_eq!(layout.cursor_x, 0);
    }
}
