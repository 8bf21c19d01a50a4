mod dialogs;
mod input;
mod layout;
mod log;
mod status;
mod style;

use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use self::dialogs::{permission_lines, render_permission_dialog, render_session_picker};
use self::input::render_input;
use self::layout::body_layout;
use self::log::wrap_log_lines;
use self::status::{build_status_line, build_waiting_line};
use crate::app::util::text::input_line_row;
use crate::app::AppState;

const FOOTER_HEIGHT: u16 = 1;

pub fn draw_ui(f: &mut Frame, app: &mut AppState) {
    let size = f.area();
    if size.width == 0 || size.height == 0 {
        return;
    }

    // Paragraph does not overwrite every cell; clear explicitly so shorter
    // lines don't leave ghost characters behind when scrolling.
    f.render_widget(Clear, size);

    let width = size.width as usize;
    let body_height = size.height.saturating_sub(FOOTER_HEIGHT);
    let footer_area = Rect {
        x: size.x,
        y: size.y + body_height,
        width: size.width,
        height: size.height - body_height,
    };
    if footer_area.height > 0 {
        let line = build_status_line(app, width);
        f.render_widget(Paragraph::new(Text::from(vec![line])), footer_area);
    }

    if let Some(picker) = app.session_picker.as_ref() {
        let picker_area = Rect {
            x: size.x,
            y: size.y,
            width: size.width,
            height: body_height,
        };
        render_session_picker(f, picker_area, picker);
        return;
    }

    let waiting = app.is_waiting();
    let bottom_height = match app.permission_dialog.as_ref() {
        Some(dialog) => permission_lines(dialog).len() as u16,
        None => 1,
    };

    let output_rows: Vec<String> = app
        .log
        .iter()
        .map(|line| line.text().to_string())
        .collect();
    let natural_input_row = input_line_row(&output_rows, width, waiting);
    let body = body_layout(natural_input_row, waiting, body_height, bottom_height);

    // Transcript, bottom-anchored inside its slot when it overflows.
    let wrapped = wrap_log_lines(app, width);
    let log_height = body.log_height as usize;
    app.last_log_viewport_height = log_height;
    let max_scroll = wrapped.len().saturating_sub(log_height);
    if app.scroll_from_bottom > max_scroll {
        app.scroll_from_bottom = max_scroll;
    }
    let visible_end = wrapped.len().saturating_sub(app.scroll_from_bottom);
    let visible_start = visible_end.saturating_sub(log_height);
    if body.log_height > 0 {
        let log_area = Rect {
            x: size.x,
            y: size.y,
            width: size.width,
            height: body.log_height,
        };
        let visible: Vec<_> = wrapped[visible_start..visible_end].to_vec();
        f.render_widget(Paragraph::new(Text::from(visible)), log_area);
    }

    if let Some(waiting_y) = body.waiting_y {
        let waiting_area = Rect {
            x: size.x,
            y: size.y + waiting_y,
            width: size.width,
            height: 1,
        };
        f.render_widget(
            Paragraph::new(Text::from(vec![build_waiting_line(app)])),
            waiting_area,
        );
    }

    let bottom_area = Rect {
        x: size.x,
        y: size.y + body.bottom_y,
        width: size.width,
        height: bottom_height.min(body_height.saturating_sub(body.bottom_y)),
    };
    match app.permission_dialog.as_ref() {
        Some(dialog) => render_permission_dialog(f, bottom_area, dialog),
        None => render_input(f, bottom_area, &app.input),
    }
}
