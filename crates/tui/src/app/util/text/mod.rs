use unicode_width::UnicodeWidthChar;

/// Prefix drawn in front of the composer line. Two display columns.
pub const PROMPT_PREFIX: &str = "> ";

pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0).max(1)
}

pub fn text_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Terminal column of the cursor: prompt prefix plus the display width of the
/// first `cursor` code points of `text`. `cursor` is a code-point offset, not
/// a byte offset; wide East-Asian glyphs count two columns.
pub fn cursor_column(text: &str, cursor: usize) -> usize {
    let ahead: usize = text.chars().take(cursor).map(char_width).sum();
    text_width(PROMPT_PREFIX) + ahead
}

/// Number of terminal rows `text` occupies at `width` columns. Explicit
/// newlines start a new segment; an empty segment still occupies one row and
/// a segment of display width `w` occupies `ceil(w / width)` rows.
pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    text.split('\n')
        .map(|segment| {
            let w = text_width(segment);
            w.div_ceil(width).max(1)
        })
        .sum()
}

/// Terminal row the live input line occupies: every already-rendered output
/// line above it, soft-wrapped, plus the transient waiting indicator when
/// shown.
pub fn input_line_row(output_lines: &[String], width: usize, waiting_shown: bool) -> usize {
    let rows: usize = output_lines
        .iter()
        .map(|line| wrapped_line_count(line, width))
        .sum();
    rows + usize::from(waiting_shown)
}

pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for ch in line.chars() {
        let ch_width = char_width(ch);
        if current_width + ch_width > width && !current.is_empty() {
            lines.push(current);
            current = String::new();
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }
    lines.push(current);
    lines
}

/// Slice of `text` bounded by display columns rather than code points, for
/// horizontal viewport scrolling. A wide glyph straddling the left edge is
/// dropped whole rather than split.
pub fn window_by_columns(text: &str, start_cols: usize, width_cols: usize) -> String {
    if width_cols == 0 {
        return String::new();
    }
    let mut col = 0usize;
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = char_width(ch);
        if col < start_cols {
            col += ch_width;
            continue;
        }
        if used + ch_width > width_cols {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = char_width(ch);
        if used + ch_width > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    let take = max.saturating_sub(3);
    let truncated: String = text.chars().take(take).collect();
    format!("{truncated}...")
}

pub fn sanitize_paste(value: &str) -> String {
    let mut out = String::new();
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            // Preserve line breaks for both LF and CR(LF) sources.
            '\r' => {
                if chars.peek().copied() != Some('\n') {
                    out.push('\n');
                }
            }
            // Expand tabs so the terminal doesn't interpret them as cursor jumps.
            '\t' => out.push_str("    "),
            c if c.is_control() && c != '\n' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out
}
