/// Row placement for the bottom-of-flow widgets. `natural_input_row` is the
/// row the input line would occupy if the whole transcript fit (it already
/// counts the waiting indicator); when the transcript overflows, everything
/// pins to the bottom of the body area instead.
pub(super) struct BodyLayout {
    pub(super) log_height: u16,
    pub(super) waiting_y: Option<u16>,
    pub(super) bottom_y: u16,
}

pub(super) fn body_layout(
    natural_input_row: usize,
    waiting: bool,
    body_height: u16,
    bottom_height: u16,
) -> BodyLayout {
    let waiting_height = u16::from(waiting);
    let available = body_height.saturating_sub(bottom_height);
    let rows_above = u16::try_from(natural_input_row)
        .unwrap_or(u16::MAX)
        .min(available);
    let log_height = rows_above.saturating_sub(waiting_height);
    BodyLayout {
        log_height,
        waiting_y: waiting.then_some(log_height),
        bottom_y: rows_above,
    }
}
