use crossterm::event::KeyCode;

use crate::app::state::SessionPickerState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerAction {
    Resume(String),
    StartFresh,
}

/// Applies one keypress to the session picker; `Some` when the picker closed.
pub fn handle_picker_key(picker: &mut SessionPickerState, key: KeyCode) -> Option<PickerAction> {
    match key {
        KeyCode::Up => {
            picker.selected = picker.selected.saturating_sub(1);
            None
        }
        KeyCode::Down => {
            let max_index = picker.session_ids.len().saturating_sub(1);
            picker.selected = usize::min(picker.selected + 1, max_index);
            None
        }
        KeyCode::Home => {
            picker.selected = 0;
            None
        }
        KeyCode::End => {
            picker.selected = picker.session_ids.len().saturating_sub(1);
            None
        }
        KeyCode::Enter => picker
            .session_ids
            .get(picker.selected)
            .cloned()
            .map(PickerAction::Resume)
            .or(Some(PickerAction::StartFresh)),
        KeyCode::Esc => Some(PickerAction::StartFresh),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{handle_picker_key, PickerAction};
    use crate::app::state::SessionPickerState;
    use crossterm::event::KeyCode;

    fn picker() -> SessionPickerState {
        SessionPickerState {
            title: "Resume session".to_string(),
            header: String::new(),
            rows: vec!["row a".to_string(), "row b".to_string()],
            session_ids: vec!["aaa".to_string(), "bbb".to_string()],
            selected: 0,
        }
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut p = picker();
        assert_eq!(handle_picker_key(&mut p, KeyCode::Up), None);
        assert_eq!(p.selected, 0);
        handle_picker_key(&mut p, KeyCode::Down);
        handle_picker_key(&mut p, KeyCode::Down);
        assert_eq!(p.selected, 1);
    }

    #[test]
    fn enter_resumes_the_selected_session() {
        let mut p = picker();
        handle_picker_key(&mut p, KeyCode::Down);
        assert_eq!(
            handle_picker_key(&mut p, KeyCode::Enter),
            Some(PickerAction::Resume("bbb".to_string()))
        );
    }

    #[test]
    fn escape_starts_a_fresh_session() {
        let mut p = picker();
        assert_eq!(
            handle_picker_key(&mut p, KeyCode::Esc),
            Some(PickerAction::StartFresh)
        );
    }

    #[test]
    fn enter_on_empty_picker_falls_back_to_fresh() {
        let mut p = picker();
        p.rows.clear();
        p.session_ids.clear();
        assert_eq!(
            handle_picker_key(&mut p, KeyCode::Enter),
            Some(PickerAction::StartFresh)
        );
    }
}
