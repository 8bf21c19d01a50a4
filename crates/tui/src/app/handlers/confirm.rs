use crossterm::event::KeyCode;

use crate::app::state::PermissionDialogState;

pub const ALLOW_INDEX: usize = 0;
pub const DENY_INDEX: usize = 1;
const OPTION_COUNT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionDecision {
    Allow,
    Deny,
}

struct PermissionKeyUpdate {
    selected: usize,
    decision: Option<PermissionDecision>,
}

fn permission_key_update(key: KeyCode, selected: usize) -> PermissionKeyUpdate {
    let mut update = PermissionKeyUpdate {
        selected,
        decision: None,
    };
    match key {
        KeyCode::Up | KeyCode::Left => {
            update.selected = update.selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
            update.selected = usize::min(update.selected + 1, OPTION_COUNT - 1);
        }
        KeyCode::Char('1') => update.selected = ALLOW_INDEX,
        KeyCode::Char('2') => update.selected = DENY_INDEX,
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            update.decision = Some(PermissionDecision::Allow);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            update.decision = Some(PermissionDecision::Deny);
        }
        KeyCode::Enter => {
            update.decision = Some(if update.selected == ALLOW_INDEX {
                PermissionDecision::Allow
            } else {
                PermissionDecision::Deny
            });
        }
        _ => {}
    }
    update
}

/// Applies one keypress to the dialog; `Some` when the user decided.
pub fn handle_permission_key(
    dialog: &mut PermissionDialogState,
    key: KeyCode,
) -> Option<PermissionDecision> {
    let update = permission_key_update(key, dialog.selected);
    dialog.selected = update.selected;
    update.decision
}

#[cfg(test)]
mod tests {
    use super::{handle_permission_key, PermissionDecision, ALLOW_INDEX, DENY_INDEX};
    use crate::app::state::PermissionDialogState;
    use crossterm::event::KeyCode;

    fn dialog() -> PermissionDialogState {
        PermissionDialogState::new(
            "bash".to_string(),
            "tool_1".to_string(),
            serde_json::Map::new(),
        )
    }

    #[test]
    fn shortcut_keys_decide_immediately() {
        let mut d = dialog();
        assert_eq!(
            handle_permission_key(&mut d, KeyCode::Char('y')),
            Some(PermissionDecision::Allow)
        );
        assert_eq!(
            handle_permission_key(&mut d, KeyCode::Char('N')),
            Some(PermissionDecision::Deny)
        );
        assert_eq!(
            handle_permission_key(&mut d, KeyCode::Esc),
            Some(PermissionDecision::Deny)
        );
    }

    #[test]
    fn arrows_move_selection_with_clamping() {
        let mut d = dialog();
        assert_eq!(handle_permission_key(&mut d, KeyCode::Right), None);
        assert_eq!(d.selected, DENY_INDEX);
        assert_eq!(handle_permission_key(&mut d, KeyCode::Down), None);
        assert_eq!(d.selected, DENY_INDEX);
        assert_eq!(handle_permission_key(&mut d, KeyCode::Left), None);
        assert_eq!(d.selected, ALLOW_INDEX);
        assert_eq!(handle_permission_key(&mut d, KeyCode::Up), None);
        assert_eq!(d.selected, ALLOW_INDEX);
    }

    #[test]
    fn enter_confirms_the_selected_option() {
        let mut d = dialog();
        assert_eq!(
            handle_permission_key(&mut d, KeyCode::Enter),
            Some(PermissionDecision::Allow)
        );
        handle_permission_key(&mut d, KeyCode::Char('2'));
        assert_eq!(
            handle_permission_key(&mut d, KeyCode::Enter),
            Some(PermissionDecision::Deny)
        );
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut d = dialog();
        assert_eq!(handle_permission_key(&mut d, KeyCode::Char('x')), None);
        assert_eq!(d.selected, ALLOW_INDEX);
    }
}
