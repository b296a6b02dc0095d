/// Keyboard mapping for the kiosk
///
/// Right/Left arrows page through projects, Enter launches, Escape quits.
/// Ctrl+Shift+Escape is the force-stop combination; the launcher decides
/// whether to honor it.
use crate::launcher::LauncherAction;
use iced::keyboard::key::Named;
use iced::keyboard::{Key, Modifiers};

pub fn action_for_key(key: &Key, modifiers: Modifiers) -> Option<LauncherAction> {
    let Key::Named(named) = key else {
        return None;
    };

    match named {
        Named::ArrowRight => Some(LauncherAction::Next),
        Named::ArrowLeft => Some(LauncherAction::Previous),
        Named::Enter => Some(LauncherAction::Select),
        Named::Escape if modifiers.control() && modifiers.shift() => {
            Some(LauncherAction::ForceStop)
        }
        Named::Escape => Some(LauncherAction::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_navigate() {
        assert_eq!(
            action_for_key(&Key::Named(Named::ArrowRight), Modifiers::empty()),
            Some(LauncherAction::Next)
        );
        assert_eq!(
            action_for_key(&Key::Named(Named::ArrowLeft), Modifiers::empty()),
            Some(LauncherAction::Previous)
        );
    }

    #[test]
    fn test_enter_and_escape() {
        assert_eq!(
            action_for_key(&Key::Named(Named::Enter), Modifiers::empty()),
            Some(LauncherAction::Select)
        );
        assert_eq!(
            action_for_key(&Key::Named(Named::Escape), Modifiers::SHIFT),
            Some(LauncherAction::Quit)
        );
        assert_eq!(
            action_for_key(&Key::Named(Named::Escape), Modifiers::CTRL | Modifiers::SHIFT),
            Some(LauncherAction::ForceStop)
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(action_for_key(&Key::Named(Named::ArrowUp), Modifiers::empty()), None);
        assert_eq!(action_for_key(&Key::Character("a".into()), Modifiers::empty()), None);
    }
}
