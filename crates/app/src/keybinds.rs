//! Key names understood by the launcher and the actions they trigger.

/// GDK keyvals, for clients that forward raw key codes.
const KEYVAL_BACKSPACE: u32 = 0xff08;
const KEYVAL_RETURN: u32 = 0xff0d;
const KEYVAL_ESCAPE: u32 = 0xff1b;
const KEYVAL_KP_ENTER: u32 = 0xff8d;

/// Launcher input actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hide the launcher.
    Cancel,
    /// Launch the first result.
    Confirm,
    Backspace,
    DeleteWordBack,
    /// Empty the query.
    Clear,
    /// Append text to the query.
    Insert(String),
}

/// Resolve a key name such as `escape`, `ctrl-w` or `a` to an action.
///
/// Single printable characters insert themselves; case is preserved.
pub fn action_for(key: &str) -> Option<Action> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && !c.is_control()
    {
        return Some(Action::Insert(c.to_string()));
    }

    if let Ok(keyval) = key.parse::<u32>() {
        return match keyval {
            KEYVAL_ESCAPE => Some(Action::Cancel),
            KEYVAL_RETURN | KEYVAL_KP_ENTER => Some(Action::Confirm),
            KEYVAL_BACKSPACE => Some(Action::Backspace),
            _ => None,
        };
    }

    match key.to_ascii_lowercase().as_str() {
        "escape" | "esc" => Some(Action::Cancel),
        "enter" | "return" | "kp_enter" => Some(Action::Confirm),
        "backspace" => Some(Action::Backspace),
        "ctrl-backspace" | "ctrl-w" => Some(Action::DeleteWordBack),
        "ctrl-u" => Some(Action::Clear),
        "space" => Some(Action::Insert(" ".into())),
        _ => None,
    }
}
