//! Key byte -> painter action

/// User commands reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextColor,
    PrevColor,
    /// Add to brush radius
    Radius(i32),
    Clear,
    Undo,
    Redo,
    SavePng,
    ExportText,
}

const CTRL_C: u8 = 0x03;
const CTRL_E: u8 = 0x05;
const CTRL_S: u8 = 0x13;
const CTRL_Y: u8 = 0x19;
const CTRL_Z: u8 = 0x1a;

pub fn action_for_key(byte: u8) -> Option<Action> {
    let action = match byte {
        b'q' | b'Q' | CTRL_C => Action::Quit,
        b'c' => Action::NextColor,
        b'C' => Action::PrevColor,
        b'[' => Action::Radius(-1),
        b']' => Action::Radius(1),
        b'{' => Action::Radius(-5),
        b'}' => Action::Radius(5),
        b'x' | b'X' => Action::Clear,
        b'u' | CTRL_Z => Action::Undo,
        b'U' | CTRL_Y => Action::Redo,
        CTRL_S => Action::SavePng,
        CTRL_E => Action::ExportText,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(action_for_key(b'q'), Some(Action::Quit));
        assert_eq!(action_for_key(0x03), Some(Action::Quit));
        assert_eq!(action_for_key(b'c'), Some(Action::NextColor));
        assert_eq!(action_for_key(b'C'), Some(Action::PrevColor));
        assert_eq!(action_for_key(b'{'), Some(Action::Radius(-5)));
        assert_eq!(action_for_key(b'}'), Some(Action::Radius(5)));
        assert_eq!(action_for_key(b'X'), Some(Action::Clear));
        assert_eq!(action_for_key(0x1a), Some(Action::Undo));
        assert_eq!(action_for_key(0x13), Some(Action::SavePng));
        assert_eq!(action_for_key(b'z'), None);
    }
}
