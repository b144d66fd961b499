//! Key bindings.
//!
//! Keys are resolved to [`Action`]s here so the session never looks at raw
//! key codes. Terminal events are converted into [`Key`] by the binary.

/// A key press, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Up,
    Down,
    Left,
    Right,
    Esc,
    Enter,
    Backspace,
}

/// Movement commands understood by POST /api/command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCommand {
    Forward,
    Backward,
    Left,
    Right,
    SmoothLeft,
    SmoothRight,
    Stop,
}

impl MoveCommand {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveCommand::Forward => "forward",
            MoveCommand::Backward => "backward",
            MoveCommand::Left => "left",
            MoveCommand::Right => "right",
            MoveCommand::SmoothLeft => "smooth_left",
            MoveCommand::SmoothRight => "smooth_right",
            MoveCommand::Stop => "stop",
        }
    }

    /// Key hint shown on the control pad.
    pub fn hint(&self) -> &'static str {
        match self {
            MoveCommand::Forward => "w/↑",
            MoveCommand::Backward => "s/↓",
            MoveCommand::Left => "a/←",
            MoveCommand::Right => "d/→",
            MoveCommand::SmoothLeft => "q",
            MoveCommand::SmoothRight => "e",
            MoveCommand::Stop => "space",
        }
    }
}

/// "smooth_left" → "SMOOTH LEFT".
pub fn command_label(command: &str) -> String {
    command.replace('_', " ").to_uppercase()
}

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(MoveCommand),
    Disconnect,
    ToggleFullscreen,
    Connect,
    OpenNavigate,
    Explore,
    Snapshot,
    ToggleStream,
    RefreshMap,
    TestCamera,
    ClearLog,
    ResetSystem,
    SpeedUp,
    SpeedDown,
    DismissNotification,
    Help,
    Quit,
}

/// Where keyboard focus is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Panel,
    /// The navigation prompt owns the keyboard
    TextInput,
}

/// Map a key to an action. Only Ctrl-C gets through while typing.
pub fn resolve(key: Key, focus: Focus) -> Option<Action> {
    if let Key::Ctrl('c') = key {
        return Some(Action::Quit);
    }
    if focus == Focus::TextInput {
        return None;
    }

    let action = match key {
        Key::Up | Key::Char('w') | Key::Char('W') => Action::Move(MoveCommand::Forward),
        Key::Down | Key::Char('s') | Key::Char('S') => Action::Move(MoveCommand::Backward),
        Key::Left | Key::Char('a') | Key::Char('A') => Action::Move(MoveCommand::Left),
        Key::Right | Key::Char('d') | Key::Char('D') => Action::Move(MoveCommand::Right),
        Key::Char('q') | Key::Char('Q') => Action::Move(MoveCommand::SmoothLeft),
        Key::Char('e') | Key::Char('E') => Action::Move(MoveCommand::SmoothRight),
        Key::Char(' ') => Action::Move(MoveCommand::Stop),
        Key::Esc => Action::Disconnect,
        Key::Char('f') | Key::Char('F') => Action::ToggleFullscreen,
        Key::Char('c') | Key::Char('C') => Action::Connect,
        Key::Char('n') => Action::OpenNavigate,
        Key::Char('x') => Action::Explore,
        Key::Char('p') => Action::Snapshot,
        Key::Char('v') => Action::ToggleStream,
        Key::Char('m') => Action::RefreshMap,
        Key::Char('t') => Action::TestCamera,
        Key::Char('l') => Action::ClearLog,
        Key::Char('r') => Action::ResetSystem,
        Key::Char('+') | Key::Char('=') => Action::SpeedUp,
        Key::Char('-') => Action::SpeedDown,
        Key::Char('z') => Action::DismissNotification,
        Key::Char('?') => Action::Help,
        _ => return None,
    };
    Some(action)
}
