use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::navigation::Nav;

/// Keys toggling the 1st..14th month of the window, in order.
pub const MONTH_KEYS: [char; 14] = [
    'q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p', '[', ']', '\\', '\'',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Nav),
    ToggleDay(usize),
    ToggleMonth(usize),
    SwitchPalette,
    Select,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailCommand {
    ScrollUp,
    ScrollDown,
    Back,
    Quit,
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
}

/// Translate a key pressed on the calendar grid.
pub fn grid_command(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(&key) {
        return Some(Command::Quit);
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let command = match key.code {
        KeyCode::Esc => Command::Quit,
        KeyCode::Enter => Command::Select,
        KeyCode::Up if shift => Command::Move(Nav::JumpUp),
        KeyCode::Down if shift => Command::Move(Nav::JumpDown),
        KeyCode::Left if shift => Command::Move(Nav::JumpLeft),
        KeyCode::Right if shift => Command::Move(Nav::JumpRight),
        KeyCode::Up => Command::Move(Nav::Up),
        KeyCode::Down => Command::Move(Nav::Down),
        KeyCode::Left => Command::Move(Nav::Left),
        KeyCode::Right => Command::Move(Nav::Right),
        KeyCode::Home => Command::Move(Nav::UpLeft),
        KeyCode::PageUp => Command::Move(Nav::UpRight),
        KeyCode::End => Command::Move(Nav::DownLeft),
        KeyCode::PageDown => Command::Move(Nav::DownRight),
        KeyCode::KeypadBegin => Command::Move(Nav::Center),
        KeyCode::Char('c') => Command::SwitchPalette,
        KeyCode::Char(c @ '1'..='7') => Command::ToggleDay(c as usize - '1' as usize),
        KeyCode::Char(c) => Command::ToggleMonth(MONTH_KEYS.iter().position(|k| *k == c)?),
        _ => return None,
    };
    Some(command)
}

/// Translate a key pressed in the commit detail view.
pub fn detail_command(key: KeyEvent) -> Option<DetailCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(&key) {
        return Some(DetailCommand::Quit);
    }
    match key.code {
        KeyCode::Up => Some(DetailCommand::ScrollUp),
        KeyCode::Down => Some(DetailCommand::ScrollDown),
        KeyCode::Esc => Some(DetailCommand::Back),
        _ => None,
    }
}
