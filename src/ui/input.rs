/// Keyboard input adapter.
///
/// Drains every pending terminal event once per frame. Each key press (and
/// each auto-repeat the terminal sends while a key is held) counts as one
/// fresh press, so holding an arrow walks one cell per repeat.
///
/// Movement keys become `Command`s; everything else the shell cares about
/// becomes a `MetaAction`.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::command::Command;

/// Shell-level actions that never reach the engine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MetaAction {
    Quit,
    Restart,
    TogglePause,
    NextLevel,
    PrevLevel,
}

pub struct InputState {
    /// Keys pressed during the most recent `drain_events()` call, in order.
    fresh_presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { fresh_presses: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the engine step.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Release {
                    self.fresh_presses.push(key);
                }
            }
        }
    }

    /// Movement commands pressed this frame, in arrival order.
    pub fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.fresh_presses.iter().filter_map(|k| command_for_key(k.code))
    }

    /// Meta actions pressed this frame, in arrival order.
    pub fn meta_actions(&self) -> impl Iterator<Item = MetaAction> + '_ {
        self.fresh_presses.iter().filter_map(meta_for_key)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::Right),
        _ => None,
    }
}

pub fn meta_for_key(key: &KeyEvent) -> Option<MetaAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(MetaAction::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(MetaAction::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(MetaAction::Restart),
        KeyCode::F(1) | KeyCode::Char(' ') => Some(MetaAction::TogglePause),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(MetaAction::NextLevel),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(MetaAction::PrevLevel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn arrows_and_wasd_map_to_commands() {
        assert_eq!(command_for_key(KeyCode::Left), Some(Command::Left));
        assert_eq!(command_for_key(KeyCode::Char('w')), Some(Command::Up));
        assert_eq!(command_for_key(KeyCode::Char('S')), Some(Command::Down));
        assert_eq!(command_for_key(KeyCode::Char('d')), Some(Command::Right));
        assert_eq!(command_for_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn meta_keys() {
        assert_eq!(meta_for_key(&key(KeyCode::Esc, KeyModifiers::NONE)), Some(MetaAction::Quit));
        assert_eq!(meta_for_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(MetaAction::Quit));
        assert_eq!(meta_for_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(meta_for_key(&key(KeyCode::Char('r'), KeyModifiers::NONE)), Some(MetaAction::Restart));
        assert_eq!(meta_for_key(&key(KeyCode::F(1), KeyModifiers::NONE)), Some(MetaAction::TogglePause));
        assert_eq!(meta_for_key(&key(KeyCode::Up, KeyModifiers::NONE)), None);
    }

    #[test]
    fn movement_and_meta_keys_do_not_overlap() {
        for ch in ['w', 'a', 's', 'd'] {
            let k = key(KeyCode::Char(ch), KeyModifiers::NONE);
            assert!(command_for_key(k.code).is_some());
            assert!(meta_for_key(&k).is_none());
        }
    }
}
