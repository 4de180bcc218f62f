/// Events emitted during a simulation step.
/// The presentation layer consumes these for the status line and sound.

use crate::domain::tile::ColorId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PlayerMoved { x: usize, y: usize },
    Pushed { from: (usize, usize), to: (usize, usize) },
    Unlocked { id: ColorId, removed: usize },
    Landed { x: usize, y: usize },
}
