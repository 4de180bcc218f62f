/// Direction commands produced by the input adapters and consumed by the engine.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
}

impl Command {
    /// Unit delta `(dx, dy)`; y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Command::Up => (0, -1),
            Command::Down => (0, 1),
            Command::Left => (-1, 0),
            Command::Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Command::Left | Command::Right)
    }
}
