/// The player entity.
///
/// The player's position is mirrored by exactly one `PlayerMarker` cell in the
/// grid. Only `sim::movement` moves the player, and it always rewrites both.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Player {
    pub x: usize,
    pub y: usize,
}

impl Player {
    pub fn new(x: usize, y: usize) -> Self {
        Player { x, y }
    }

    pub fn pos(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}
