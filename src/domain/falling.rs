/// Falling state machine for stones and boxes.
///
/// The state is never integrated over time. Every sweep recomputes it from
/// the cell directly below:
///
///   below is Air  → Falling (and the tile drops one row right away)
///   anything else → Resting
///
/// The stored value only survives until the next sweep, where it tells the
/// movement resolver whether the tile may be shoved sideways.

use super::tile::TileKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FallState {
    Falling,
    Resting,
}

impl FallState {
    /// Transition rule: the new state given the tile below.
    pub fn from_below(below: TileKind) -> Self {
        if below.blocks_fall_below() {
            FallState::Resting
        } else {
            FallState::Falling
        }
    }

    /// Does this state move the tile down one row during the sweep?
    pub fn can_drop(self) -> bool {
        matches!(self, FallState::Falling)
    }

    /// A tile mid-drop cannot be shoved sideways.
    pub fn can_be_pushed(self) -> bool {
        matches!(self, FallState::Resting)
    }
}
