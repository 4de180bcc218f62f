/// Movement resolution: what happens when the player tries to enter a neighbor cell.
///
/// Dispatch is on the kind of the target cell:
///
///   Air / Decorative   → walk in
///   Wall / PlayerMarker→ blocked
///   Fallable           → horizontal + Resting: push check; otherwise blocked
///   Key                → unlock every matching lock, then walk in
///   Lock               → blocked (only a key can clear it)
///
/// Blocked moves leave grid and player exactly as they were.

use tracing::debug;

use crate::domain::command::Command;
use crate::domain::entity::Player;
use crate::domain::tile::{ColorId, TileKind};
use super::grid::Grid;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Blocked,
    Walked { to: (usize, usize) },
    Pushed { from: (usize, usize), to: (usize, usize) },
    Unlocked { id: ColorId, removed: usize, to: (usize, usize) },
}

#[inline]
fn offset(v: usize, d: i32) -> usize {
    (v as i32 + d) as usize
}

pub fn resolve_move(grid: &mut Grid, player: &mut Player, cmd: Command) -> MoveOutcome {
    let (dx, dy) = cmd.delta();
    let tx = offset(player.x, dx);
    let ty = offset(player.y, dy);

    match grid.get(tx, ty) {
        TileKind::Air | TileKind::Decorative => {
            relocate_player(grid, player, tx, ty);
            MoveOutcome::Walked { to: (tx, ty) }
        }
        TileKind::Wall | TileKind::PlayerMarker | TileKind::Lock(_) => MoveOutcome::Blocked,
        TileKind::Fallable { state, .. } => {
            if cmd.is_horizontal() && state.can_be_pushed() {
                try_push(grid, player, dx)
            } else {
                MoveOutcome::Blocked
            }
        }
        TileKind::Key(cfg) => {
            let removed = grid.remove_matching(cfg.id);
            debug!(id = cfg.id, removed, "key collected");
            relocate_player(grid, player, tx, ty);
            MoveOutcome::Unlocked { id: cfg.id, removed, to: (tx, ty) }
        }
    }
}

/// Shove the resting tile next to the player one cell further along `dx`.
///
/// Allowed only when the destination is air and the cell under the tile's
/// current position is not, so a push never starts a free fall.
fn try_push(grid: &mut Grid, player: &mut Player, dx: i32) -> MoveOutcome {
    let (x, y) = player.pos();
    let tile_x = offset(x, dx);
    let beyond_x = offset(x, 2 * dx);

    if !grid.get(beyond_x, y).is_air() || grid.get(tile_x, y + 1).is_air() {
        return MoveOutcome::Blocked;
    }

    let tile = grid.get(tile_x, y);
    grid.replace(beyond_x, y, tile);
    relocate_player(grid, player, tile_x, y);
    debug!(from = tile_x, to = beyond_x, row = y, "pushed");
    MoveOutcome::Pushed { from: (tile_x, y), to: (beyond_x, y) }
}

/// Move the player marker and the player position together.
fn relocate_player(grid: &mut Grid, player: &mut Player, nx: usize, ny: usize) {
    grid.replace(player.x, player.y, TileKind::Air);
    grid.replace(nx, ny, TileKind::PlayerMarker);
    player.x = nx;
    player.y = ny;
}
