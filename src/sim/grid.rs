/// Grid: the 2-D tile array and the gravity sweep.
///
/// Row 0 is the top; gravity pulls toward higher row indices.
/// Dimensions never change after construction.
///
/// Cell access outside the grid is a broken precondition and panics.
/// Levels are validated to be fully walled (see `sim::level`), so neither the
/// player nor a fallable tile can ever reach a border cell, and every
/// neighbor lookup done by the sweep or the resolver stays inside the grid.

use crate::domain::falling::FallState;
use crate::domain::tile::{ColorId, TileKind};

/// What the gravity sweep did to one tile.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GravityChange {
    /// The tile at `(x, y)` moved to `(x, y + 1)`.
    Dropped { x: usize, y: usize },
    /// A tile that was falling came to rest at `(x, y)`.
    Landed { x: usize, y: usize },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: Vec<Vec<TileKind>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Build a grid from rows of tiles. Rows must all have the same length.
    pub fn new(cells: Vec<Vec<TileKind>>) -> Self {
        let height = cells.len();
        let width = cells.first().map_or(0, |r| r.len());
        assert!(
            cells.iter().all(|r| r.len() == width),
            "grid rows must all be {width} cells wide",
        );
        Grid { cells, width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> TileKind {
        assert!(self.in_bounds(x, y), "cell ({x}, {y}) outside {}x{} grid", self.width, self.height);
        self.cells[y][x]
    }

    #[inline]
    pub fn replace(&mut self, x: usize, y: usize, tile: TileKind) {
        assert!(self.in_bounds(x, y), "cell ({x}, {y}) outside {}x{} grid", self.width, self.height);
        self.cells[y][x] = tile;
    }

    /// All cells in row-major order as `(x, y, tile)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, TileKind)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, &tile)| (x, y, tile))
        })
    }

    /// First cell (row-major) matching the predicate.
    pub fn find(&self, pred: impl Fn(TileKind) -> bool) -> Option<(usize, usize)> {
        self.iter().find(|&(_, _, t)| pred(t)).map(|(x, y, _)| (x, y))
    }

    pub fn count(&self, pred: impl Fn(TileKind) -> bool) -> usize {
        self.iter().filter(|&(_, _, t)| pred(t)).count()
    }

    /// One gravity tick.
    ///
    /// Rows are visited bottom → top and left → right. A tile that drops lands
    /// in a row that has already been visited, so it moves at most one row per
    /// sweep. A column of stacked tiles over air falls together, one row each.
    pub fn update(&mut self) -> Vec<GravityChange> {
        let mut changes = Vec::new();
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let tile = self.cells[y][x];
                let previous = match tile.fall_state() {
                    Some(s) => s,
                    None => continue,
                };

                let state = FallState::from_below(self.get(x, y + 1));
                let tile = tile.with_fall_state(state);

                if state.can_drop() {
                    self.replace(x, y + 1, tile);
                    self.replace(x, y, TileKind::Air);
                    changes.push(GravityChange::Dropped { x, y });
                } else {
                    self.replace(x, y, tile);
                    if previous == FallState::Falling {
                        changes.push(GravityChange::Landed { x, y });
                    }
                }
            }
        }
        changes
    }

    /// Replace every lock opened by `id` with air, anywhere on the grid.
    /// Returns how many cells were cleared; a repeat call clears nothing.
    pub fn remove_matching(&mut self, id: ColorId) -> usize {
        let mut removed = 0;
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                if cell.fits(id) {
                    *cell = TileKind::Air;
                    removed += 1;
                }
            }
        }
        removed
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::tile::KeyConfig;

    /// ASCII fixture:
    ///   '#' wall   '.' air    '~' decorative  '@' player
    ///   'o' stone  'b' box    (resting)       'O' / 'B' falling
    ///   'k' / 'K'  yellow / cyan key          'l' / 'L' yellow / cyan lock
    pub(crate) fn grid_from(rows: &[&str]) -> Grid {
        let cells = rows.iter().map(|row| {
            row.chars().map(|ch| match ch {
                '#' => TileKind::Wall,
                '~' => TileKind::Decorative,
                '@' => TileKind::PlayerMarker,
                'o' => TileKind::stone(FallState::Resting),
                'O' => TileKind::stone(FallState::Falling),
                'b' => TileKind::boxed(FallState::Resting),
                'B' => TileKind::boxed(FallState::Falling),
                'k' => TileKind::Key(KeyConfig::YELLOW),
                'K' => TileKind::Key(KeyConfig::CYAN),
                'l' => TileKind::Lock(KeyConfig::YELLOW),
                'L' => TileKind::Lock(KeyConfig::CYAN),
                _ => TileKind::Air,
            }).collect()
        }).collect();
        Grid::new(cells)
    }

    fn is_stone(t: TileKind) -> bool {
        matches!(t, TileKind::Fallable { shape: crate::domain::tile::Shape::Stone, .. })
    }

    #[test]
    fn stone_over_air_drops_one_row() {
        let mut g = grid_from(&[
            "###",
            "#o#",
            "#.#",
            "#.#",
            "###",
        ]);
        let changes = g.update();
        assert_eq!(changes, vec![GravityChange::Dropped { x: 1, y: 1 }]);
        assert_eq!(g.get(1, 1), TileKind::Air);
        assert_eq!(g.get(1, 2), TileKind::stone(FallState::Falling));
        assert_eq!(g.get(1, 3), TileKind::Air);
    }

    #[test]
    fn falls_in_a_straight_line_until_blocked() {
        let mut g = grid_from(&[
            "###",
            "#o#",
            "#.#",
            "#.#",
            "#.#",
            "###",
        ]);
        for expected_y in 2..=4 {
            g.update();
            assert_eq!(g.find(is_stone), Some((1, expected_y)));
        }
        // Blocked by the floor: lands, then stays put
        assert_eq!(g.update(), vec![GravityChange::Landed { x: 1, y: 4 }]);
        assert_eq!(g.get(1, 4), TileKind::stone(FallState::Resting));
        assert!(g.update().is_empty());
        assert_eq!(g.find(is_stone), Some((1, 4)));
    }

    #[test]
    fn stacked_column_falls_together_one_row_each() {
        let mut g = grid_from(&[
            "###",
            "#o#",
            "#b#",
            "#.#",
            "#.#",
            "###",
        ]);
        g.update();
        assert_eq!(g.get(1, 1), TileKind::Air);
        assert_eq!(g.get(1, 2), TileKind::stone(FallState::Falling));
        assert_eq!(g.get(1, 3), TileKind::boxed(FallState::Falling));
        assert_eq!(g.get(1, 4), TileKind::Air);
    }

    #[test]
    fn decorative_floor_holds_a_stone() {
        let mut g = grid_from(&[
            "###",
            "#O#",
            "#~#",
            "###",
        ]);
        assert_eq!(g.update(), vec![GravityChange::Landed { x: 1, y: 1 }]);
        assert_eq!(g.get(1, 1), TileKind::stone(FallState::Resting));
    }

    #[test]
    fn resting_tile_on_ground_reports_nothing() {
        let mut g = grid_from(&[
            "####",
            "#ob#",
            "####",
        ]);
        let before = g.clone();
        assert!(g.update().is_empty());
        assert_eq!(g, before);
    }

    #[test]
    fn remove_matching_clears_every_lock_of_that_color() {
        let mut g = grid_from(&[
            "######",
            "#l.L.#",
            "#..l.#",
            "#k.l.#",
            "######",
        ]);
        assert_eq!(g.remove_matching(KeyConfig::YELLOW.id), 3);
        assert_eq!(g.count(|t| t.fits(KeyConfig::YELLOW.id)), 0);
        // Other colors and the key itself are untouched
        assert_eq!(g.get(3, 1), TileKind::Lock(KeyConfig::CYAN));
        assert_eq!(g.get(1, 3), TileKind::Key(KeyConfig::YELLOW));
    }

    #[test]
    fn remove_matching_is_idempotent() {
        let mut g = grid_from(&[
            "#####",
            "#l.l#",
            "#####",
        ]);
        assert_eq!(g.remove_matching(1), 2);
        let after_first = g.clone();
        assert_eq!(g.remove_matching(1), 0);
        assert_eq!(g, after_first);
    }

    #[test]
    fn iter_is_row_major() {
        let g = grid_from(&["#.", "@#"]);
        let cells: Vec<_> = g.iter().collect();
        assert_eq!(cells[1], (1, 0, TileKind::Air));
        assert_eq!(cells[2], (0, 1, TileKind::PlayerMarker));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_bounds_read_panics() {
        let g = grid_from(&["###"]);
        g.get(3, 0);
    }
}
