use thiserror::Error;

/// Reasons a level description cannot become a playable grid.
///
/// All of these are content errors: a shipped level never produces one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("line {line}: `{token}` is not a tile code")]
    BadToken { line: usize, token: String },
    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unknown tile code {code} at ({x}, {y})")]
    UnknownTileCode { code: u8, x: usize, y: usize },
    #[error("level has no player start")]
    MissingPlayer,
    #[error("second player start at {second:?} (first at {first:?})")]
    MultiplePlayers { first: (usize, usize), second: (usize, usize) },
    #[error("border cell ({x}, {y}) must be a wall")]
    OpenBorder { x: usize, y: usize },
}
