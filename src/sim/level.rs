/// Level descriptions and loading.
///
/// ## Sources (priority order):
///   1. `levels/` directory (individual `.txt` files, sorted by file name)
///   2. Built-in embedded levels
///
/// ## File format (`.txt`):
///   Optional line 1: `# Level Name`
///   Rows of tile codes separated by spaces and/or commas.
///   `;` starts a comment that runs to the end of the line.
///
/// ## Tile codes:
///   0 = Air              1 = Flux (decorative)   2 = Player start
///   3 = Wall             4 = Stone               5 = Stone (falling)
///   6 = Box              7 = Box (falling)       8 = Flux (decorative)
///   9 = Yellow key      10 = Cyan key           11 = Yellow lock
///  12 = Cyan lock
///
/// A level must be rectangular, have exactly one player start, and be
/// surrounded by walls on all four borders.

use std::path::Path;

use tracing::{debug, warn};

use crate::domain::entity::Player;
use crate::domain::falling::FallState;
use crate::domain::tile::{KeyConfig, TileKind};
use crate::error::LevelError;
use super::grid::Grid;

pub const PLAYER_CODE: u8 = 2;

/// A parsed but not yet validated level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDef {
    pub name: String,
    pub codes: Vec<Vec<u8>>,
}

// ══════════════════════════════════════════════════════════════
// Codes → tiles
// ══════════════════════════════════════════════════════════════

pub fn tile_for_code(code: u8) -> Option<TileKind> {
    let tile = match code {
        0 => TileKind::Air,
        1 | 8 => TileKind::Decorative,
        2 => TileKind::PlayerMarker,
        3 => TileKind::Wall,
        4 => TileKind::stone(FallState::Resting),
        5 => TileKind::stone(FallState::Falling),
        6 => TileKind::boxed(FallState::Resting),
        7 => TileKind::boxed(FallState::Falling),
        9 => TileKind::Key(KeyConfig::YELLOW),
        10 => TileKind::Key(KeyConfig::CYAN),
        11 => TileKind::Lock(KeyConfig::YELLOW),
        12 => TileKind::Lock(KeyConfig::CYAN),
        _ => return None,
    };
    Some(tile)
}

/// Turn a code array into a grid plus the player standing on its start cell.
pub fn build_grid(codes: &[Vec<u8>]) -> Result<(Grid, Player), LevelError> {
    let height = codes.len();
    let width = codes.first().map_or(0, |r| r.len());
    if height == 0 || width == 0 {
        return Err(LevelError::Empty);
    }

    let mut cells = Vec::with_capacity(height);
    let mut player: Option<(usize, usize)> = None;

    for (y, row) in codes.iter().enumerate() {
        if row.len() != width {
            return Err(LevelError::Ragged { row: y, expected: width, found: row.len() });
        }
        let mut cells_row = Vec::with_capacity(width);
        for (x, &code) in row.iter().enumerate() {
            let tile = tile_for_code(code).ok_or(LevelError::UnknownTileCode { code, x, y })?;
            let on_border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            if on_border && tile != TileKind::Wall {
                return Err(LevelError::OpenBorder { x, y });
            }
            if tile == TileKind::PlayerMarker {
                if let Some(first) = player {
                    return Err(LevelError::MultiplePlayers { first, second: (x, y) });
                }
                player = Some((x, y));
            }
            cells_row.push(tile);
        }
        cells.push(cells_row);
    }

    let (px, py) = player.ok_or(LevelError::MissingPlayer)?;
    Ok((Grid::new(cells), Player::new(px, py)))
}

// ══════════════════════════════════════════════════════════════
// Text parsing
// ══════════════════════════════════════════════════════════════

/// Parse a single level from text content.
pub fn parse_level_file(content: &str) -> Result<LevelDef, LevelError> {
    let mut name = String::new();
    let mut codes = vec![];

    for (i, raw) in content.lines().enumerate() {
        let line = raw.split(';').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        if let Some(title) = line.strip_prefix('#') {
            if name.is_empty() && codes.is_empty() {
                name = title.trim().to_string();
            }
            continue;
        }

        let row = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<u8>().map_err(|_| LevelError::BadToken { line: i + 1, token: t.to_string() })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        codes.push(row);
    }

    if codes.is_empty() {
        return Err(LevelError::Empty);
    }
    if name.is_empty() {
        name = "Untitled".to_string();
    }

    Ok(LevelDef { name, codes })
}

// ══════════════════════════════════════════════════════════════
// Loading
// ══════════════════════════════════════════════════════════════

/// Levels from `dir` if it holds any valid ones, otherwise the built-in set.
pub fn load_levels(dir: &Path) -> Vec<LevelDef> {
    if dir.is_dir() {
        let mut levels = load_from_directory(dir);
        if !levels.is_empty() {
            levels.sort_by(|a, b| a.0.cmp(&b.0));
            debug!(count = levels.len(), dir = %dir.display(), "loaded level directory");
            return levels.into_iter().map(|(_, def)| def).collect();
        }
    }
    embedded_levels()
}

fn load_from_directory(dir: &Path) -> Vec<(String, LevelDef)> {
    let mut results = vec![];

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!(dir = %dir.display(), "cannot read level directory: {e}");
            return results;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(true, |e| e != "txt") {
            continue;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(file = %path.display(), "cannot read level: {e}");
                continue;
            }
        };
        // A file must parse and also form a valid grid to be offered.
        match parse_level_file(&content).and_then(|def| build_grid(&def.codes).map(|_| def)) {
            Ok(def) => {
                let filename = path.file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                results.push((filename, def));
            }
            Err(e) => warn!(file = %path.display(), "skipping level: {e}"),
        }
    }

    results
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

pub fn embedded_levels() -> Vec<LevelDef> {
    vec![
        make_embedded("Vault 1 - Rockslide", &[
            &[3, 3, 3, 3, 3, 3, 3, 3],
            &[3, 2, 0, 1, 1, 3, 0, 3],
            &[3, 4, 3, 6, 1, 3, 0, 3],
            &[3, 9, 4, 1, 1, 3, 0, 3],
            &[3, 4, 1, 1, 1, 11, 0, 3],
            &[3, 3, 3, 3, 3, 3, 3, 3],
        ]),
        make_embedded("Vault 2 - Two Keys", &[
            &[3, 3, 3, 3, 3, 3, 3, 3, 3, 3],
            &[3, 2, 0, 0, 6, 0, 0, 0, 0, 3],
            &[3, 3, 3, 0, 3, 3, 3, 0, 3, 3],
            &[3, 10, 1, 0, 0, 4, 0, 0, 12, 3],
            &[3, 3, 3, 3, 0, 3, 3, 3, 0, 3],
            &[3, 9, 0, 0, 0, 0, 11, 0, 0, 3],
            &[3, 3, 3, 3, 3, 3, 3, 3, 3, 3],
        ]),
        make_embedded("Vault 3 - Avalanche", &[
            &[3, 3, 3, 3, 3, 3, 3, 3, 3],
            &[3, 5, 7, 5, 0, 0, 0, 0, 3],
            &[3, 0, 0, 0, 0, 6, 0, 0, 3],
            &[3, 0, 1, 0, 1, 3, 0, 0, 3],
            &[3, 2, 1, 1, 1, 3, 11, 9, 3],
            &[3, 3, 3, 3, 3, 3, 3, 3, 3],
        ]),
    ]
}

fn make_embedded(name: &str, rows: &[&[u8]]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        codes: rows.iter().map(|r| r.to_vec()).collect(),
    }
}
