/// Tile kinds and their capabilities.
/// Capabilities are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

use super::falling::FallState;

/// Identifier pairing a key with the lock(s) it opens.
pub type ColorId = u8;

/// 24-bit display color.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// A key/lock pairing: the color both are drawn with and the id that matches them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyConfig {
    pub color: Rgb,
    pub id: ColorId,
}

impl KeyConfig {
    pub const YELLOW: KeyConfig = KeyConfig { color: Rgb::new(0xff, 0xcc, 0x00), id: 1 };
    pub const CYAN: KeyConfig = KeyConfig { color: Rgb::new(0x00, 0xcc, 0xff), id: 2 };

    pub fn fits(self, id: ColorId) -> bool {
        self.id == id
    }
}

/// Gravity-affected shapes. They behave identically and differ only in looks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shape {
    Stone,
    Box,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileKind {
    Air,
    Decorative,   // Walkable flux, cosmetic only
    Wall,         // Unbreakable
    PlayerMarker, // The cell the player occupies
    Fallable { shape: Shape, state: FallState },
    Key(KeyConfig),
    Lock(KeyConfig),
}

impl TileKind {
    pub const fn stone(state: FallState) -> Self {
        TileKind::Fallable { shape: Shape::Stone, state }
    }

    pub const fn boxed(state: FallState) -> Self {
        TileKind::Fallable { shape: Shape::Box, state }
    }

    /// Only real air lets things fall or be pushed into it.
    /// Decorative cells are walkable but count as solid here.
    pub fn is_air(self) -> bool {
        matches!(self, TileKind::Air)
    }

    /// Can the player step straight into this cell?
    pub fn is_walkable(self) -> bool {
        matches!(self, TileKind::Air | TileKind::Decorative)
    }

    pub fn is_fallable(self) -> bool {
        matches!(self, TileKind::Fallable { .. })
    }

    /// Is this a lock opened by `id`?
    pub fn fits(self, id: ColorId) -> bool {
        match self {
            TileKind::Lock(cfg) => cfg.fits(id),
            _ => false,
        }
    }

    /// Does this tile stop a fallable directly above it from dropping?
    pub fn blocks_fall_below(self) -> bool {
        !self.is_air()
    }

    pub fn fall_state(self) -> Option<FallState> {
        match self {
            TileKind::Fallable { state, .. } => Some(state),
            _ => None,
        }
    }

    /// Same tile with its fall state replaced. Non-fallables are returned unchanged.
    pub fn with_fall_state(self, state: FallState) -> Self {
        match self {
            TileKind::Fallable { shape, .. } => TileKind::Fallable { shape, state },
            other => other,
        }
    }
}

impl Default for TileKind {
    fn default() -> Self {
        TileKind::Air
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_air_is_air() {
        assert!(TileKind::Air.is_air());
        assert!(!TileKind::Decorative.is_air());
        assert!(!TileKind::Wall.is_air());
        assert!(!TileKind::stone(FallState::Falling).is_air());
    }

    #[test]
    fn decorative_is_walkable_but_blocks_falls() {
        assert!(TileKind::Decorative.is_walkable());
        assert!(TileKind::Decorative.blocks_fall_below());
        assert!(!TileKind::Air.blocks_fall_below());
    }

    #[test]
    fn fits_matches_lock_id_only() {
        assert!(TileKind::Lock(KeyConfig::YELLOW).fits(KeyConfig::YELLOW.id));
        assert!(!TileKind::Lock(KeyConfig::YELLOW).fits(KeyConfig::CYAN.id));
        // The key itself is never removed by an unlock
        assert!(!TileKind::Key(KeyConfig::YELLOW).fits(KeyConfig::YELLOW.id));
        assert!(!TileKind::Wall.fits(1));
    }

    #[test]
    fn with_fall_state_keeps_shape() {
        let b = TileKind::boxed(FallState::Resting).with_fall_state(FallState::Falling);
        assert_eq!(b, TileKind::boxed(FallState::Falling));
        assert_eq!(TileKind::Wall.with_fall_state(FallState::Falling), TileKind::Wall);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(Rgb::from_hex("#8b4513"), Some(Rgb::new(0x8b, 0x45, 0x13)));
        assert_eq!(Rgb::from_hex("ccffcc"), Some(Rgb::new(0xcc, 0xff, 0xcc)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
    }
}
