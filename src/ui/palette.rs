/// Tile → paint mapping used by the renderer.
///
/// Keys and locks are filled with their own configuration color; every other
/// visible kind takes its color from the configured palette. Air and the
/// player marker paint nothing (the player sprite is drawn separately).

use crate::config::PaletteConfig;
use crate::domain::tile::{Rgb, Shape, TileKind};

/// How one grid cell is drawn: a fill color plus a short glyph
/// (repeated or padded to the cell width by the renderer).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Paint {
    pub fill: Rgb,
    pub glyph: char,
}

#[derive(Clone, Debug)]
pub struct Palette {
    colors: PaletteConfig,
}

impl Palette {
    pub fn new(colors: PaletteConfig) -> Self {
        Palette { colors }
    }

    pub fn paint(&self, tile: TileKind) -> Option<Paint> {
        let c = &self.colors;
        match tile {
            TileKind::Air | TileKind::PlayerMarker => None,
            TileKind::Decorative => Some(Paint { fill: c.decorative, glyph: ' ' }),
            TileKind::Wall => Some(Paint { fill: c.wall, glyph: ' ' }),
            TileKind::Fallable { shape: Shape::Stone, .. } => Some(Paint { fill: c.stone, glyph: ' ' }),
            TileKind::Fallable { shape: Shape::Box, .. } => Some(Paint { fill: c.boxed, glyph: ' ' }),
            TileKind::Key(cfg) => Some(Paint { fill: cfg.color, glyph: 'k' }),
            TileKind::Lock(cfg) => Some(Paint { fill: cfg.color, glyph: '#' }),
        }
    }

    pub fn player(&self) -> Paint {
        Paint { fill: self.colors.player, glyph: ' ' }
    }
}
