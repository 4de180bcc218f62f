//! Tile-based falling-rocks puzzle engine.
//!
//! `domain` holds the value types (tiles, fall state, commands),
//! `sim` the grid, movement rules and the stepping engine,
//! `ui` the terminal front end used by the binary.

pub mod config;
pub mod domain;
pub mod error;
pub mod pacing;
pub mod session;
pub mod sim;
pub mod ui;

pub use domain::command::Command;
pub use domain::entity::Player;
pub use domain::falling::FallState;
pub use domain::tile::{KeyConfig, Rgb, Shape, TileKind};
pub use error::LevelError;
pub use sim::engine::Engine;
pub use sim::event::GameEvent;
pub use sim::grid::Grid;
