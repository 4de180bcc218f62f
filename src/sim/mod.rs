pub mod engine;
pub mod event;
pub mod grid;
pub mod level;
pub mod movement;
