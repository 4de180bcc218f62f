pub mod command;
pub mod entity;
pub mod falling;
pub mod tile;
