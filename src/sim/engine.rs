/// The engine: one owned simulation context and its step function.
///
/// Processing order of `step`:
///   1. Drain the command queue (arrival order), resolving each move
///   2. One gravity sweep
///   3. Return the tick's events; the caller renders right after
///
/// Commands never run between two sweeps of the same tick.

use std::collections::VecDeque;

use tracing::debug;

use crate::domain::command::Command;
use crate::domain::entity::Player;
use crate::error::LevelError;
use super::event::GameEvent;
use super::grid::{Grid, GravityChange};
use super::level::{build_grid, LevelDef};
use super::movement::{resolve_move, MoveOutcome};

pub struct Engine {
    grid: Grid,
    player: Player,
    commands: VecDeque<Command>,
    tick: u64,
    /// Level as loaded. Never mutated; `restart` copies it back.
    initial: (Grid, Player),
}

impl Engine {
    pub fn from_codes(codes: &[Vec<u8>]) -> Result<Self, LevelError> {
        let (grid, player) = build_grid(codes)?;
        debug!(width = grid.width(), height = grid.height(), "level built");
        Ok(Engine {
            initial: (grid.clone(), player),
            grid,
            player,
            commands: VecDeque::with_capacity(8),
            tick: 0,
        })
    }

    pub fn from_level(def: &LevelDef) -> Result<Self, LevelError> {
        Self::from_codes(&def.codes)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    /// Queue a command for the next `step`.
    pub fn push_command(&mut self, cmd: Command) {
        self.commands.push_back(cmd);
    }

    /// Advance the world by one tick.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.tick += 1;

        while let Some(cmd) = self.commands.pop_front() {
            match resolve_move(&mut self.grid, &mut self.player, cmd) {
                MoveOutcome::Blocked => {}
                MoveOutcome::Walked { to: (x, y) } => {
                    events.push(GameEvent::PlayerMoved { x, y });
                }
                MoveOutcome::Pushed { from, to } => {
                    events.push(GameEvent::Pushed { from, to });
                    events.push(GameEvent::PlayerMoved { x: from.0, y: from.1 });
                }
                MoveOutcome::Unlocked { id, removed, to: (x, y) } => {
                    events.push(GameEvent::Unlocked { id, removed });
                    events.push(GameEvent::PlayerMoved { x, y });
                }
            }
        }

        for change in self.grid.update() {
            if let GravityChange::Landed { x, y } = change {
                events.push(GameEvent::Landed { x, y });
            }
        }

        events
    }

    /// Put the level back the way it was loaded. Pending commands are dropped.
    pub fn restart(&mut self) {
        let (grid, player) = self.initial.clone();
        self.grid = grid;
        self.player = player;
        self.commands.clear();
        self.tick = 0;
    }
}
