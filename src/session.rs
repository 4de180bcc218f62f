/// Play session: the level set, the running engine and the shell state
/// around it (pause flag, status message).
///
/// The main loop feeds it meta actions and movement commands, calls `tick`
/// once per frame and hands `hud()` to the renderer.

use tracing::info;

use crate::domain::command::Command;
use crate::error::LevelError;
use crate::sim::engine::Engine;
use crate::sim::event::GameEvent;
use crate::sim::level::LevelDef;
use crate::ui::input::MetaAction;
use crate::ui::renderer::Hud;

/// How many ticks a status message stays on screen.
const MESSAGE_TICKS: u32 = 60;

pub struct Session {
    levels: Vec<LevelDef>,
    index: usize,
    engine: Engine,
    paused: bool,
    message: String,
    message_timer: u32,
}

impl Session {
    /// Start at the first level. An empty level set is reported as `Empty`.
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, LevelError> {
        let first = levels.first().ok_or(LevelError::Empty)?;
        let engine = Engine::from_level(first)?;
        let mut s = Session {
            levels,
            index: 0,
            engine,
            paused: false,
            message: String::new(),
            message_timer: 0,
        };
        s.announce_level();
        Ok(s)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn level_index(&self) -> usize {
        self.index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Apply a meta action. Returns `Ok(false)` when the player asked to quit.
    pub fn handle_meta(&mut self, action: MetaAction) -> Result<bool, LevelError> {
        match action {
            MetaAction::Quit => return Ok(false),
            MetaAction::TogglePause => self.paused = !self.paused,
            MetaAction::Restart => {
                self.engine.restart();
                self.set_message("Level restarted");
            }
            MetaAction::NextLevel => self.switch_level((self.index + 1) % self.levels.len())?,
            MetaAction::PrevLevel => {
                let n = self.levels.len();
                self.switch_level((self.index + n - 1) % n)?;
            }
        }
        Ok(true)
    }

    /// Queue a movement command. Ignored while paused.
    pub fn push_command(&mut self, cmd: Command) {
        if !self.paused {
            self.engine.push_command(cmd);
        }
    }

    /// Advance one frame: one engine step unless paused.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        let events = self.engine.step();
        for ev in &events {
            if let GameEvent::Unlocked { removed, .. } = *ev {
                let plural = if removed == 1 { "" } else { "s" };
                self.set_message(&format!("Unlocked {removed} lock{plural}"));
            }
        }
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
        events
    }

    pub fn hud(&self) -> Hud<'_> {
        Hud {
            level_name: &self.levels[self.index].name,
            level_index: self.index,
            level_count: self.levels.len(),
            message: &self.message,
            paused: self.paused,
        }
    }

    fn switch_level(&mut self, index: usize) -> Result<(), LevelError> {
        self.engine = Engine::from_level(&self.levels[index])?;
        self.index = index;
        self.paused = false;
        self.announce_level();
        Ok(())
    }

    fn announce_level(&mut self) {
        let name = self.levels[self.index].name.clone();
        info!(index = self.index, level = %name, "level started");
        self.set_message(&name);
    }

    fn set_message(&mut self, text: &str) {
        self.message = text.to_string();
        self.message_timer = MESSAGE_TICKS;
    }
}
