/// Entry point and game loop.

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rockfall::config::GameConfig;
use rockfall::pacing::FramePacer;
use rockfall::session::Session;
use rockfall::sim::level::load_levels;
use rockfall::ui::gamepad::GamepadState;
use rockfall::ui::input::{InputState, MetaAction};
use rockfall::ui::palette::Palette;
use rockfall::ui::renderer::Renderer;
use rockfall::ui::sound::SoundEngine;

fn main() -> Result<()> {
    let config = GameConfig::load();
    init_logging(&config);
    for w in &config.warnings {
        warn!("{w}");
    }

    let levels = load_levels(&config.levels_dir);
    info!(count = levels.len(), "levels available");
    let mut session = Session::new(levels).context("cannot start the first level")?;

    let mut renderer = Renderer::new(Palette::new(config.palette.clone()), config.display.cell_width);
    renderer.init().context("terminal init failed")?;

    let sound = SoundEngine::new();
    if sound.is_none() {
        warn!("no audio output device, sound disabled");
    }

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    info!(level = session.level_index(), tick = session.engine().tick(), "quit");
    println!("Thanks for playing Rockfall!");
    Ok(())
}

/// Log to the configured file; stdout belongs to the terminal UI.
/// `RUST_LOG` takes precedence over `[log] level`.
fn init_logging(config: &GameConfig) {
    let Some(path) = &config.log.file else { return };
    let file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cannot open log file {}: {e}, logging disabled", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad connected");
    }
    let mut pacer = FramePacer::new(config.speed.tick_period());

    loop {
        kb.drain_events();
        gp.update();

        let mut actions: Vec<MetaAction> = kb.meta_actions().collect();
        if gp.restart_pressed() {
            actions.push(MetaAction::Restart);
        }
        if gp.quit_pressed() {
            actions.push(MetaAction::Quit);
        }
        for action in actions {
            if !session.handle_meta(action)? {
                return Ok(());
            }
        }

        for cmd in kb.commands().chain(gp.commands().iter().copied()) {
            session.push_command(cmd);
        }

        let events = session.tick();
        if let Some(sfx) = sound {
            sfx.play_events(&events);
        }

        renderer.render(session.engine(), &session.hud())?;
        pacer.wait();
    }
}
