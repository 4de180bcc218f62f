/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Problems found while loading are kept in `warnings` and logged once the
/// subscriber is up, since the log destination itself comes from this file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::tile::Rgb;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub display: DisplayConfig,
    pub palette: PaletteConfig,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
    pub levels_dir: PathBuf,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub fps: u32,
}

impl SpeedConfig {
    /// Target time between two engine steps.
    pub fn tick_period(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.fps.max(1)))
    }
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub cell_width: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteConfig {
    pub decorative: Rgb,
    pub wall: Rgb,
    pub stone: Rgb,
    pub boxed: Rgb,
    pub player: Rgb,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// `None` disables logging.
    pub file: Option<PathBuf>,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    palette: TomlPalette,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_fps")]
    fps: u32,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_cell_width")]
    cell_width: usize,
}

#[derive(Deserialize, Debug)]
struct TomlPalette {
    #[serde(default = "default_decorative")]
    decorative: String,
    #[serde(default = "default_wall")]
    wall: String,
    #[serde(default = "default_stone")]
    stone: String,
    #[serde(default = "default_box", rename = "box")]
    boxed: String,
    #[serde(default = "default_player")]
    player: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
}

// ── Defaults ──

fn default_fps() -> u32 { 30 }
fn default_cell_width() -> usize { 2 }
fn default_decorative() -> String { "#ccffcc".into() }
fn default_wall() -> String { "#999999".into() }
fn default_stone() -> String { "#0000cc".into() }
fn default_box() -> String { "#8b4513".into() }
fn default_player() -> String { "#ff0000".into() }
fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_file() -> String { "rockfall.log".into() }
fn default_log_level() -> String { "info".into() }
fn default_levels_dir() -> String { "levels".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { fps: default_fps() }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { cell_width: default_cell_width() }
    }
}

impl Default for TomlPalette {
    fn default() -> Self {
        TomlPalette {
            decorative: default_decorative(),
            wall: default_wall(),
            stone: default_stone(),
            boxed: default_box(),
            player: default_player(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { restart: default_restart(), quit: default_quit() }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: default_log_file(), level: default_log_level() }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { levels_dir: default_levels_dir() }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::resolve(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = vec![];
        let toml_cfg = load_toml(&search_dirs, &mut warnings);
        let mut cfg = GameConfig::resolve(toml_cfg, &search_dirs);
        warnings.append(&mut cfg.warnings);
        cfg.warnings = warnings;
        cfg
    }

    /// Parse config text directly. Relative paths stay relative to the CWD.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::resolve(toml_cfg, &[]))
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let mut warnings = vec![];

        let mut color = |field: &str, value: &str, fallback: fn() -> String| {
            Rgb::from_hex(value).unwrap_or_else(|| {
                warnings.push(format!("palette.{field}: `{value}` is not #rrggbb, using default"));
                // Defaults are literal hex strings and always parse.
                Rgb::from_hex(&fallback()).unwrap_or(Rgb::new(0, 0, 0))
            })
        };
        let p = &toml_cfg.palette;
        let palette = PaletteConfig {
            decorative: color("decorative", &p.decorative, default_decorative),
            wall: color("wall", &p.wall, default_wall),
            stone: color("stone", &p.stone, default_stone),
            boxed: color("box", &p.boxed, default_box),
            player: color("player", &p.player, default_player),
        };

        let fps = if toml_cfg.speed.fps == 0 {
            warnings.push("speed.fps must be positive, using default".to_string());
            default_fps()
        } else {
            toml_cfg.speed.fps
        };

        let log_file = toml_cfg.log.file.trim();
        let log_file = if log_file.is_empty() { None } else { Some(PathBuf::from(log_file)) };

        GameConfig {
            speed: SpeedConfig { fps },
            display: DisplayConfig { cell_width: toml_cfg.display.cell_width.clamp(1, 4) },
            palette,
            gamepad: GamepadConfig {
                restart: toml_cfg.gamepad.restart,
                quit: toml_cfg.gamepad.quit,
            },
            log: LogConfig { file: log_file, level: toml_cfg.log.level },
            levels_dir: resolve_levels_dir(&toml_cfg.general.levels_dir, search_dirs),
            warnings,
        }
    }
}

/// Absolute paths are kept; relative ones are looked up in the search dirs.
fn resolve_levels_dir(levels_dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = Path::new(levels_dir);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    search_dirs.iter()
        .map(|d| d.join(levels_dir))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| PathBuf::from(levels_dir))
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds data next to the real one.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warnings.push(format!("config.toml parse error, using defaults: {e}"));
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warnings.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    TomlConfig::default()
}
