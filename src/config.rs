/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD, or
/// `~/.config/mazewalk`. Missing files, missing keys and out-of-range
/// values fall back to defaults; problems are collected in `warnings` so
/// the caller can log them once logging is up.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub maze: MazeConfig,
    pub navigator: NavigatorConfig,
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    pub logging: LoggingConfig,
    /// Non-fatal problems found while loading.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    /// Fixed seed; `None` picks a fresh one per maze.
    pub seed: Option<u64>,
}

/// World scale and navigator tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigatorConfig {
    pub cell_size: f32,
    pub radius: f32,
    pub move_speed: f32,      // world units per tick at full input
    pub analog_factor: f32,   // stick input is damped relative to keys
    pub turn_rate: f32,       // rad/tick, keyboard turning
    pub pitch_rate: f32,      // rad/tick, keyboard pitch
    pub drag_sensitivity: f32, // rad per terminal cell of mouse drag
    pub stick_look_rate: f32, // rad/tick at full right-stick deflection
    pub freeze_on_win: bool,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub new_maze: Vec<String>,
    pub quit: Vec<String>,
    pub pause: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// env_logger filter used when `RUST_LOG` is unset.
    pub level: String,
    pub file: Option<PathBuf>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    navigator: TomlNavigator,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    logging: TomlLogging,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_rows")]
    rows: i64,
    #[serde(default = "default_cols")]
    cols: i64,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlNavigator {
    #[serde(default = "default_cell_size")]
    cell_size: f32,
    #[serde(default = "default_radius")]
    radius: f32,
    #[serde(default = "default_move_speed")]
    move_speed: f32,
    #[serde(default = "default_analog_factor")]
    analog_factor: f32,
    #[serde(default = "default_turn_rate")]
    turn_rate: f32,
    #[serde(default = "default_pitch_rate")]
    pitch_rate: f32,
    #[serde(default = "default_drag_sensitivity")]
    drag_sensitivity: f32,
    #[serde(default = "default_stick_look_rate")]
    stick_look_rate: f32,
    #[serde(default = "default_freeze_on_win")]
    freeze_on_win: bool,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_new_maze")]
    new_maze: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLogging {
    #[serde(default = "default_log_level")]
    level: String,
    #[serde(default)]
    file: Option<String>,
}

// ── Defaults ──

fn default_rows() -> i64 { 15 }
fn default_cols() -> i64 { 21 }
fn default_cell_size() -> f32 { 1.0 }
fn default_radius() -> f32 { 0.25 }
fn default_move_speed() -> f32 { 0.05 }
fn default_analog_factor() -> f32 { 0.8 }
fn default_turn_rate() -> f32 { 0.05 }
fn default_pitch_rate() -> f32 { 0.04 }
fn default_drag_sensitivity() -> f32 { 0.03 }
fn default_stick_look_rate() -> f32 { 0.06 }
fn default_freeze_on_win() -> bool { true }
fn default_tick_rate() -> u64 { 16 }     // ~60 ticks per second

fn default_new_maze() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_pause() -> Vec<String> { vec!["Y".into()] }
fn default_log_level() -> String { "warn".into() }

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze { rows: default_rows(), cols: default_cols(), seed: None }
    }
}

impl Default for TomlNavigator {
    fn default() -> Self {
        TomlNavigator {
            cell_size: default_cell_size(),
            radius: default_radius(),
            move_speed: default_move_speed(),
            analog_factor: default_analog_factor(),
            turn_rate: default_turn_rate(),
            pitch_rate: default_pitch_rate(),
            drag_sensitivity: default_drag_sensitivity(),
            stick_look_rate: default_stick_look_rate(),
            freeze_on_win: default_freeze_on_win(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            new_maze: default_new_maze(),
            quit: default_quit(),
            pause: default_pause(),
        }
    }
}

impl Default for TomlLogging {
    fn default() -> Self {
        TomlLogging { level: default_log_level(), file: None }
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        TomlNavigator::default().into_config(&mut Vec::new())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), Vec::new())
    }
}

// ── Validation ──

fn positive_dimension(value: i64, fallback: i64, name: &str, warnings: &mut Vec<String>) -> usize {
    if value >= 1 {
        value as usize
    } else {
        warnings.push(format!("maze.{name} = {value} is not a positive size; using {fallback}"));
        fallback as usize
    }
}

fn finite_rate(value: f32, fallback: f32, name: &str, warnings: &mut Vec<String>) -> f32 {
    if value.is_finite() {
        value
    } else {
        warnings.push(format!("navigator.{name} = {value} is not finite; using {fallback}"));
        fallback
    }
}

impl TomlNavigator {
    fn into_config(self, warnings: &mut Vec<String>) -> NavigatorConfig {
        let mut cell_size = self.cell_size;
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            warnings.push(format!("navigator.cell_size = {cell_size} must be positive; using {}", default_cell_size()));
            cell_size = default_cell_size();
        }

        // The navigator must fit inside a one-cell corridor.
        let mut radius = self.radius;
        if !(radius > 0.0 && radius < cell_size / 2.0) {
            let fallback = default_radius() * cell_size;
            warnings.push(format!(
                "navigator.radius = {radius} must be in (0, {}); using {fallback}",
                cell_size / 2.0,
            ));
            radius = fallback;
        }

        // A step longer than the gap between the navigator and the next
        // wall face could carry the leading edge over a whole Wall cell.
        let max_speed = cell_size - 2.0 * radius;
        let mut move_speed = self.move_speed;
        if !(move_speed > 0.0 && move_speed < max_speed) {
            let fallback = (default_move_speed() * cell_size).min(max_speed / 2.0);
            warnings.push(format!(
                "navigator.move_speed = {move_speed} must be in (0, {max_speed}); using {fallback}",
            ));
            move_speed = fallback;
        }

        let mut analog_factor = self.analog_factor;
        if !(0.0..=1.0).contains(&analog_factor) {
            warnings.push(format!(
                "navigator.analog_factor = {analog_factor} must be in [0, 1]; using {}",
                default_analog_factor(),
            ));
            analog_factor = default_analog_factor();
        }

        NavigatorConfig {
            cell_size,
            radius,
            move_speed,
            analog_factor,
            turn_rate: finite_rate(self.turn_rate, default_turn_rate(), "turn_rate", warnings),
            pitch_rate: finite_rate(self.pitch_rate, default_pitch_rate(), "pitch_rate", warnings),
            drag_sensitivity: finite_rate(
                self.drag_sensitivity,
                default_drag_sensitivity(),
                "drag_sensitivity",
                warnings,
            ),
            stick_look_rate: finite_rate(self.stick_look_rate, default_stick_look_rate(), "stick_look_rate", warnings),
            freeze_on_win: self.freeze_on_win,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) CWD, (3) ~/.config/mazewalk.
    pub fn load() -> Self {
        let mut warnings = Vec::new();
        let toml_cfg = load_toml(&candidate_dirs(), &mut warnings);
        GameConfig::from_toml(toml_cfg, warnings)
    }

    /// Parse config text. A parse error yields the defaults plus a warning.
    pub fn from_toml_str(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => GameConfig::from_toml(cfg, Vec::new()),
            Err(e) => GameConfig::from_toml(
                TomlConfig::default(),
                vec![format!("config.toml parse error, using defaults: {e}")],
            ),
        }
    }

    fn from_toml(toml_cfg: TomlConfig, mut warnings: Vec<String>) -> Self {
        let rows = positive_dimension(toml_cfg.maze.rows, default_rows(), "rows", &mut warnings);
        let cols = positive_dimension(toml_cfg.maze.cols, default_cols(), "cols", &mut warnings);
        let navigator = toml_cfg.navigator.into_config(&mut warnings);

        GameConfig {
            maze: MazeConfig { rows, cols, seed: toml_cfg.maze.seed },
            navigator,
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1),
            },
            gamepad: GamepadConfig {
                new_maze: toml_cfg.gamepad.new_maze,
                quit: toml_cfg.gamepad.quit,
                pause: toml_cfg.gamepad.pause,
            },
            logging: LoggingConfig {
                level: toml_cfg.logging.level,
                file: toml_cfg.logging.file.map(PathBuf::from),
            },
            warnings,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + user config dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
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

    if let Ok(home) = std::env::var("HOME") {
        let user = PathBuf::from(&home).join(".config/mazewalk");
        if user.is_dir() && !dirs.iter().any(|d| d == &user) {
            dirs.push(user);
        }
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warnings.push(format!("{} parse error, using defaults: {e}", path.display()));
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                warnings.push(format!("could not read {}: {e}", path.display()));
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_defaults() {
        let cfg = GameConfig::from_toml_str("");
        assert_eq!(cfg.maze.rows, 15);
        assert_eq!(cfg.maze.cols, 21);
        assert_eq!(cfg.maze.seed, None);
        assert_eq!(cfg.navigator, NavigatorConfig::default());
        assert_eq!(cfg.navigator.radius, 0.25);
        assert_eq!(cfg.speed.tick_rate_ms, 16);
        assert_eq!(cfg.logging.level, "warn");
        assert!(cfg.logging.file.is_none());
        assert!(cfg.warnings.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[maze]\nrows = 9\nseed = 42\n[navigator]\nmove_speed = 0.1\n[logging]\nfile = \"maze.log\"\n",
        );
        assert_eq!(cfg.maze.rows, 9);
        assert_eq!(cfg.maze.cols, 21);
        assert_eq!(cfg.maze.seed, Some(42));
        assert_eq!(cfg.navigator.move_speed, 0.1);
        assert_eq!(cfg.navigator.cell_size, 1.0);
        assert_eq!(cfg.logging.file, Some(PathBuf::from("maze.log")));
    }

    #[test]
    fn non_positive_dimensions_fall_back_with_warning() {
        let cfg = GameConfig::from_toml_str("[maze]\nrows = 0\ncols = -4\n");
        assert_eq!(cfg.maze.rows, 15);
        assert_eq!(cfg.maze.cols, 21);
        assert_eq!(cfg.warnings.len(), 2);
    }

    #[test]
    fn oversized_radius_is_rejected() {
        let cfg = GameConfig::from_toml_str("[navigator]\ncell_size = 2.0\nradius = 1.0\n");
        assert_eq!(cfg.navigator.cell_size, 2.0);
        assert_eq!(cfg.navigator.radius, 0.5);
        assert_eq!(cfg.warnings.len(), 1);
    }

    #[test]
    fn bad_cell_size_falls_back() {
        let cfg = GameConfig::from_toml_str("[navigator]\ncell_size = -1.0\n");
        assert_eq!(cfg.navigator.cell_size, 1.0);
        assert_eq!(cfg.warnings.len(), 1);
    }

    #[test]
    fn speed_long_enough_to_skip_a_wall_is_rejected() {
        let cfg = GameConfig::from_toml_str("[navigator]\nmove_speed = 1.5\n");
        assert_eq!(cfg.navigator.move_speed, 0.05);
        assert_eq!(cfg.warnings.len(), 1);
        assert!(cfg.warnings[0].contains("move_speed"));
    }

    #[test]
    fn speed_must_fit_between_radius_and_wall() {
        // cell 1.0, radius 0.25: the gap is 0.5.
        let cfg = GameConfig::from_toml_str("[navigator]\nmove_speed = 0.5\n");
        assert_eq!(cfg.navigator.move_speed, 0.05);
        assert_eq!(cfg.warnings.len(), 1);

        let cfg = GameConfig::from_toml_str("[navigator]\nmove_speed = 0.49\n");
        assert_eq!(cfg.navigator.move_speed, 0.49);
        assert!(cfg.warnings.is_empty());
    }

    #[test]
    fn non_positive_and_nan_speed_fall_back() {
        for text in ["move_speed = 0.0", "move_speed = -0.1", "move_speed = nan", "move_speed = inf"] {
            let cfg = GameConfig::from_toml_str(&format!("[navigator]\n{text}\n"));
            assert_eq!(cfg.navigator.move_speed, 0.05, "{text}");
            assert_eq!(cfg.warnings.len(), 1, "{text}");
        }
    }

    #[test]
    fn speed_fallback_stays_inside_a_fat_navigator_gap() {
        // radius 0.49 leaves a 0.02 gap; the 0.05 default would not fit.
        let cfg = GameConfig::from_toml_str("[navigator]\nradius = 0.49\nmove_speed = 0.3\n");
        assert!(cfg.navigator.move_speed > 0.0);
        assert!(cfg.navigator.move_speed < 1.0 - 2.0 * 0.49);
    }

    #[test]
    fn analog_factor_outside_unit_range_falls_back() {
        for text in ["analog_factor = 1.5", "analog_factor = -0.2", "analog_factor = nan"] {
            let cfg = GameConfig::from_toml_str(&format!("[navigator]\n{text}\n"));
            assert_eq!(cfg.navigator.analog_factor, 0.8, "{text}");
            assert_eq!(cfg.warnings.len(), 1, "{text}");
        }
        let cfg = GameConfig::from_toml_str("[navigator]\nanalog_factor = 1.0\n");
        assert_eq!(cfg.navigator.analog_factor, 1.0);
        assert!(cfg.warnings.is_empty());
    }

    #[test]
    fn non_finite_look_rates_fall_back() {
        let cfg = GameConfig::from_toml_str(
            "[navigator]\nturn_rate = nan\npitch_rate = inf\ndrag_sensitivity = -inf\nstick_look_rate = nan\n",
        );
        assert_eq!(cfg.navigator.turn_rate, 0.05);
        assert_eq!(cfg.navigator.pitch_rate, 0.04);
        assert_eq!(cfg.navigator.drag_sensitivity, 0.03);
        assert_eq!(cfg.navigator.stick_look_rate, 0.06);
        assert_eq!(cfg.warnings.len(), 4);
    }

    #[test]
    fn parse_error_uses_defaults() {
        let cfg = GameConfig::from_toml_str("[maze\nrows = ");
        assert_eq!(cfg.maze.rows, 15);
        assert_eq!(cfg.warnings.len(), 1);
        assert!(cfg.warnings[0].contains("parse error"));
    }
}
