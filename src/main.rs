/// Entry point and game loop.

mod ui;

use std::error::Error;
use std::fs::File;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use env_logger::{Builder, Env, Target};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mazewalk::config::{GameConfig, LoggingConfig};
use mazewalk::domain::navigator::{LookDelta, MotionInput, TickInput};
use mazewalk::sim::event::GameEvent;
use mazewalk::sim::session::Session;
use mazewalk::sim::step::step;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::{Overlay, Renderer};
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const WIN_MESSAGE: &str = "Congratulations! You reached the end!";

/// Everything the loop owns besides the session itself.
struct Game {
    session: Session,
    seed: u64,
    paused: bool,
    message: String,
    /// Look input gathered between ticks (mouse drag arrives per frame).
    pending_look: LookDelta,
    /// Whether the previous tick bumped, so the sound plays once per contact.
    bumping: bool,
}

fn main() {
    let config = GameConfig::load();
    init_logging(&config.logging);
    for w in &config.warnings {
        log::warn!("config: {w}");
    }

    let mut game = match new_game(&config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Maze generation failed: {e}");
            return;
        }
    };

    let mut renderer = Renderer::new();
    let honor_release = match renderer.init() {
        Ok(enhanced) => enhanced,
        Err(e) => {
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    let sound = SoundEngine::new();

    let result = game_loop(&mut game, &mut renderer, sound.as_ref(), &config, honor_release);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for walking the maze!");
}

/// `RUST_LOG` wins over the configured level. With a log file configured
/// the output is piped there, since the terminal is in raw mode.
fn init_logging(cfg: &LoggingConfig) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(cfg.level.as_str()));
    if let Some(path) = &cfg.file {
        match File::create(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("cannot open log file {}: {e}", path.display()),
        }
    }
    // A second init (tests, embedding) is harmless.
    let _ = builder.try_init();
}

fn new_game(config: &GameConfig) -> Result<Game, Box<dyn Error>> {
    let seed = config.maze.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let session = start_session(config, seed)?;
    Ok(Game {
        session,
        seed,
        paused: false,
        message: String::new(),
        pending_look: LookDelta::default(),
        bumping: false,
    })
}

fn start_session(config: &GameConfig, seed: u64) -> Result<Session, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let session = Session::generate(config.maze.rows, config.maze.cols, &mut rng, config.navigator.clone())?;
    let goal = session.goal();
    log::info!(
        "new maze {}x{} seed {} goal ({}, {}){}",
        config.maze.rows,
        config.maze.cols,
        seed,
        goal.row,
        goal.col,
        if session.goal_degenerate() { " [degenerate]" } else { "" },
    );
    Ok(session)
}

fn game_loop(
    game: &mut Game,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    honor_release: bool,
) -> Result<(), Box<dyn Error>> {
    let mut kb = InputState::new();
    kb.honor_release = honor_release;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || handle_meta(game, sound, &kb, &gp, config)? {
            break;
        }

        if !game.paused {
            let (dx, dy) = kb.drag_delta();
            let sens = config.navigator.drag_sensitivity;
            // Dragging up looks up; terminal rows grow downward.
            game.pending_look.yaw += dx as f32 * sens;
            game.pending_look.pitch -= dy as f32 * sens;
        }

        if last_tick.elapsed() >= tick_rate {
            if !game.paused {
                let input = TickInput {
                    motion: detect_motion(&kb, &gp),
                    look: take_look(game, &kb, &gp, config),
                };
                let events = step(&mut game.session, &input);
                process_events(game, sound, &events);
            }
            last_tick = Instant::now();
        }

        let overlay = Overlay {
            seed: game.seed,
            paused: game.paused,
            message: &game.message,
            gamepad: gp.connected,
        };
        renderer.render(&game.session, &overlay)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Meta keys: quit, pause, new maze. Returns true to quit.
fn handle_meta(
    game: &mut Game,
    sound: Option<&SoundEngine>,
    kb: &InputState,
    gp: &GamepadState,
    config: &GameConfig,
) -> Result<bool, Box<dyn Error>> {
    if kb.any_pressed(&[KeyCode::Esc]) || gp.quit_pressed() {
        return Ok(true);
    }

    if kb.any_pressed(&[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)]) || gp.pause_pressed() {
        game.paused = !game.paused;
        log::debug!("paused: {}", game.paused);
    }

    if kb.any_pressed(&[KeyCode::Char('n'), KeyCode::Char('N')]) || gp.new_maze_pressed() {
        let seed = rand::thread_rng().gen();
        game.session = start_session(config, seed)?;
        game.seed = seed;
        game.paused = false;
        game.message.clear();
        game.pending_look = LookDelta::default();
        game.bumping = false;
        if let Some(sfx) = sound {
            sfx.play_new_maze();
        }
    }

    Ok(false)
}

fn detect_motion(kb: &InputState, gp: &GamepadState) -> MotionInput {
    let (up, down, left, right) = gp.dpad();
    let (stick_x, stick_y) = gp.move_stick();
    MotionInput {
        forward: up || kb.any_active(&[KeyCode::Char('w'), KeyCode::Char('W')]),
        back: down || kb.any_active(&[KeyCode::Char('s'), KeyCode::Char('S')]),
        strafe_left: left || kb.any_active(&[KeyCode::Char('a'), KeyCode::Char('A')]),
        strafe_right: right || kb.any_active(&[KeyCode::Char('d'), KeyCode::Char('D')]),
        stick_x,
        // gilrs reports stick up as positive y, which is forward.
        stick_y,
    }
}

/// Combine keyboard turning, right-stick look and accumulated drag.
fn take_look(game: &mut Game, kb: &InputState, gp: &GamepadState, config: &GameConfig) -> LookDelta {
    let nav = &config.navigator;
    let mut look = std::mem::take(&mut game.pending_look);

    let turn_left = kb.any_active(&[KeyCode::Left, KeyCode::Char('q'), KeyCode::Char('Q')]);
    let turn_right = kb.any_active(&[KeyCode::Right, KeyCode::Char('e'), KeyCode::Char('E')]);
    if turn_left { look.yaw -= nav.turn_rate; }
    if turn_right { look.yaw += nav.turn_rate; }
    if kb.any_active(&[KeyCode::Up]) { look.pitch += nav.pitch_rate; }
    if kb.any_active(&[KeyCode::Down]) { look.pitch -= nav.pitch_rate; }

    let (rx, ry) = gp.look_stick();
    look.yaw += rx * nav.stick_look_rate;
    look.pitch += ry * nav.stick_look_rate;

    look
}

fn process_events(game: &mut Game, sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let bumped = events.iter().any(|e| matches!(e, GameEvent::Bumped { .. }));
    if bumped && !game.bumping {
        if let Some(sfx) = sound {
            sfx.play_bump();
        }
    }
    game.bumping = bumped;

    if events.contains(&GameEvent::GoalReached) {
        game.message = WIN_MESSAGE.to_string();
        if let Some(sfx) = sound {
            sfx.play_goal();
        }
    }
}
