/// Gamepad input tracker using gilrs.
///
/// Button mapping for actions is loaded from config.toml via
/// `load_button_config()`. Fixed mapping:
///   Left Stick   →  Analog move (y forward, x strafe)
///   D-pad        →  Digital move
///   Right Stick  →  Look
/// Default actions: Start = new maze, Select = quit, Y = pause.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use mazewalk::config::GamepadConfig;

const STICK_DEADZONE: f32 = 0.15;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    new_maze: Vec<Btn>,
    quit: Vec<Btn>,
    pause: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            new_maze: vec![Btn::Start],
            quit: vec![Btn::Select],
            pause: vec![Btn::Y],
        }
    }
}

/// Raw stick axes, deadzone applied on read.
#[derive(Clone, Copy, Debug, Default)]
struct Sticks {
    left_x: f32,
    left_y: f32,
    right_x: f32,
    right_y: f32,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Edge-triggered presses since the last `update()`.
    just_pressed: [bool; BTN_COUNT],
    dpad_up: bool,
    dpad_down: bool,
    dpad_left: bool,
    dpad_right: bool,
    sticks: Sticks,

    action_map: ActionMap,

    pub connected: bool,
}

fn deadzone(v: f32) -> f32 {
    if v.abs() < STICK_DEADZONE { 0.0 } else { v }
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::info!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            just_pressed: [false; BTN_COUNT],
            dpad_up: false,
            dpad_down: false,
            dpad_left: false,
            dpad_right: false,
            sticks: Sticks::default(),
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load action mapping from config. Unknown names are skipped; an
    /// action with no valid names keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let nm = parse_list(&cfg.new_maze);
        if !nm.is_empty() { map.new_maze = nm; }
        let q = parse_list(&cfg.quit);
        if !q.is_empty() { map.quit = q; }
        let p = parse_list(&cfg.pause);
        if !p.is_empty() { map.pause = p; }
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.sticks.left_x = value,
                        Axis::LeftStickY => self.sticks.left_y = value,
                        Axis::RightStickX => self.sticks.right_x = value,
                        Axis::RightStickY => self.sticks.right_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    self.connected = true;
                    log::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                    log::info!("gamepad disconnected");
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        match gilrs_btn {
            Button::DPadUp => { self.dpad_up = held; return; }
            Button::DPadDown => { self.dpad_down = held; return; }
            Button::DPadLeft => { self.dpad_left = held; return; }
            Button::DPadRight => { self.dpad_right = held; return; }
            _ => {}
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            if held {
                self.just_pressed[btn as usize] = true;
            }
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[b as usize])
    }

    pub fn new_maze_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.new_maze)
    }
    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.quit)
    }
    pub fn pause_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.pause)
    }

    // ── Movement / look ──

    pub fn dpad(&self) -> (bool, bool, bool, bool) {
        (self.dpad_up, self.dpad_down, self.dpad_left, self.dpad_right)
    }

    /// Left stick (x right, y forward), deadzone applied.
    pub fn move_stick(&self) -> (f32, f32) {
        (deadzone(self.sticks.left_x), deadzone(self.sticks.left_y))
    }

    /// Right stick (x turn right, y look up), deadzone applied.
    pub fn look_stick(&self) -> (f32, f32) {
        (deadzone(self.sticks.right_x), deadzone(self.sticks.right_y))
    }

    // ── Internal ──

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.dpad_up = false;
        self.dpad_down = false;
        self.dpad_left = false;
        self.dpad_right = false;
        self.sticks = Sticks::default();
    }
}
