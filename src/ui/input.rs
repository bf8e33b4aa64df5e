/// Keyboard and mouse state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous movement/turning while a key is held
///   - Edge-triggered actions (new maze, pause) on the initial press
///   - Mouse-drag look: the drag delta since the previous frame
///
/// Release events are honored when the terminal reports them (keyboard
/// enhancement); otherwise keys expire after a short timeout.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,

    /// Last drag position (column, row) while the left button is down.
    drag_anchor: Option<(u16, u16)>,
    /// Accumulated drag delta this frame, in terminal cells.
    drag_delta: (i32, i32),
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
            drag_anchor: None,
            drag_delta: (0, 0),
        }
    }

    /// Drain all pending terminal events and update key/mouse state.
    /// Call this once per frame, before the session tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.drag_delta = (0, 0);

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.on_key(key),
                Ok(Event::Mouse(mouse)) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.drag_anchor = Some((mouse.column, mouse.row));
                    }
                    MouseEventKind::Drag(MouseButton::Left) => {
                        if let Some((ax, ay)) = self.drag_anchor {
                            self.drag_delta.0 += mouse.column as i32 - ax as i32;
                            self.drag_delta.1 += mouse.row as i32 - ay as i32;
                        }
                        self.drag_anchor = Some((mouse.column, mouse.row));
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        self.drag_anchor = None;
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn on_key(&mut self, key: KeyEvent) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Release not trusted; timeout expiry handles it.
            }
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, Instant::now());
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    /// Is any of these keys held, or pressed this frame?
    pub fn any_active(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c) || self.was_pressed(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Mouse drag since the previous frame, in terminal cells (dx, dy).
    pub fn drag_delta(&self) -> (i32, i32) {
        self.drag_delta
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
