/// The step function: advances a session by one tick.
///
/// Processing order:
///   1. Tick counter
///   2. Freeze check (Won + freeze_on_win: nothing else happens)
///   3. Look (yaw wrap, pitch clamp)
///   4. Displacement -> collision resolution -> commit
///   5. Win check (fires GoalReached once, same tick as the commit)

use crate::domain::collision;
use crate::domain::navigator::{SessionState, TickInput};
use super::event::GameEvent;
use super::motion;
use super::session::Session;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(session: &mut Session, input: &TickInput) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    session.tick += 1;

    if session.navigator.state == SessionState::Won && session.tuning.freeze_on_win {
        return events;
    }

    session.navigator.look(input.look);
    resolve_movement(session, input, &mut events);
    resolve_win(session, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_movement(session: &mut Session, input: &TickInput, events: &mut Vec<GameEvent>) {
    let nav = &session.navigator;
    let delta = motion::displacement(&input.motion, nav.yaw, &session.tuning);
    let res = collision::resolve(
        &session.grid,
        nav.position,
        delta,
        nav.radius,
        session.tuning.cell_size,
    );

    for axis in res.blocked_axes() {
        log::trace!("tick {}: blocked on {:?} at {:?}", session.tick, axis, res.position);
        events.push(GameEvent::Bumped { axis });
    }
    session.navigator.position = res.position;
}

// ══════════════════════════════════════════════════════════════
// Win
// ══════════════════════════════════════════════════════════════

fn resolve_win(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.navigator.state != SessionState::Exploring {
        return;
    }
    if session.at_goal() {
        session.navigator.state = SessionState::Won;
        let goal = session.goal();
        log::info!("goal ({}, {}) reached after {} ticks", goal.row, goal.col, session.tick);
        events.push(GameEvent::GoalReached);
    }
}
