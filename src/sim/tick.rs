//! Per-frame simulation tick
//!
//! Drag guard, then cable settling, then fault and power evaluation. Every
//! step runs to completion; nothing is carried between ticks except the
//! cable's attachment path and the drag state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::drag::guard_handle;
use super::power::{evaluate_faults, flow_power, is_level_complete};
use super::resolve::settle;
use super::state::LevelState;

/// Input sampled for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in level space
    pub pointer: Vec2,
    /// Primary button / touch held
    pub pointer_down: bool,
}

/// Notifications for the level/UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelEvent {
    /// The powered-spool counter changed
    PoweredChanged { powered: usize, total: usize },
    /// Win condition reached (raised once per level)
    Completed,
}

/// Advance the level by one frame
pub fn tick(state: &mut LevelState, input: &TickInput) -> Vec<LevelEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    // Move and guard the end handle
    let end = state.end.0;
    let handle = state
        .drag
        .update(state.spools[end].pos, input.pointer, input.pointer_down);
    let guarded = guard_handle(handle, &state.spools, state.finish.pos);
    state.spools[end].pos = guarded.pos;
    state.finish.connected = guarded.connected;

    // Re-settle the cable around the new handle position
    state.cable.reset_faults();
    let settled = settle(&mut state.cable, &state.spools);
    if settled.attached > 0 || settled.released > 0 {
        log::debug!(
            "Tick {}: {} attached, {} released, {} wraps",
            state.time_ticks,
            settled.attached,
            settled.released,
            state.cable.attachments.len()
        );
    }

    // Faults and power
    let faults = evaluate_faults(&mut state.cable, &state.spools, &state.blocks);
    let report = flow_power(&state.cable.attachments, &state.spools, faults.block_contact);

    if report.powered_spools != state.power.powered_spools {
        events.push(LevelEvent::PoweredChanged {
            powered: report.powered_spools,
            total: state.total_spools,
        });
    }

    let complete = is_level_complete(&report, state.finish.connected, state.total_spools);
    state.power = report;

    if complete && !state.completed {
        state.completed = true;
        log::info!("Level complete after {} ticks", state.time_ticks);
        events.push(LevelEvent::Completed);
    }

    events
}
