//! Dragging the cable end
//!
//! The pointer is polled once per tick. [`DragControl`] turns it into a
//! handle position, then [`guard_handle`] keeps that position legal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Spool;
use crate::consts::*;

/// Grab/hover/release tracking for the end handle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragControl {
    /// Pointer is over the handle
    pub hover: bool,
    /// Handle follows the pointer
    pub dragging: bool,
    /// Pointer minus handle, captured on grab
    pub offset: Vec2,
    /// Button state of the previous tick (for press edges)
    was_down: bool,
}

impl DragControl {
    /// Feed this tick's pointer sample, returning where the handle should go
    ///
    /// A press that starts over the handle grabs it; the grab point then stays
    /// fixed relative to the pointer until the button is released.
    pub fn update(&mut self, handle: Vec2, pointer: Vec2, down: bool) -> Vec2 {
        self.hover = pointer.distance(handle) <= END_GRAB_RADIUS;

        let pressed = down && !self.was_down;
        self.was_down = down;

        if pressed && self.hover {
            self.dragging = true;
            self.offset = pointer - handle;
            log::debug!("Handle grabbed at offset {:?}", self.offset);
        } else if !down && self.dragging {
            self.dragging = false;
            log::debug!("Handle released");
        }

        if self.dragging {
            pointer - self.offset
        } else {
            handle
        }
    }
}

/// Result of guarding the handle position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardedHandle {
    pub pos: Vec2,
    /// Handle sits on the finish target
    pub connected: bool,
}

/// Keep the handle inside the level, clear of spools, and snap it to the finish
///
/// Spools and isolators push the handle radially out to `SPOOL_CLEARANCE`
/// beyond their radius (to the right if it sits exactly on a center). Within
/// `FINISH_SNAP_RADIUS` of the finish the handle lands exactly on it.
pub fn guard_handle(pos: Vec2, spools: &[Spool], finish: Vec2) -> GuardedHandle {
    let mut pos = pos.clamp(Vec2::ZERO, Vec2::new(LEVEL_WIDTH, LEVEL_HEIGHT));

    for spool in spools.iter().filter(|s| s.kind.blocks_drag()) {
        let min_dist = SPOOL_CLEARANCE + spool.radius;
        if pos.distance(spool.pos) < min_dist {
            let mut dir = (pos - spool.pos).normalize_or_zero();
            if dir == Vec2::ZERO {
                dir = Vec2::X;
            }
            pos = spool.pos + dir * min_dist;
        }
    }

    if pos.distance(finish) < FINISH_SNAP_RADIUS {
        GuardedHandle {
            pos: finish,
            connected: true,
        }
    } else {
        GuardedHandle {
            pos,
            connected: false,
        }
    }
}
