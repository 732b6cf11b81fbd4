//! Read-only frame snapshot for whatever draws the level
//!
//! Everything a renderer or the UI needs after a tick, flattened into plain
//! serializable data.

use glam::Vec2;
use serde::Serialize;

use super::geometry::Side;
use super::state::{LevelState, SpoolKind};

/// One straight cable segment
#[derive(Debug, Clone, Serialize)]
pub struct SegmentView {
    pub from: Vec2,
    pub to: Vec2,
    /// Drawn as faulty
    pub overlap: bool,
    /// Carries no power
    pub isolated: bool,
}

/// Cable contact arc on a wrapped obstacle
#[derive(Debug, Clone, Serialize)]
pub struct WrapView {
    pub center: Vec2,
    pub radius: f32,
    pub side: Side,
    pub in_pos: Vec2,
    pub out_pos: Vec2,
}

/// An obstacle with its electrical state
#[derive(Debug, Clone, Serialize)]
pub struct SpoolView {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: SpoolKind,
    pub powered: bool,
    pub overpowered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockView {
    pub pos: Vec2,
    pub radius: f32,
}

/// Complete drawable state after one tick
#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub segments: Vec<SegmentView>,
    pub wraps: Vec<WrapView>,
    pub spools: Vec<SpoolView>,
    pub blocks: Vec<BlockView>,
    pub finish: Vec2,
    pub finish_connected: bool,
    pub end: Vec2,
    pub end_hover: bool,
    pub cable_overpowered: bool,
    pub powered: usize,
    pub total: usize,
    pub progress: String,
    pub completed: bool,
}

impl FrameView {
    /// Snapshot the state left by the last tick
    pub fn capture(state: &LevelState) -> Self {
        let cable = &state.cable;

        let segments = (0..cable.segment_count())
            .map(|i| {
                let (from, to) = cable.segment(i);
                let wrap = &cable.attachments[i];
                SegmentView {
                    from,
                    to,
                    overlap: wrap.overlap,
                    isolated: wrap.isolated,
                }
            })
            .collect();

        // Markers have no radius, so there is no arc to draw
        let wraps = cable
            .attachments
            .iter()
            .map(|a| (a, state.spool(a.spool)))
            .filter(|(_, spool)| spool.radius > 0.0)
            .map(|(a, spool)| WrapView {
                center: spool.pos,
                radius: spool.radius,
                side: a.side,
                in_pos: a.in_pos,
                out_pos: a.out_pos,
            })
            .collect();

        let spools = state
            .spools
            .iter()
            .map(|s| SpoolView {
                pos: s.pos,
                radius: s.radius,
                kind: s.kind,
                powered: state.power.is_powered(s.id),
                overpowered: state.power.is_overpowered(s.id),
            })
            .collect();

        let blocks = state
            .blocks
            .iter()
            .map(|b| BlockView {
                pos: b.pos,
                radius: b.radius,
            })
            .collect();

        Self {
            segments,
            wraps,
            spools,
            blocks,
            finish: state.finish.pos,
            finish_connected: state.finish.connected,
            end: state.end_pos(),
            end_hover: state.drag.hover || state.drag.dragging,
            cable_overpowered: state.power.cable_overpowered,
            powered: state.powered_spools(),
            total: state.total_spools,
            progress: state.progress_text(),
            completed: state.completed,
        }
    }
}
