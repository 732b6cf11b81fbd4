//! Level state and core simulation types
//!
//! Obstacles live in an arena addressed by [`SpoolId`]; the cable refers to
//! them by handle only.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::drag::DragControl;
use super::geometry::Side;
use super::power::PowerReport;
use crate::level::LevelData;

/// Stable handle of an obstacle in [`LevelState::spools`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpoolId(pub usize);

/// Obstacle kinds the cable can wrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpoolKind {
    /// Power consumer, must be powered to win
    #[default]
    Normal,
    /// Toggles isolation of the cable after it
    Isolator,
    /// Fixed cable origin (radius 0)
    Start,
    /// Player-dragged cable end (radius 0)
    End,
}

impl SpoolKind {
    /// Whether the end handle is pushed away from this obstacle
    pub fn blocks_drag(self) -> bool {
        matches!(self, SpoolKind::Normal | SpoolKind::Isolator)
    }
}

/// A circular obstacle the cable may wrap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spool {
    pub id: SpoolId,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: SpoolKind,
}

impl Spool {
    pub fn new(id: SpoolId, pos: Vec2, radius: f32, kind: SpoolKind) -> Self {
        Self {
            id,
            pos,
            radius,
            kind,
        }
    }
}

/// A static circular hazard the cable must not touch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub pos: Vec2,
    pub radius: f32,
}

/// One wrap of the cable around an obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub spool: SpoolId,
    pub side: Side,
    /// Contact point of the incoming segment
    pub in_pos: Vec2,
    /// Contact point of the outgoing segment
    pub out_pos: Vec2,
    /// Cable from here to the next isolator carries no power
    pub isolated: bool,
    /// Segment starting here is faulty (crossing, block contact, double wrap)
    pub overlap: bool,
}

impl Attachment {
    /// Attachment with both contact points at the obstacle center
    pub fn new(spool: &Spool, side: Side) -> Self {
        Self {
            spool: spool.id,
            side,
            in_pos: spool.pos,
            out_pos: spool.pos,
            isolated: false,
            overlap: false,
        }
    }
}

/// The single cable of a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cable {
    /// Ordered wraps from the start marker to the end marker
    pub attachments: Vec<Attachment>,
    /// Per-spool "currently part of the path", indexed by [`SpoolId`]
    attached: Vec<bool>,
}

impl Cable {
    /// A straight cable from `start` to `end` over an arena of `spool_count`
    pub fn new(start: &Spool, end: &Spool, spool_count: usize) -> Self {
        let mut attached = vec![false; spool_count];
        attached[start.id.0] = true;
        attached[end.id.0] = true;
        Self {
            attachments: vec![Attachment::new(start, Side::Left), Attachment::new(end, Side::Left)],
            attached,
        }
    }

    #[inline]
    pub fn is_attached(&self, id: SpoolId) -> bool {
        self.attached.get(id.0).copied().unwrap_or(false)
    }

    /// Splice a wrap in at `index`, marking its spool attached
    pub fn insert(&mut self, index: usize, attachment: Attachment) {
        self.attached[attachment.spool.0] = true;
        self.attachments.insert(index, attachment);
    }

    /// Remove the wrap at `index`, clearing its spool's attached flag
    pub fn remove(&mut self, index: usize) -> Attachment {
        let attachment = self.attachments.remove(index);
        self.attached[attachment.spool.0] = false;
        attachment
    }

    /// Number of straight segments (one less than the wraps)
    pub fn segment_count(&self) -> usize {
        self.attachments.len().saturating_sub(1)
    }

    /// Straight segment `i`: from wrap `i` out-point to wrap `i + 1` in-point
    pub fn segment(&self, i: usize) -> (Vec2, Vec2) {
        (self.attachments[i].out_pos, self.attachments[i + 1].in_pos)
    }

    /// Clear per-tick fault flags
    pub fn reset_faults(&mut self) {
        for attachment in &mut self.attachments {
            attachment.overlap = false;
        }
    }
}

/// The finish target the end handle snaps onto
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finish {
    pub pos: Vec2,
    pub connected: bool,
}

/// Complete state of one level instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    /// Obstacle arena: normal spools, isolators, then start and end markers
    pub spools: Vec<Spool>,
    pub blocks: Vec<Block>,
    pub cable: Cable,
    pub finish: Finish,
    pub start: SpoolId,
    pub end: SpoolId,
    /// Initial handle position (for re-export of the layout)
    pub end_home: Vec2,
    /// Number of normal spools that must be powered
    pub total_spools: usize,
    /// Electrical state of the last tick
    pub power: PowerReport,
    /// Pointer drag tracking for the end handle
    pub drag: DragControl,
    /// Win condition was reached (latched)
    pub completed: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl LevelState {
    /// Build a level from its data: spools, isolators, start, end (in that order)
    pub fn new(data: &LevelData) -> Self {
        let mut spools = Vec::with_capacity(data.spools.len() + data.isolators.len() + 2);
        let mut push = |pos: Vec2, radius: f32, kind: SpoolKind| {
            let id = SpoolId(spools.len());
            spools.push(Spool::new(id, pos, radius, kind));
            id
        };

        for &[x, y, r] in &data.spools {
            push(Vec2::new(x, y), r, SpoolKind::Normal);
        }
        for &[x, y, r] in &data.isolators {
            push(Vec2::new(x, y), r, SpoolKind::Isolator);
        }
        let start = push(Vec2::from(data.start), 0.0, SpoolKind::Start);
        let end = push(Vec2::from(data.end), 0.0, SpoolKind::End);

        let blocks = data
            .blocks
            .iter()
            .map(|&[x, y, r]| Block {
                pos: Vec2::new(x, y),
                radius: r,
            })
            .collect();

        let cable = Cable::new(&spools[start.0], &spools[end.0], spools.len());
        let total_spools = data.spools.len();

        log::info!(
            "Level built: {} spools, {} isolators, {} blocks",
            total_spools,
            data.isolators.len(),
            data.blocks.len()
        );

        Self {
            power: PowerReport::unpowered(spools.len()),
            spools,
            blocks,
            cable,
            finish: Finish {
                pos: Vec2::from(data.finish),
                connected: false,
            },
            start,
            end,
            end_home: Vec2::from(data.end),
            total_spools,
            drag: DragControl::default(),
            completed: false,
            time_ticks: 0,
        }
    }

    #[inline]
    pub fn spool(&self, id: SpoolId) -> &Spool {
        &self.spools[id.0]
    }

    /// Current position of the player-dragged end handle
    pub fn end_pos(&self) -> Vec2 {
        self.spools[self.end.0].pos
    }

    /// Number of normal spools powered last tick
    pub fn powered_spools(&self) -> usize {
        self.power.powered_spools
    }

    /// On-screen progress, e.g. `"1 / 3"`
    pub fn progress_text(&self) -> String {
        format!("{} / {}", self.power.powered_spools, self.total_spools)
    }
}
