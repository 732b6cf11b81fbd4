//! Fault tagging and power propagation
//!
//! Runs after the cable has settled. Faults (crossings, block contact) are
//! written onto the attachments; the electrical result is a fresh
//! [`PowerReport`] every tick, so nothing carries over between frames.

use serde::{Deserialize, Serialize};

use super::geometry::{line_circle_intersect, line_line_intersect};
use super::state::{Attachment, Block, Cable, Spool, SpoolId, SpoolKind};

/// Faults found on the settled cable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultReport {
    /// Pairs of powered segments that cross
    pub crossings: usize,
    /// Some segment touches a block
    pub block_contact: bool,
}

/// Electrical state of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerReport {
    /// Per spool, indexed by [`SpoolId`]
    pub powered: Vec<bool>,
    /// Per spool, indexed by [`SpoolId`]
    pub overpowered: Vec<bool>,
    /// Cable touches a block or feeds a spool twice
    pub cable_overpowered: bool,
    /// Propagation reached the end of the cable without an overlap fault
    pub has_power: bool,
    /// Powered normal spools
    pub powered_spools: usize,
}

impl PowerReport {
    /// Nothing powered (state before the first tick)
    pub fn unpowered(spool_count: usize) -> Self {
        Self {
            powered: vec![false; spool_count],
            overpowered: vec![false; spool_count],
            cable_overpowered: false,
            has_power: false,
            powered_spools: 0,
        }
    }

    #[inline]
    pub fn is_powered(&self, id: SpoolId) -> bool {
        self.powered.get(id.0).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_overpowered(&self, id: SpoolId) -> bool {
        self.overpowered.get(id.0).copied().unwrap_or(false)
    }
}

/// Flip isolation at every isolator along the path
///
/// The isolator's own wrap takes the flipped value, as does everything up to
/// the next isolator.
pub fn mark_isolation(attachments: &mut [Attachment], spools: &[Spool]) {
    let mut isolated = false;
    for wrap in attachments {
        if spools[wrap.spool.0].kind == SpoolKind::Isolator {
            isolated = !isolated;
        }
        wrap.isolated = isolated;
    }
}

/// Flag both segments of every crossing pair; isolated segments may cross freely
///
/// Neighbouring segments meeting at a collapsed wrap (contact points on the
/// spool center) are not a crossing.
pub fn mark_crossings(attachments: &mut [Attachment]) -> usize {
    let segments = attachments.len().saturating_sub(1);
    let mut crossings = 0;

    for i in 0..segments {
        if attachments[i].isolated {
            continue;
        }
        for j in (i + 1)..segments {
            if attachments[j].isolated {
                continue;
            }
            // Neighbours joined at a collapsed wrap share an endpoint
            if j == i + 1 && attachments[j].in_pos == attachments[j].out_pos {
                continue;
            }
            if line_line_intersect(
                attachments[i].out_pos,
                attachments[i + 1].in_pos,
                attachments[j].out_pos,
                attachments[j + 1].in_pos,
            ) {
                attachments[i].overlap = true;
                attachments[j].overlap = true;
                crossings += 1;
            }
        }
    }
    crossings
}

/// Flag every segment touching a block, isolated or not
pub fn mark_block_contacts(attachments: &mut [Attachment], blocks: &[Block]) -> bool {
    let mut contact = false;
    for i in 0..attachments.len().saturating_sub(1) {
        let (from, to) = (attachments[i].out_pos, attachments[i + 1].in_pos);
        if blocks
            .iter()
            .any(|block| line_circle_intersect(from, to, block.pos, block.radius))
        {
            attachments[i].overlap = true;
            contact = true;
        }
    }
    contact
}

/// Isolation, crossings and block contacts for a settled cable
pub fn evaluate_faults(cable: &mut Cable, spools: &[Spool], blocks: &[Block]) -> FaultReport {
    mark_isolation(&mut cable.attachments, spools);
    let crossings = mark_crossings(&mut cable.attachments);
    let block_contact = mark_block_contacts(&mut cable.attachments, blocks);

    if crossings > 0 || block_contact {
        log::trace!("Cable faults: {} crossings, block contact {}", crossings, block_contact);
    }

    FaultReport {
        crossings,
        block_contact,
    }
}

/// Walk the cable from the start and hand power along it
///
/// Isolated wraps without a fault neither carry nor block power. A spool fed a
/// second time is overpowered and stops the walk. A faulty wrap still powers
/// its spool (without counting it), then power stops there.
pub fn flow_power(attachments: &[Attachment], spools: &[Spool], block_contact: bool) -> PowerReport {
    let mut report = PowerReport::unpowered(spools.len());
    report.cable_overpowered = block_contact;
    let mut has_power = true;

    for wrap in attachments {
        if !has_power {
            break;
        }
        if wrap.isolated && !wrap.overlap {
            continue;
        }

        let id = wrap.spool.0;
        if report.powered[id] {
            report.overpowered[id] = true;
            report.cable_overpowered = true;
            break;
        }

        report.powered[id] = true;
        if wrap.overlap {
            has_power = false;
        } else if spools[id].kind == SpoolKind::Normal {
            report.powered_spools += 1;
        }
    }

    report.has_power = has_power;
    report
}

/// Every normal spool powered, nothing overpowered, end on the finish
pub fn is_level_complete(report: &PowerReport, finish_connected: bool, total_spools: usize) -> bool {
    report.has_power
        && finish_connected
        && !report.cable_overpowered
        && report.powered_spools == total_spools
}
