//! Taut cable resolution
//!
//! Keeps the attachment path equal to the route a stretched string would take
//! around the spools: intruded spools are spliced in, spools the cable has
//! lifted off are released. Both passes run to a fixpoint every tick.

use glam::Vec2;

use super::geometry::{Side, line_circle_intersect, side_of_line, wrap_tangent};
use super::state::{Attachment, Cable, Spool, SpoolId};
use crate::consts::{RELEASE_LEFT_ANGLE, RELEASE_RIGHT_ANGLE};
use crate::turn_angle;

/// Mutations made while settling the cable for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    pub attached: usize,
    pub released: usize,
    /// Tangent pairs that had no solution and fell back to spool centers
    pub degenerate_pairs: usize,
}

/// Recompute contact points of segment `i` (wrap `i` to wrap `i + 1`)
///
/// Returns `false` if no tangent exists; both contact points then fall back to
/// the spool centers.
fn settle_segment(attachments: &mut [Attachment], i: usize, spools: &[Spool]) -> bool {
    let sa = &spools[attachments[i].spool.0];
    let sb = &spools[attachments[i + 1].spool.0];

    match wrap_tangent(
        sa.pos,
        sa.radius,
        attachments[i].side,
        sb.pos,
        sb.radius,
        attachments[i + 1].side,
    ) {
        Some(t) => {
            attachments[i].out_pos = t.from;
            attachments[i + 1].in_pos = t.to;
            true
        }
        None => {
            attachments[i].out_pos = sa.pos;
            attachments[i + 1].in_pos = sb.pos;
            false
        }
    }
}

/// Recompute every contact point along the path, returning the number of
/// degenerate segments
pub fn refresh_tangents(cable: &mut Cable, spools: &[Spool]) -> usize {
    (0..cable.segment_count())
        .filter(|&i| !settle_segment(&mut cable.attachments, i, spools))
        .count()
}

/// Spools whose circle the segment `a`-`b` cuts, excluding the segment's own
/// wraps, nearest to `a` first (ties keep arena order)
pub fn intersections<'a>(
    a: Vec2,
    b: Vec2,
    spools: &'a [Spool],
    ignore: [SpoolId; 2],
) -> Vec<&'a Spool> {
    let mut hits: Vec<&Spool> = spools
        .iter()
        .filter(|s| !ignore.contains(&s.id))
        .filter(|s| line_circle_intersect(a, b, s.pos, s.radius))
        .collect();
    hits.sort_by(|x, y| {
        x.pos
            .distance_squared(a)
            .partial_cmp(&y.pos.distance_squared(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits
}

/// A spool that could not be wrapped between two neighbours: (before, spool, after)
type Skip = (SpoolId, SpoolId, SpoolId);

/// A free spool cutting the segment after wrap `index`
struct Intrusion {
    index: usize,
    spool: SpoolId,
}

/// First segment whose nearest intruding spool is free
///
/// Segments whose nearest intruder is already part of the cable are flagged
/// `overlap` and passed over.
fn find_intrusion(cable: &mut Cable, spools: &[Spool], skip: &[Skip]) -> Option<Intrusion> {
    for index in 0..cable.segment_count() {
        let (from, to) = cable.segment(index);
        let [before, after] = [
            cable.attachments[index].spool,
            cable.attachments[index + 1].spool,
        ];
        let Some(nearest) = intersections(from, to, spools, [before, after])
            .into_iter()
            .map(|s| s.id)
            .find(|&id| !skip.contains(&(before, id, after)))
        else {
            continue;
        };

        if cable.is_attached(nearest) {
            cable.attachments[index].overlap = true;
        } else {
            return Some(Intrusion {
                index,
                spool: nearest,
            });
        }
    }
    None
}

/// Splice intruding spools into the path until no segment cuts a free spool
///
/// A spool without valid wrap tangents to its would-be neighbours is skipped
/// for that segment until the next tick. Returns `(attached, skipped)` counts.
pub fn resolve_connections(cable: &mut Cable, spools: &[Spool]) -> (usize, usize) {
    let mut skipped: Vec<Skip> = Vec::new();
    let mut attached = 0;

    loop {
        match find_intrusion(cable, spools, &skipped) {
            Some(Intrusion { index, spool }) => {
                let a = &cable.attachments[index];
                let b = &cable.attachments[index + 1];
                let (a_id, b_id) = (a.spool, b.spool);
                let (sa, sn, sb) = (&spools[a_id.0], &spools[spool.0], &spools[b_id.0]);
                let side = side_of_line(a.out_pos, b.in_pos, sn.pos);

                let incoming = wrap_tangent(sa.pos, sa.radius, a.side, sn.pos, sn.radius, side);
                let outgoing = wrap_tangent(sn.pos, sn.radius, side, sb.pos, sb.radius, b.side);

                match (incoming, outgoing) {
                    (Some(incoming), Some(outgoing)) => {
                        let mut wrap = Attachment::new(sn, side);
                        wrap.in_pos = incoming.to;
                        wrap.out_pos = outgoing.from;
                        cable.attachments[index].out_pos = incoming.from;
                        cable.attachments[index + 1].in_pos = outgoing.to;
                        cable.insert(index + 1, wrap);
                        attached += 1;
                        log::debug!("Spool {} attached ({:?})", spool.0, side);
                    }
                    _ => {
                        log::debug!("Spool {} has no wrap tangent, skipped this tick", spool.0);
                        skipped.push((a_id, spool, b_id));
                    }
                }
            }
            None => break,
        }
    }

    (attached, skipped.len())
}

/// Interior wrap the cable no longer bends around
fn find_slack(cable: &Cable) -> Option<usize> {
    let wraps = &cable.attachments;
    (1..wraps.len().saturating_sub(1)).find(|&i| {
        let (a, b, c) = (&wraps[i - 1], &wraps[i], &wraps[i + 1]);
        let angle = turn_angle(b.in_pos - a.out_pos, c.in_pos - b.out_pos);
        match b.side {
            Side::Left => angle > RELEASE_LEFT_ANGLE,
            Side::Right => angle < RELEASE_RIGHT_ANGLE,
        }
    })
}

/// Release interior wraps until every remaining one still bends the cable
///
/// The first and last wraps (start and end markers) are never released.
/// Returns the number of released spools.
pub fn resolve_disconnections(cable: &mut Cable, spools: &[Spool]) -> usize {
    let mut released = 0;
    while let Some(index) = find_slack(cable) {
        let wrap = cable.remove(index);
        settle_segment(&mut cable.attachments, index - 1, spools);
        released += 1;
        log::debug!("Spool {} released", wrap.spool.0);
    }
    released
}

/// Refresh contact points, then attach and release spools until settled
pub fn settle(cable: &mut Cable, spools: &[Spool]) -> SettleReport {
    let degenerate = refresh_tangents(cable, spools);
    let (attached, skipped) = resolve_connections(cable, spools);
    let released = resolve_disconnections(cable, spools);
    SettleReport {
        attached,
        released,
        degenerate_pairs: degenerate + skipped,
    }
}
