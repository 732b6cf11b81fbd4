//! Geometry kernel for taut cable routing
//!
//! Segment/segment and segment/circle tests, the tangent lines between two
//! circles, and which side of a directed segment a point lies on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which way the cable wraps an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Contact points of one tangent line: on the first circle, then the second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TangentPair {
    pub from: Vec2,
    pub to: Vec2,
}

/// Tangent family: outer lines (both circles on one side) or crossing lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TangentFamily {
    External,
    Internal,
}

impl TangentFamily {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            TangentFamily::External => 1.0,
            TangentFamily::Internal => -1.0,
        }
    }
}

/// Whether segment `a`-`b` passes closer than `radius` to `center`
///
/// The center is projected onto the segment (clamped to its ends) and the
/// squared distance compared against `radius²`, so a zero radius never hits.
pub fn line_circle_intersect(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let line = b - a;
    let to_center = center - a;
    let len_sq = line.length_squared();

    let closest = if len_sq < f32::EPSILON {
        a
    } else {
        let u = (to_center.dot(line) / len_sq).clamp(0.0, 1.0);
        a + line * u
    };

    closest.distance_squared(center) < radius * radius
}

/// Whether segments `a1`-`b1` and `a2`-`b2` cross
///
/// Parametric test with both `s` and `t` in `[0, 1]`. Parallel or degenerate
/// segments divide by zero and never report a hit.
pub fn line_line_intersect(a1: Vec2, b1: Vec2, a2: Vec2, b2: Vec2) -> bool {
    let s1 = b1 - a1;
    let s2 = b2 - a2;
    let denom = -s2.x * s1.y + s1.x * s2.y;

    let s = (-s1.y * (a1.x - a2.x) + s1.x * (a1.y - a2.y)) / denom;
    let t = (s2.x * (a1.y - a2.y) - s2.y * (a1.x - a2.x)) / denom;

    (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
}

/// One tangent line between circle (`p1`, `r1`) and circle (`p2`, `r2`)
///
/// Solves `v·n = (r1 - sign1·r2) / d` for the unit normal `n`, with `v` the unit
/// vector from `p1` to `p2`. `branch` (±1) picks one of the two solutions.
/// Returns `None` when one circle contains the other, or when the family has no
/// real solution (internal tangents of overlapping circles).
pub fn tangent_line(
    p1: Vec2,
    r1: f32,
    p2: Vec2,
    r2: f32,
    family: TangentFamily,
    branch: f32,
) -> Option<TangentPair> {
    let d_sq = p1.distance_squared(p2);
    if d_sq <= (r1 - r2) * (r1 - r2) {
        return None;
    }
    let d = d_sq.sqrt();
    let v = (p2 - p1) / d;

    let sign1 = family.sign();
    let c = (r1 - sign1 * r2) / d;
    if c * c > 1.0 {
        return None;
    }
    let h = (1.0 - c * c).max(0.0).sqrt();
    let n = Vec2::new(v.x * c - branch * h * v.y, v.y * c + branch * h * v.x);

    Some(TangentPair {
        from: p1 + n * r1,
        to: p2 + n * (sign1 * r2),
    })
}

/// All tangent lines between two circles, external family first
///
/// Up to four pairs; empty when one circle contains the other.
pub fn tangents(p1: Vec2, r1: f32, p2: Vec2, r2: f32) -> Vec<TangentPair> {
    [TangentFamily::External, TangentFamily::Internal]
        .into_iter()
        .flat_map(|family| [1.0, -1.0].map(|branch| (family, branch)))
        .filter_map(|(family, branch)| tangent_line(p1, r1, p2, r2, family, branch))
        .collect()
}

/// The tangent a cable follows from an obstacle wrapped on `from_side` to one
/// wrapped on `to_side`
///
/// Same-side wraps use the external family, opposite-side wraps cross over on
/// the internal family.
pub fn wrap_tangent(
    p1: Vec2,
    r1: f32,
    from_side: Side,
    p2: Vec2,
    r2: f32,
    to_side: Side,
) -> Option<TangentPair> {
    let (family, branch) = match (from_side, to_side) {
        (Side::Left, Side::Left) => (TangentFamily::External, -1.0),
        (Side::Right, Side::Right) => (TangentFamily::External, 1.0),
        (Side::Left, Side::Right) => (TangentFamily::Internal, -1.0),
        (Side::Right, Side::Left) => (TangentFamily::Internal, 1.0),
    };
    tangent_line(p1, r1, p2, r2, family, branch)
}

/// Which side of the directed segment `p1`→`p2` the point `p` lies on
///
/// A positive cross product is `Left`; collinear points count as `Right`.
pub fn side_of_line(p1: Vec2, p2: Vec2, p: Vec2) -> Side {
    if (p2 - p1).perp_dot(p - p1) > 0.0 {
        Side::Left
    } else {
        Side::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_line_circle_hit_and_miss() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        assert!(line_circle_intersect(a, b, Vec2::new(50.0, 10.0), 20.0));
        assert!(!line_circle_intersect(a, b, Vec2::new(50.0, 30.0), 20.0));
        // Beyond the end of the segment only the endpoint distance counts
        assert!(!line_circle_intersect(a, b, Vec2::new(130.0, 0.0), 20.0));
        assert!(line_circle_intersect(a, b, Vec2::new(110.0, 0.0), 20.0));
    }

    #[test]
    fn test_line_circle_zero_radius_never_hits() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        assert!(!line_circle_intersect(a, b, Vec2::new(50.0, 0.0), 0.0));
    }

    #[test]
    fn test_line_line_crossing() {
        assert!(line_line_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        ));
        assert!(!line_line_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 5.0),
            Vec2::new(10.0, 5.0),
        ));
        // Would cross if extended, but not within the segments
        assert!(!line_line_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        ));
    }

    #[test]
    fn test_line_line_same_segment_is_not_a_crossing() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(30.0, -2.0);
        assert!(!line_line_intersect(a, b, a, b));
    }

    #[test]
    fn test_tangents_separate_circles_has_four() {
        let t = tangents(Vec2::ZERO, 10.0, Vec2::new(100.0, 0.0), 20.0);
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn test_tangents_overlapping_circles_external_only() {
        let t = tangents(Vec2::ZERO, 30.0, Vec2::new(40.0, 0.0), 30.0);
        assert_eq!(t.len(), 2);
        assert!(
            tangent_line(Vec2::ZERO, 30.0, Vec2::new(40.0, 0.0), 30.0, TangentFamily::Internal, 1.0)
                .is_none()
        );
    }

    #[test]
    fn test_tangents_contained_circle_is_empty() {
        // d² ≤ (r1 - r2)²
        assert!(tangents(Vec2::ZERO, 50.0, Vec2::new(10.0, 0.0), 5.0).is_empty());
        assert!(tangents(Vec2::ZERO, 20.0, Vec2::ZERO, 20.0).is_empty());
        // A point inside a circle
        assert!(tangents(Vec2::new(50.0, 360.0), 0.0, Vec2::new(60.0, 360.0), 40.0).is_empty());
    }

    #[test]
    fn test_point_to_point_tangent_is_the_segment() {
        let a = Vec2::new(50.0, 360.0);
        let b = Vec2::new(110.0, 360.0);
        let t = wrap_tangent(a, 0.0, Side::Left, b, 0.0, Side::Left).unwrap();
        assert!(t.from.distance(a) < 1e-4);
        assert!(t.to.distance(b) < 1e-4);
    }

    #[test]
    fn test_left_wrap_touches_top_of_lower_spool() {
        // Spool just below a horizontal cable: the cable catches its top edge (y down)
        let start = Vec2::new(50.0, 360.0);
        let spool = Vec2::new(640.0, 380.0);
        let t = wrap_tangent(start, 0.0, Side::Left, spool, 50.0, Side::Left).unwrap();
        assert!(t.to.y < spool.y - 45.0);
    }

    #[test]
    fn test_wrap_tangent_touches_each_circle_on_its_wrap_side() {
        let p1 = Vec2::new(0.0, 0.0);
        let p2 = Vec2::new(100.0, 0.0);
        for from_side in [Side::Left, Side::Right] {
            for to_side in [Side::Left, Side::Right] {
                let t = wrap_tangent(p1, 10.0, from_side, p2, 10.0, to_side).unwrap();
                assert_eq!(side_of_line(t.from, t.to, p1), from_side, "{from_side:?} -> {to_side:?}");
                assert_eq!(side_of_line(t.from, t.to, p2), to_side, "{from_side:?} -> {to_side:?}");
            }
        }
    }

    #[test]
    fn test_left_to_right_crossover_contacts() {
        let t = wrap_tangent(Vec2::ZERO, 10.0, Side::Left, Vec2::new(100.0, 0.0), 10.0, Side::Right)
            .unwrap();
        assert!(t.from.distance(Vec2::new(2.0, -9.8)) < 1e-2);
        assert!(t.to.distance(Vec2::new(98.0, 9.8)) < 1e-2);
    }

    #[test]
    fn test_side_of_line() {
        let p1 = Vec2::new(0.0, 0.0);
        let p2 = Vec2::new(10.0, 0.0);
        assert_eq!(side_of_line(p1, p2, Vec2::new(5.0, 5.0)), Side::Left);
        assert_eq!(side_of_line(p1, p2, Vec2::new(5.0, -5.0)), Side::Right);
        assert_eq!(side_of_line(p1, p2, Vec2::new(5.0, 0.0)), Side::Right);
    }

    proptest! {
        #[test]
        fn prop_tangent_is_perpendicular_to_both_radii(
            x1 in -500.0f32..500.0,
            y1 in -500.0f32..500.0,
            x2 in -500.0f32..500.0,
            y2 in -500.0f32..500.0,
            r1 in 0.0f32..80.0,
            r2 in 0.0f32..80.0,
            internal in any::<bool>(),
            left in any::<bool>(),
        ) {
            let p1 = Vec2::new(x1, y1);
            let p2 = Vec2::new(x2, y2);
            let family = if internal { TangentFamily::Internal } else { TangentFamily::External };
            let branch = if left { -1.0 } else { 1.0 };

            if let Some(t) = tangent_line(p1, r1, p2, r2, family, branch) {
                let dir = t.to - t.from;
                prop_assume!(dir.length() > 1.0);
                let dir = dir.normalize();
                let radius1 = t.from - p1;
                let radius2 = t.to - p2;
                prop_assert!((radius1.length() - r1).abs() < 1e-2);
                prop_assert!((radius2.length() - r2).abs() < 1e-2);
                prop_assert!(radius1.dot(dir).abs() < 1e-2 * r1.max(1.0));
                prop_assert!(radius2.dot(dir).abs() < 1e-2 * r2.max(1.0));
            }
        }

        #[test]
        fn prop_contained_circles_have_no_tangents(
            x in -100.0f32..100.0,
            y in -100.0f32..100.0,
            r1 in 50.0f32..100.0,
            r2 in 0.0f32..20.0,
            frac in 0.0f32..0.9,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let p1 = Vec2::new(x, y);
            let offset = (r1 - r2) * frac;
            let p2 = p1 + Vec2::new(angle.cos(), angle.sin()) * offset;
            prop_assert!(tangents(p1, r1, p2, r2).is_empty());
        }
    }
}
