// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Geometric predicates and constructors on sweep-plane coordinates.
//
// Every vertex is projected to a point in the (s, t) sweep plane before the
// sweep runs; all ordering decisions during the sweep are made by the
// functions in this module. The formulas keep the floating-point behavior
// of the original SGI code, including the deliberate aliasing of the sign
// tests to the evaluation formulas (the cheap determinant forms lose the
// sign for nearly-vertical edges with tiny s extents).

/// Coordinate scalar used throughout the tessellator.
pub type Real = f32;

/// Sweep events injected beyond this magnitude bound the active edge
/// dictionary from above and below. Input coordinates merely have to be
/// finite; they never compare past the sentinels.
pub const SENTINEL_COORD: Real = 4e30;

/// A position in the projected sweep plane. The sweep advances in
/// lexicographic `(s, t)` order.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct SweepCoord {
    pub s: Real,
    pub t: Real,
}

impl SweepCoord {
    #[inline]
    pub fn new(s: Real, t: Real) -> Self {
        SweepCoord { s, t }
    }
}

/// Lexicographic order, `s` major.
#[inline]
pub fn vert_leq(u: SweepCoord, v: SweepCoord) -> bool {
    u.s < v.s || (u.s == v.s && u.t <= v.t)
}

/// Exact coincidence in the sweep plane.
#[inline]
pub fn vert_eq(u: SweepCoord, v: SweepCoord) -> bool {
    u.s == v.s && u.t == v.t
}

/// Lexicographic order with the roles of `s` and `t` exchanged.
#[inline]
pub fn trans_leq(u: SweepCoord, v: SweepCoord) -> bool {
    u.t < v.t || (u.t == v.t && u.s <= v.s)
}

/// Given `vert_leq(u, v) && vert_leq(v, w)`, evaluates the `t` coordinate
/// of edge `uw` at `v.s` and returns the signed distance from the edge up
/// to `v`. Interpolates from the nearer endpoint, which keeps the result
/// accurate when `v` hugs one end. Returns 0 for a vertical edge.
pub fn edge_eval(u: SweepCoord, v: SweepCoord, w: SweepCoord) -> Real {
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v.t - u.t) + (u.t - w.t) * (gap_l / (gap_l + gap_r))
        } else {
            (v.t - w.t) + (w.t - u.t) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Sign of the distance from edge `uw` up to `v`. Shares the formula of
/// [`edge_eval`] so the two can never disagree in sign; the plain
/// determinant form misclassifies nearly-degenerate gaps.
#[inline]
pub fn edge_sign(u: SweepCoord, v: SweepCoord, w: SweepCoord) -> Real {
    edge_eval(u, v, w)
}

/// [`edge_eval`] with `s` and `t` exchanged; requires the `trans_leq`
/// ordering of the arguments.
pub fn trans_eval(u: SweepCoord, v: SweepCoord, w: SweepCoord) -> Real {
    let gap_l = v.t - u.t;
    let gap_r = w.t - v.t;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v.s - u.s) + (u.s - w.s) * (gap_l / (gap_l + gap_r))
        } else {
            (v.s - w.s) + (w.s - u.s) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Sign-only transposed evaluation.
pub fn trans_sign(u: SweepCoord, v: SweepCoord, w: SweepCoord) -> Real {
    let gap_l = v.t - u.t;
    let gap_r = w.t - v.t;
    if gap_l + gap_r > 0.0 {
        (v.s - w.s) * gap_l + (v.s - u.s) * gap_r
    } else {
        0.0
    }
}

/// True when the triangle `(u, v, w)` winds counter-clockwise (doubled
/// signed area non-negative).
#[inline]
pub fn vert_ccw(u: SweepCoord, v: SweepCoord, w: SweepCoord) -> bool {
    u.s * (v.t - w.t) + v.s * (w.t - u.t) + w.s * (u.t - v.t) >= 0.0
}

/// L1 distance between two sweep-plane points.
#[inline]
pub fn vert_l1_dist(u: SweepCoord, v: SweepCoord) -> Real {
    (u.s - v.s).abs() + (u.t - v.t).abs()
}

/// Weighted average `(b*x + a*y) / (a + b)` with negative weights clamped
/// to zero and the midpoint returned when both vanish. The result always
/// lies between `x` and `y`.
#[inline]
pub fn interpolate(mut a: Real, x: Real, mut b: Real, y: Real) -> Real {
    if a < 0.0 {
        a = 0.0;
    }
    if b < 0.0 {
        b = 0.0;
    }
    if a <= b {
        if b == 0.0 {
            x / 2.0 + y / 2.0
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

fn intersect_coord(
    mut a: SweepCoord,
    mut b: SweepCoord,
    mut c: SweepCoord,
    mut d: SweepCoord,
    leq: fn(SweepCoord, SweepCoord) -> bool,
    eval: fn(SweepCoord, SweepCoord, SweepCoord) -> Real,
    sign: fn(SweepCoord, SweepCoord, SweepCoord) -> Real,
    pick: fn(SweepCoord) -> Real,
) -> Real {
    // Normalize so a <= b, c <= d, and a <= c in the given order.
    if !leq(a, b) {
        core::mem::swap(&mut a, &mut b);
    }
    if !leq(c, d) {
        core::mem::swap(&mut c, &mut d);
    }
    if !leq(a, c) {
        core::mem::swap(&mut a, &mut c);
        core::mem::swap(&mut b, &mut d);
    }

    if !leq(c, b) {
        // Technically no intersection in this axis; split the difference.
        pick(c) / 2.0 + pick(b) / 2.0
    } else if leq(b, d) {
        // Interpolate between the inner endpoints c and b.
        let mut z1 = eval(a, c, b);
        let mut z2 = eval(c, b, d);
        if z1 + z2 < 0.0 {
            z1 = -z1;
            z2 = -z2;
        }
        interpolate(z1, pick(c), z2, pick(b))
    } else {
        // One edge spans the other; use the sign forms.
        let mut z1 = sign(a, c, b);
        let mut z2 = -sign(a, d, b);
        if z1 + z2 < 0.0 {
            z1 = -z1;
            z2 = -z2;
        }
        interpolate(z1, pick(c), z2, pick(d))
    }
}

/// Intersection of edges `o1 d1` and `o2 d2`, which the caller has already
/// determined to cross. Each coordinate is computed independently: the four
/// endpoints are ordered along that axis and the intersection interpolated
/// between the middle two, so the result always lies inside the bounding
/// rectangle of both edges even under heavy roundoff.
pub fn edge_intersect(
    o1: SweepCoord,
    d1: SweepCoord,
    o2: SweepCoord,
    d2: SweepCoord,
) -> SweepCoord {
    SweepCoord {
        s: intersect_coord(o1, d1, o2, d2, vert_leq, edge_eval, edge_sign, |p| p.s),
        t: intersect_coord(o1, d1, o2, d2, trans_leq, trans_eval, trans_sign, |p| p.t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sc(s: Real, t: Real) -> SweepCoord {
        SweepCoord::new(s, t)
    }

    #[test]
    fn vert_order() {
        assert!(vert_leq(sc(0.0, 0.0), sc(1.0, 0.0)));
        assert!(vert_leq(sc(0.0, 0.0), sc(0.0, 1.0)));
        assert!(vert_leq(sc(0.0, 0.0), sc(0.0, 0.0)));
        assert!(!vert_leq(sc(1.0, 0.0), sc(0.0, 0.0)));
    }

    #[test]
    fn trans_order() {
        assert!(trans_leq(sc(0.0, 0.0), sc(0.0, 1.0)));
        assert!(trans_leq(sc(0.0, 0.0), sc(1.0, 0.0)));
        assert!(!trans_leq(sc(0.0, 1.0), sc(0.0, 0.0)));
    }

    #[test]
    fn edge_eval_measures_distance_above_chord() {
        // Chord from (0,0) to (1,0); the middle point sits 1 above it.
        let r = edge_eval(sc(0.0, 0.0), sc(0.5, 1.0), sc(1.0, 0.0));
        assert_relative_eq!(r, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn edge_eval_vertical_is_zero() {
        assert_eq!(edge_eval(sc(0.0, 0.0), sc(0.0, 0.5), sc(0.0, 1.0)), 0.0);
    }

    #[test]
    fn ccw_orientation() {
        assert!(vert_ccw(sc(0.0, 0.0), sc(1.0, 0.0), sc(0.5, 1.0)));
        assert!(!vert_ccw(sc(0.0, 0.0), sc(0.5, 1.0), sc(1.0, 0.0)));
    }

    #[test]
    fn interpolate_stays_bounded() {
        assert_relative_eq!(interpolate(0.0, 0.0, 0.0, 1.0), 0.5);
        assert_relative_eq!(interpolate(1.0, 0.0, 1.0, 2.0), 1.0);
        // Negative weights clamp rather than extrapolate.
        let r = interpolate(-1.0, 3.0, 1.0, 5.0);
        assert!((3.0..=5.0).contains(&r));
    }

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let p = edge_intersect(sc(0.0, 0.0), sc(1.0, 1.0), sc(0.0, 1.0), sc(1.0, 0.0));
        assert_relative_eq!(p.s, 0.5, epsilon = 1e-5);
        assert_relative_eq!(p.t, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn intersection_inside_both_bounding_boxes() {
        let o1 = sc(-2.0, -1.0);
        let d1 = sc(4.0, 2.0);
        let o2 = sc(0.0, 3.0);
        let d2 = sc(1.0, -3.0);
        let p = edge_intersect(o1, d1, o2, d2);
        assert!(p.s >= 0.0 && p.s <= 1.0, "s={}", p.s);
        assert!(p.t >= -1.0 && p.t <= 2.0, "t={}", p.t);
    }
}
