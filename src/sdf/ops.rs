//! Blend math for the binary CSG operators.
//!
//! Each smooth blend returns the blended distance together with the weight
//! used to interpolate materials across the join.

use crate::math::mix;

/// Order-3 polynomial smooth minimum with blend radius `k`.
///
/// Returns the smoothed minimum and a signed blend weight: `m` when the
/// first operand wins, `m - 1` when the second does.
pub fn smin_cubic(d1: f32, d2: f32, k: f32) -> (f32, f32) {
    let h = (k - (d1 - d2).abs()).max(0.0) / k;
    let m = h * h * h * 0.5;
    let s = m * k / 3.0;
    if d1 < d2 {
        (d1 - s, m)
    } else {
        (d2 - s, m - 1.0)
    }
}

/// Smooth union of two distances. The weight approaches 1 where `da`
/// dominates the join.
pub fn union_blend(da: f32, db: f32, k: f32) -> (f32, f32) {
    let (value, _) = smin_cubic(da, db, k);
    let h = (0.5 + (0.5 * (db - da) / k)).clamp(0.0, 1.0);
    (value, h)
}

/// Smooth subtraction of `db` from `da`. The weight approaches 0 in the
/// untouched body of the minuend.
pub fn difference_blend(da: f32, db: f32, k: f32) -> (f32, f32) {
    let h = (0.5 - (0.5 * (da + db) / k)).clamp(0.0, 1.0);
    (mix(da, -db, h) + (k * h * (1.0 - h)), h)
}

/// Smooth intersection of two distances.
pub fn intersection_blend(da: f32, db: f32, k: f32) -> (f32, f32) {
    let h = (0.5 - (0.5 * (da - db) / k)).clamp(0.0, 1.0);
    (mix(da, db, h) + (k * h * (1.0 - h)), h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smin_never_exceeds_the_hard_minimum() {
        for (d1, d2) in [(0.3, 0.5), (0.5, 0.3), (-0.2, 0.1), (0.0, 0.0)] {
            let (value, _) = smin_cubic(d1, d2, 0.2);
            assert!(value <= d1.min(d2) + 1e-6, "smin({d1}, {d2}) = {value}");
        }
    }

    #[test]
    fn smin_matches_min_outside_the_blend_radius() {
        let (value, weight) = smin_cubic(0.1, 5.0, 0.2);
        assert_eq!(value, 0.1);
        assert_eq!(weight, 0.0);
        let (value, weight) = smin_cubic(5.0, 0.1, 0.2);
        assert_eq!(value, 0.1);
        assert_eq!(weight, -1.0);
    }

    #[test]
    fn union_blend_weight_tracks_the_winner() {
        let (_, near_a) = union_blend(0.0, 1.0, 0.2);
        assert_eq!(near_a, 1.0);
        let (_, near_b) = union_blend(1.0, 0.0, 0.2);
        assert_eq!(near_b, 0.0);
    }

    #[test]
    fn difference_blend_reduces_to_hard_subtraction_far_from_the_cut() {
        // Far from the subtrahend the smooth form must agree with max(da, -db).
        let (value, weight) = difference_blend(-0.05, 2.0, 0.1);
        assert_eq!(weight, 0.0);
        assert!((value - (-0.05f32).max(-2.0)).abs() < 1e-6);
    }

    #[test]
    fn intersection_blend_is_symmetric_in_value() {
        let (v1, _) = intersection_blend(0.2, 0.3, 0.25);
        let (v2, _) = intersection_blend(0.3, 0.2, 0.25);
        assert!((v1 - v2).abs() < 1e-6);
    }
}
