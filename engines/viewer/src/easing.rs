/// Cubic ease-in-out: `t < 0.5 → 4t³`, else `1 − (−2t + 2)³ / 2`.
///
/// The explode animation and its tests rely on this exact shape.
#[must_use]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn slow_start_fast_middle() {
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
    }

    proptest! {
        #[test]
        fn monotonic_non_decreasing(a in 0.0_f32..=1.0, b in 0.0_f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ease_in_out_cubic(lo) <= ease_in_out_cubic(hi) + 1e-6);
        }
    }
}
