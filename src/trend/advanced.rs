// Coarse curve-shape classification of the pressure window.
// Rule-priority match over a handful of fuzzy predicates; tuned for a
// three-hour window and a tolerance of half the three-hour STEADY band.
// Zoomed out much further the patterns stop meaning anything.

use super::{lookback, pstdev};
use crate::classification::AdvancedPressureTrend;

/// `|a - b| <= tolerance`
fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Predicates describing one window. `oldest` is the first reading in the lookback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CurveShape {
    all_steady: bool,
    starts_steady: bool,
    ends_steady: bool,
    current_equals_max: bool,
    current_equals_min: bool,
    current_above_min: bool,
    current_below_max: bool,
    oldest_equals_max: bool,
    oldest_equals_min: bool,
    oldest_above_current: bool,
    oldest_below_current: bool,
    oldest_above_min: bool,
    oldest_below_max: bool,
}

impl CurveShape {
    fn measure(window: &[f64], current: f64, tolerance: f64) -> Option<Self> {
        let n = window.len();
        let quarter = n / 4;
        let first_quarter = &window[..n - 3 * quarter];
        let last_quarter = &window[n - quarter..];

        let spread = pstdev(window)?;
        let start_spread = pstdev(first_quarter)?;
        let end_spread = pstdev(last_quarter)?;
        let min = window.iter().copied().fold(f64::INFINITY, f64::min);
        let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let oldest = *window.first()?;

        let eq = |a: f64, b: f64| approx_eq(a, b, tolerance);
        let above = |a: f64, b: f64| a > b && !eq(a, b);
        let below = |a: f64, b: f64| a < b && !eq(a, b);

        Some(Self {
            all_steady: approx_eq(spread, 0.0, tolerance / 4.0),
            starts_steady: approx_eq(start_spread, 0.0, tolerance / 8.0),
            ends_steady: approx_eq(end_spread, 0.0, tolerance / 8.0),
            current_equals_max: eq(current, max),
            current_equals_min: eq(current, min),
            current_above_min: above(current, min),
            current_below_max: below(current, max),
            oldest_equals_max: eq(oldest, max),
            oldest_equals_min: eq(oldest, min),
            oldest_above_current: above(oldest, current),
            oldest_below_current: below(oldest, current),
            oldest_above_min: above(oldest, min),
            oldest_below_max: below(oldest, max),
        })
    }

    /// First matching rule wins.
    fn classify(&self) -> AdvancedPressureTrend {
        use AdvancedPressureTrend::*;

        let s = self;
        let starts_unsteady = !s.starts_steady;
        let ends_unsteady = !s.ends_steady;

        if starts_unsteady
            && s.oldest_above_current
            && s.oldest_equals_max
            && s.current_equals_min
            && ends_unsteady
        {
            ContinuouslyFalling
        } else if starts_unsteady
            && s.oldest_below_current
            && s.oldest_equals_min
            && s.current_equals_max
            && ends_unsteady
        {
            ContinuouslyRising
        } else if starts_unsteady && s.oldest_above_current && s.current_above_min && ends_unsteady
        {
            FallingThenSlightlyRising
        } else if starts_unsteady
            && s.oldest_above_current
            && s.current_equals_min
            && s.ends_steady
        {
            FallingThenSteady
        } else if starts_unsteady && s.oldest_below_current && s.current_below_max && ends_unsteady
        {
            RisingThenSlightlyFalling
        } else if starts_unsteady
            && s.oldest_below_current
            && s.current_equals_max
            && s.ends_steady
        {
            RisingThenSteady
        } else if starts_unsteady
            && s.oldest_above_min
            && s.oldest_below_current
            && s.current_equals_max
            && ends_unsteady
        {
            SlightlyFallingThenRising
        } else if starts_unsteady
            && s.oldest_below_max
            && s.oldest_above_current
            && s.current_equals_min
            && ends_unsteady
        {
            SlightlyRisingThenFalling
        } else if s.all_steady {
            Steady
        } else if s.starts_steady
            && s.oldest_above_current
            && s.current_equals_min
            && ends_unsteady
        {
            SteadyThenFalling
        } else if s.starts_steady
            && s.oldest_below_current
            && s.current_equals_max
            && ends_unsteady
        {
            SteadyThenRising
        } else {
            UnsteadyOrInconclusive
        }
    }
}

/// Classifies the shape of the last `lookback_len` readings of `history`
/// (oldest first, excluding `current_mb`).
///
/// Undefined with insufficient history, or when the lookback is too short to
/// have a trailing quarter (fewer than 4 readings).
pub fn advanced_trend(
    history: &[f64],
    current_mb: f64,
    lookback_len: usize,
    tolerance: f64,
) -> Option<AdvancedPressureTrend> {
    if lookback_len < 4 {
        return None;
    }
    let window = lookback(history, lookback_len)?;
    CurveShape::measure(window, current_mb, tolerance).map(|shape| shape.classify())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::steady_tolerance_mb;
    use crate::trend::THREE_HOUR_LOOKBACK;
    use AdvancedPressureTrend::*;

    const N: usize = THREE_HOUR_LOOKBACK;

    fn classify(history: &[f64], current: f64) -> Option<AdvancedPressureTrend> {
        advanced_trend(history, current, N, steady_tolerance_mb())
    }

    /// Linear ramp of `n` readings starting at `start`.
    fn ramp(start: f64, step: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn insufficient_history_is_undefined() {
        assert_eq!(classify(&vec![1000.0; N - 1], 1000.0), None);
        assert_eq!(advanced_trend(&[1.0, 2.0, 3.0], 4.0, 3, 1.0), None);
    }

    #[test]
    fn constant_is_steady() {
        assert_eq!(classify(&vec![1013.0; N], 1013.0), Some(Steady));
    }

    #[test]
    fn monotonic_fall_is_continuously_falling() {
        let history = ramp(1020.0, -0.05, N);
        let current = 1020.0 - 0.05 * N as f64;
        assert_eq!(classify(&history, current), Some(ContinuouslyFalling));
    }

    #[test]
    fn monotonic_rise_is_continuously_rising() {
        let history = ramp(1000.0, 0.05, N);
        let current = 1000.0 + 0.05 * N as f64;
        assert_eq!(classify(&history, current), Some(ContinuouslyRising));
    }

    #[test]
    fn fall_into_plateau_is_falling_then_steady() {
        let mut history = ramp(1020.0, -0.1, N / 2);
        history.extend(std::iter::repeat_n(1011.0, N / 2));
        assert_eq!(classify(&history, 1011.0), Some(FallingThenSteady));
    }

    #[test]
    fn rise_into_plateau_is_rising_then_steady() {
        let mut history = ramp(1000.0, 0.1, N / 2);
        history.extend(std::iter::repeat_n(1009.0, N / 2));
        assert_eq!(classify(&history, 1009.0), Some(RisingThenSteady));
    }

    #[test]
    fn plateau_then_fall_is_steady_then_falling() {
        let mut history = vec![1015.0; N / 2];
        history.extend(ramp(1015.0, -0.08, N / 2));
        let current = 1015.0 - 0.08 * (N / 2) as f64;
        assert_eq!(classify(&history, current), Some(SteadyThenFalling));
    }

    #[test]
    fn plateau_then_rise_is_steady_then_rising() {
        let mut history = vec![1005.0; N / 2];
        history.extend(ramp(1005.0, 0.08, N / 2));
        let current = 1005.0 + 0.08 * (N / 2) as f64;
        assert_eq!(classify(&history, current), Some(SteadyThenRising));
    }

    #[test]
    fn fall_then_recovery_is_falling_then_slightly_rising() {
        // 1020 down to ~1011 over 150 minutes, then back up ~3 mb.
        let mut history = ramp(1020.0, -0.06, 150);
        history.extend(ramp(1011.0, 0.1, 30));
        assert_eq!(classify(&history, 1014.0), Some(FallingThenSlightlyRising));
    }

    #[test]
    fn rise_then_dip_is_rising_then_slightly_falling() {
        let mut history = ramp(1000.0, 0.06, 150);
        history.extend(ramp(1009.0, -0.1, 30));
        assert_eq!(classify(&history, 1006.0), Some(RisingThenSlightlyFalling));
    }

    #[test]
    fn small_dip_then_strong_rise_is_slightly_falling_then_rising() {
        // Oldest sits 2 mb above the dip, current ends at the max.
        let mut history = ramp(1010.0, -0.1, 20);
        history.extend(ramp(1008.0, 0.08, 160));
        let current = 1008.0 + 0.08 * 160.0;
        assert_eq!(classify(&history, current), Some(SlightlyFallingThenRising));
    }

    #[test]
    fn small_bump_then_strong_fall_is_slightly_rising_then_falling() {
        let mut history = ramp(1010.0, 0.1, 20);
        history.extend(ramp(1012.0, -0.08, 160));
        let current = 1012.0 - 0.08 * 160.0;
        assert_eq!(classify(&history, current), Some(SlightlyRisingThenFalling));
    }

    #[test]
    fn noise_around_a_level_is_inconclusive() {
        // Square wave: large spread, oldest equals current.
        let history: Vec<f64> = (0..N)
            .map(|i| if (i / 10) % 2 == 0 { 1010.0 } else { 1013.0 })
            .collect();
        assert_eq!(classify(&history, 1010.0), Some(UnsteadyOrInconclusive));
    }

    #[test]
    fn approx_eq_is_inclusive() {
        assert!(approx_eq(1.0, 2.0, 1.0));
        assert!(!approx_eq(1.0, 2.01, 1.0));
    }
}
