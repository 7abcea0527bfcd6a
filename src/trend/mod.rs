// Pressure tendency over a positional lookback (one reading per minute).

pub mod advanced;

use crate::classification::{PRESSURE_TREND_ONE_HOUR, PRESSURE_TREND_THREE_HOURS, PressureTrend};

pub use advanced::advanced_trend;

pub const ONE_HOUR_LOOKBACK: usize = 60;
pub const THREE_HOUR_LOOKBACK: usize = 180;

/// The last `lookback` readings of `history` (oldest first), or `None` when
/// there are fewer than `lookback` of them.
pub(crate) fn lookback(history: &[f64], lookback: usize) -> Option<&[f64]> {
    if lookback == 0 || history.len() < lookback {
        return None;
    }
    Some(&history[history.len() - lookback..])
}

/// Signed change from the lookback's min or max, whichever is larger in
/// magnitude (ties go to the change from min). Rise is positive.
///
/// `history` excludes the current reading. Undefined with fewer than
/// `lookback` readings.
pub fn pressure_delta(history: &[f64], current_mb: f64, lookback_len: usize) -> Option<f64> {
    let window = lookback(history, lookback_len)?;
    let min = window.iter().copied().fold(f64::INFINITY, f64::min);
    let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let from_min = current_mb - min;
    let from_max = current_mb - max;
    if from_min.abs() >= from_max.abs() {
        Some(from_min)
    } else {
        Some(from_max)
    }
}

pub fn classify_one_hour(delta_mb: Option<f64>) -> Option<PressureTrend> {
    PRESSURE_TREND_ONE_HOUR.lookup(delta_mb)
}

pub fn classify_three_hours(delta_mb: Option<f64>) -> Option<PressureTrend> {
    PRESSURE_TREND_THREE_HOURS.lookup(delta_mb)
}

/// Population standard deviation; `None` for an empty slice.
pub(crate) fn pstdev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_history_is_undefined() {
        let history: Vec<f64> = vec![1000.0; 59];
        assert_eq!(pressure_delta(&history, 1001.0, ONE_HOUR_LOOKBACK), None);
        assert_eq!(pressure_delta(&[], 1001.0, 3), None);
    }

    #[test]
    fn picks_larger_magnitude_with_sign() {
        let history = [1000.0, 1001.0, 999.0, 1002.0];
        assert_eq!(pressure_delta(&history, 1003.0, 3), Some(4.0));
        // Falling: max dominates.
        assert_eq!(pressure_delta(&history, 998.0, 3), Some(-4.0));
    }

    #[test]
    fn tie_goes_to_change_from_min() {
        let history = [1000.0, 1002.0];
        assert_eq!(pressure_delta(&history, 1001.0, 2), Some(1.0));
    }

    #[test]
    fn only_the_lookback_counts() {
        let mut history = vec![900.0];
        history.extend(std::iter::repeat_n(1000.0, 60));
        assert_eq!(pressure_delta(&history, 1000.2, 60).map(|d| (d * 100.0).round()), Some(20.0));
    }

    #[test]
    fn deltas_map_to_their_own_table() {
        assert_eq!(classify_one_hour(Some(0.8)), Some(PressureTrend::RisingSlowly));
        assert_eq!(classify_three_hours(Some(0.8)), Some(PressureTrend::Steady));
        assert_eq!(classify_three_hours(None), None);
    }

    #[test]
    fn pstdev_matches_population_formula() {
        assert_eq!(pstdev(&[]), None);
        assert_eq!(pstdev(&[5.0, 5.0, 5.0]), Some(0.0));
        assert_eq!(pstdev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), Some(2.0));
    }
}
