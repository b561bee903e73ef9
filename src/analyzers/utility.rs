//! Small numeric helpers shared by the aggregators.
//!
//! Every helper returns `None` for empty input instead of dividing by zero.

use std::cmp::Ordering;

/// Arithmetic mean of `values`.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of `values`; even-length input averages the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value of `values`. Ties resolve to the lowest value.
pub fn mode(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut best = sorted[0];
    let mut best_count = 0usize;
    let mut run_start = 0usize;

    for i in 1..=sorted.len() {
        let run_ended = i == sorted.len() || sorted[i].total_cmp(&sorted[run_start]) != Ordering::Equal;
        if run_ended {
            let count = i - run_start;
            // Strictly greater keeps the earliest (lowest) value on ties.
            if count > best_count {
                best = sorted[run_start];
                best_count = count;
            }
            run_start = i;
        }
    }

    Some(best)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().min_by(f64::total_cmp)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().max_by(f64::total_cmp)
}

/// Rounds to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `((part_a / total) - (part_b / total)) * 100`, truncated toward zero.
///
/// The two ratios are computed separately before subtracting; keeping that
/// exact expression keeps results identical at truncation boundaries.
pub fn truncated_net_pct(part_a: usize, part_b: usize, total: usize) -> Option<i64> {
    if total == 0 {
        return None;
    }
    let n = total as f64;
    let net = (part_a as f64 / n - part_b as f64 / n) * 100.0;
    Some(net.trunc() as i64)
}

/// `part / total * 100` rounded half to even.
pub fn rounded_pct(part: usize, total: usize) -> Option<i64> {
    if total == 0 {
        return None;
    }
    Some((part as f64 / total as f64 * 100.0).round_ties_even() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_are_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(mode(&[]), None);
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
        assert_eq!(truncated_net_pct(0, 0, 0), None);
        assert_eq!(rounded_pct(0, 0), None);
    }

    #[test]
    fn test_mean_and_round2() {
        assert_eq!(mean(&[9.0, 9.0, 8.0, 5.0]), Some(7.75));
        assert_eq!(round2(20.0 / 3.0), 6.67);
        assert_eq!(round2(7.0), 7.0);
        // 7.125 is exact in binary, so this is a true tie.
        assert_eq!(mean(&[7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 8.0]), Some(7.125));
        assert_eq!(round2(7.125), 7.12);
        assert_eq!(round2(7.375), 7.38);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[5.0, 9.0, 1.0]), Some(5.0));
        assert_eq!(median(&[9.0, 9.0, 8.0, 5.0]), Some(8.5));
    }

    #[test]
    fn test_mode_ties_pick_lowest() {
        assert_eq!(mode(&[10.0, 3.0, 10.0, 3.0, 7.0]), Some(3.0));
        assert_eq!(mode(&[9.0, 9.0, 8.0, 5.0]), Some(9.0));
        assert_eq!(mode(&[4.0]), Some(4.0));
        assert_eq!(mode(&[6.0, 2.0, 8.0]), Some(2.0));
    }

    #[test]
    fn test_truncated_net_pct_truncates_toward_zero() {
        assert_eq!(truncated_net_pct(2, 1, 4), Some(25));
        // 2/3 - 0 = 66.66.. -> 66
        assert_eq!(truncated_net_pct(2, 0, 3), Some(66));
        // 0 - 1/8 = -12.5 -> -12
        assert_eq!(truncated_net_pct(0, 1, 8), Some(-12));
        // 3/5 - 2/5 lands just under 0.2 in binary floating point.
        assert_eq!(truncated_net_pct(3, 2, 5), Some(19));
        assert_eq!(truncated_net_pct(7, 2, 10), Some(49));
    }

    #[test]
    fn test_rounded_pct_ties_to_even() {
        assert_eq!(rounded_pct(2, 4), Some(50));
        assert_eq!(rounded_pct(1, 8), Some(12));
        assert_eq!(rounded_pct(3, 8), Some(38));
        assert_eq!(rounded_pct(2, 3), Some(67));
    }
}
