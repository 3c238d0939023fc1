use log::debug;

/// Sums `values`, excluding non-finite entries rather than propagating them.
pub fn nan_sum(values: &[f64]) -> f64 {
    values.iter().copied().filter(|v| v.is_finite()).sum()
}

/// Mass-weighted median: the 50th weighted percentile.
pub fn weighted_median(values: &[f64], weights: &[f64]) -> f64 {
    weighted_percentile(values, weights, 50.0)
}

/// Computes the percentile of `values` over cumulative weight rather than particle
/// count.
///
/// Pairs with a non-finite value or weight are dropped. Sorted values are placed at
/// their cumulative-weight midpoints and the requested percentile is linearly
/// interpolated between them, clamping outside the midpoint range. Equal weights
/// over `[1,2,3,4]` therefore give 2.5 at the 50th percentile, and a weight resting
/// entirely on one element returns that element's value. Empty input yields 0.0.
pub fn weighted_percentile(values: &[f64], weights: &[f64], percentile: f64) -> f64 {
    debug_assert_eq!(values.len(), weights.len());

    let mut pairs: Vec<(f64, f64)> = values
        .iter()
        .zip(weights.iter())
        .filter(|(v, w)| v.is_finite() && w.is_finite() && **w >= 0.0)
        .map(|(&v, &w)| (v, w))
        .collect();

    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    if pairs.is_empty() || total <= 0.0 {
        debug!("weighted_percentile over empty/zero-weight input; returning 0");
        return 0.0;
    }

    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // Cumulative-weight midpoint of each sorted value, as a fraction of the total.
    let mut midpoints = Vec::with_capacity(pairs.len());
    let mut cumulative = 0.0;
    for &(_, w) in &pairs {
        midpoints.push((cumulative + 0.5 * w) / total);
        cumulative += w;
    }

    let p = (percentile / 100.0).clamp(0.0, 1.0);
    if p <= midpoints[0] {
        return pairs[0].0;
    }
    if p >= midpoints[midpoints.len() - 1] {
        return pairs[pairs.len() - 1].0;
    }

    // First midpoint at or above p; the previous one is strictly below it.
    let hi = midpoints.iter().position(|&m| m >= p).unwrap_or(midpoints.len() - 1);
    let lo = hi - 1;
    let (m_lo, m_hi) = (midpoints[lo], midpoints[hi]);
    let (v_lo, v_hi) = (pairs[lo].0, pairs[hi].0);
    if m_hi <= m_lo {
        return v_hi;
    }
    v_lo + (p - m_lo) / (m_hi - m_lo) * (v_hi - v_lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_sum_skips_invalid_entries() {
        assert_eq!(nan_sum(&[1.0, f64::NAN, 2.0, f64::INFINITY]), 3.0);
        assert_eq!(nan_sum(&[]), 0.0);
    }

    #[test]
    fn equal_weights_match_unweighted_median() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let weights = [1.0; 4];
        assert!((weighted_median(&values, &weights) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn weight_on_one_element_returns_that_element() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(weighted_median(&values, &[0.0, 0.0, 0.0, 1.0]), 4.0);
        assert_eq!(weighted_median(&values, &[0.0, 1.0, 0.0, 0.0]), 2.0);
    }

    #[test]
    fn unsorted_input_is_handled() {
        let values = [4.0, 1.0, 3.0, 2.0];
        let weights = [1.0; 4];
        assert!((weighted_median(&values, &weights) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_pairs_are_dropped() {
        let values = [1.0, f64::NAN, 2.0, 3.0, 4.0];
        let weights = [1.0, 1.0, 1.0, f64::NAN, 1.0];
        // Only (1, 2, 4) survive filtering.
        assert!((weighted_median(&values, &weights) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_yields_zero() {
        assert_eq!(weighted_median(&[], &[]), 0.0);
        assert_eq!(weighted_median(&[1.0], &[0.0]), 0.0);
    }

    #[test]
    fn extreme_percentiles_clamp_to_extremes() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let weights = [1.0; 4];
        assert_eq!(weighted_percentile(&values, &weights, 0.0), 1.0);
        assert_eq!(weighted_percentile(&values, &weights, 100.0), 4.0);
    }

    #[test]
    fn skewed_weights_pull_the_median() {
        let values = [1.0, 2.0, 3.0];
        // Nearly all of the weight on the last element.
        let m = weighted_median(&values, &[0.01, 0.01, 10.0]);
        assert!(m > 2.9, "median {m} should sit near 3");
    }
}
