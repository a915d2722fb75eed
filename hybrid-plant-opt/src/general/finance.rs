//! Financial helpers shared by the objective and the KPI layer.

/// Annuity factor converting a one-time capital cost into an equivalent
/// uniform annual payment over `lifetime_years` at `rate`.
///
/// Standard amortization formula `r(1+r)^N / ((1+r)^N - 1)`. A zero rate
/// degenerates to straight-line `1/N`, which is the formula's limit.
pub fn annuity_factor(rate: f64, lifetime_years: u32) -> f64 {
    let n = lifetime_years as f64;
    if rate == 0.0 {
        return 1.0 / n;
    }
    let growth = (1.0 + rate).powf(n);
    rate * growth / (growth - 1.0)
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_annuity_factor_reference_values() {
        // r = 4 %, N = 20 y — the default scenario
        assert!(approx_eq!(
            f64,
            annuity_factor(0.04, 20),
            0.073_581_75,
            epsilon = 1e-6
        ));
        // r = 7 %, N = 15 y — the sizing-search variant
        assert!(approx_eq!(
            f64,
            annuity_factor(0.07, 15),
            0.109_794_62,
            epsilon = 1e-6
        ));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_eq!(annuity_factor(0.0, 20), 0.05);
    }

    #[test]
    fn test_annuity_factor_positive_for_positive_rate() {
        for lifetime in [1, 5, 10, 40] {
            assert!(annuity_factor(0.03, lifetime) > 0.0);
        }
    }
}
