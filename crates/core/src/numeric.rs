//! Guarded arithmetic shared by every ratio-based KPI.
//!
//! Display values must never carry `NaN` or `Infinity`, so every division in the
//! calculators goes through [`safe_divide`].

/// `numerator / denominator` when both are finite and the denominator is non-zero,
/// otherwise `0.0`. A quotient that overflows is also reported as `0.0`.
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if !numerator.is_finite() || !denominator.is_finite() || denominator == 0.0 {
        return 0.0;
    }
    let quotient = numerator / denominator;
    if quotient.is_finite() { quotient } else { 0.0 }
}

/// Round to a fixed number of decimals (half away from zero).
///
/// Non-finite input rounds to `0.0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // Avoid "-0.0" leaking into display output.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Clamp a percentage into `[0, 100]`.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    safe_divide(values.iter().sum::<f64>(), values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn safe_divide_guards_zero_and_non_finite() {
        assert_eq!(safe_divide(10.0, 4.0), 2.5);
        assert_eq!(safe_divide(10.0, 0.0), 0.0);
        assert_eq!(safe_divide(f64::NAN, 2.0), 0.0);
        assert_eq!(safe_divide(1.0, f64::INFINITY), 0.0);
        assert_eq!(safe_divide(f64::NEG_INFINITY, 3.0), 0.0);
    }

    #[test]
    fn round_to_matches_display_rounding() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(12.25, 1), 12.3);
        assert_eq!(round_to(-0.04, 1), 0.0);
        assert_eq!(round_to(20.0, 2), 20.0);
        assert_eq!(round_to(f64::NAN, 2), 0.0);
    }

    #[test]
    fn clamp_percent_bounds() {
        assert_eq!(clamp_percent(-5.0), 0.0);
        assert_eq!(clamp_percent(140.0), 100.0);
        assert_eq!(clamp_percent(42.5), 42.5);
        assert_eq!(clamp_percent(f64::NAN), 0.0);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    proptest! {
        /// Property: the guarded division is always finite.
        #[test]
        fn safe_divide_is_always_finite(n in any::<f64>(), d in any::<f64>()) {
            prop_assert!(safe_divide(n, d).is_finite());
        }
    }
}
