//! Small numeric helpers shared by the update rules

/// Sign of `x` as a float: `1.0`, `-1.0`, or `0.0` for zero
///
/// Unlike `f64::signum`, zero (including `-0.0`) maps to `0.0`. NaN stays NaN.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else if x.is_nan() {
        f64::NAN
    } else {
        0.0
    }
}

/// Keep a per-feature rate inside `[min, max]`
pub fn clamp_rate(rate: f64, min: f64, max: f64) -> f64 {
    rate.max(min).min(max)
}

/// Round to the nearest integer, ties to even
pub fn quantize(rate: f64) -> f64 {
    rate.round_ties_even()
}

/// Multiply every component by `factor`
pub fn scale(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|&v| factor * v).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.5), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert!(sign(f64::NAN).is_nan());
    }

    #[test]
    fn test_clamp_rate() {
        assert_eq!(clamp_rate(60.0, 1e-7, 50.0), 50.0);
        assert_eq!(clamp_rate(1e-9, 1e-7, 50.0), 1e-7);
        assert_eq!(clamp_rate(1.2, 1e-7, 50.0), 1.2);
    }

    #[test]
    fn test_quantize_ties_to_even() {
        assert_eq!(quantize(0.5), 0.0);
        assert_eq!(quantize(1.5), 2.0);
        assert_eq!(quantize(2.5), 2.0);
        assert_eq!(quantize(1.2), 1.0);
        assert_eq!(quantize(7.6), 8.0);
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(&[1.0, -2.0, 0.0], 0.5), vec![0.5, -1.0, 0.0]);
    }
}
