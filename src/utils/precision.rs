//! Report rounding
//!
//! Area mismatch and percentages are reported with 2 decimals, spectral
//! indices with 3. Rounding is half away from zero (`f64::round`).

/// Round to 2 decimals (percentages)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 3 decimals (spectral indices, fractions)
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_absorbs_float_noise() {
        // (2.3 - 2.0) / 2.0 * 100 evaluates just below 15.0
        let raw = (2.3_f64 - 2.0).abs() / 2.0 * 100.0;
        assert!(raw < 15.0);
        assert_eq!(round2(raw), 15.0);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.61249), 0.612);
        assert_eq!(round3(-0.1236), -0.124);
        assert_eq!(round3(0.0), 0.0);
    }
}
