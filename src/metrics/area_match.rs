//! Area Match (GeometryValidator)
//!
//! Compares the farmer's declared area with the area of the submitted
//! boundary. The mismatch percentage is rounded before the strict `<`
//! comparison, so a difference of exactly 15.00% is a mismatch.

use crate::error::{Result, VerificationError};
use crate::utils::{round2, AreaThresholds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaComparison {
    pub declared_area_hectares: f64,
    pub actual_area_hectares: f64,
    /// |declared - actual| / declared × 100, 2 decimals
    pub area_match_percentage: f64,
    pub area_match: bool,
}

/// Compare declared and actual area
///
/// Precondition: `declared_hectares` is finite and > 0. It is checked here
/// so a bad request never produces an infinite percentage.
pub fn compare_area(
    declared_hectares: f64,
    actual_hectares: f64,
    thresholds: &AreaThresholds,
) -> Result<AreaComparison> {
    if !declared_hectares.is_finite() || declared_hectares <= 0.0 {
        return Err(VerificationError::InvalidRequest(format!(
            "declared area must be a positive number of hectares (got {})",
            declared_hectares
        )));
    }
    if !actual_hectares.is_finite() || actual_hectares < 0.0 {
        return Err(VerificationError::InvalidGeometry(format!(
            "actual area must be a non-negative number of hectares (got {})",
            actual_hectares
        )));
    }

    let area_match_percentage =
        round2((declared_hectares - actual_hectares).abs() / declared_hectares * 100.0);

    Ok(AreaComparison {
        declared_area_hectares: declared_hectares,
        actual_area_hectares: round2(actual_hectares),
        area_match_percentage,
        area_match: area_match_percentage < thresholds.mismatch_tolerance_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::VerificationConfig;

    fn thresholds() -> AreaThresholds {
        VerificationConfig::default().area
    }

    #[test]
    fn test_exactly_fifteen_percent_is_mismatch() {
        let result = compare_area(2.0, 2.3, &thresholds()).unwrap();
        assert_eq!(result.area_match_percentage, 15.0);
        assert!(!result.area_match);
    }

    #[test]
    fn test_just_inside_tolerance() {
        let result = compare_area(2.0, 2.29, &thresholds()).unwrap();
        assert_eq!(result.area_match_percentage, 14.5);
        assert!(result.area_match);
    }

    #[test]
    fn test_undersized_boundary() {
        let result = compare_area(10.0, 5.0, &thresholds()).unwrap();
        assert_eq!(result.area_match_percentage, 50.0);
        assert!(!result.area_match);
    }

    #[test]
    fn test_identical_areas() {
        let result = compare_area(1.25, 1.25, &thresholds()).unwrap();
        assert_eq!(result.area_match_percentage, 0.0);
        assert!(result.area_match);
    }

    #[test]
    fn test_non_positive_declared_area_is_rejected() {
        assert!(matches!(
            compare_area(0.0, 1.0, &thresholds()),
            Err(VerificationError::InvalidRequest(_))
        ));
        assert!(compare_area(-3.0, 1.0, &thresholds()).is_err());
        assert!(compare_area(f64::INFINITY, 1.0, &thresholds()).is_err());
    }
}
