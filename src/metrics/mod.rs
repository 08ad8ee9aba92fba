//! Verification metrics
//!
//! One module per check; each takes the thresholds it needs explicitly.

pub mod area_match;
pub mod radar_water;
pub mod spectral_crop;
pub mod water_regime;

// Re-export metric functions
pub use area_match::{compare_area, AreaComparison};
pub use radar_water::{detect_water, is_water_detected, WaterDetection};
pub use spectral_crop::{
    classify_crop, confidence_for, evaluate_criteria, CropCriteria, CropDetection, CropEvidence,
    CRITERIA_TOTAL,
};
pub use water_regime::{match_regime, RegimeMatch, WaterRegime};
