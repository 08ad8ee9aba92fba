//! Utility modules shared by the classifiers
//!
//! - Thresholds: versioned verification config
//! - Precision: documented report rounding

pub mod precision;
pub mod thresholds;

// Re-export commonly used types
pub use precision::{round2, round3};
pub use thresholds::{
    AcquisitionSettings, AreaThresholds, ExplanationThresholds, RadarThresholds,
    RegimeThresholds, SpectralThresholds, VerificationConfig,
};
