//! Spectral Crop Classifier
//!
//! Five independent vegetation / water-content criteria on the optical means:
//!
//! | Criterion     | Condition                                              |
//! |---------------|--------------------------------------------------------|
//! | ndvi_ok       | ndvi_min <= NDVI <= ndvi_max                           |
//! | lswi_ok       | LSWI > lswi_min                                        |
//! | ndvi_lswi     | abs(NDVI - LSWI) < max_diff OR LSWI >= NDVI - margin   |
//! | ndwi_ok       | NDWI > ndwi_min                                        |
//! | evi_ok        | evi_min <= EVI <= evi_max                              |
//!
//! The field is called rice when at least `min_criteria_for_crop` (4 of 5)
//! hold, tolerating one disagreeing index. Confidence is always
//! `criteria_met / 5 × 100`. The reason text is produced separately by
//! `explanation::crop_reason` and never feeds back into the verdict.

use crate::explanation::crop_reason::{explain_crop, CropReasonCode};
use crate::providers::SpectralStatistics;
use crate::utils::{round2, round3, SpectralThresholds, VerificationConfig};
use serde::{Deserialize, Serialize};

/// Number of spectral criteria
pub const CRITERIA_TOTAL: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropCriteria {
    pub ndvi_ok: bool,
    pub lswi_ok: bool,
    pub ndvi_lswi_ratio: bool,
    pub ndwi_ok: bool,
    pub evi_ok: bool,
}

impl CropCriteria {
    pub fn met(&self) -> u8 {
        [
            self.ndvi_ok,
            self.lswi_ok,
            self.ndvi_lswi_ratio,
            self.ndwi_ok,
            self.evi_ok,
        ]
        .iter()
        .filter(|&&ok| ok)
        .count() as u8
    }
}

/// Everything the reason rules may look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropEvidence {
    pub statistics: SpectralStatistics,
    pub criteria: CropCriteria,
    pub early_flooding: bool,
    pub criteria_met: u8,
    pub crop_detected: bool,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropDetection {
    pub crop_detected: bool,
    /// 0-100, 2 decimals
    pub confidence: f64,
    pub criteria_met: u8,
    pub criteria: CropCriteria,
    /// LSWI at or just below NDVI (flooding / transplanting signature)
    pub early_flooding: bool,
    pub reason_code: CropReasonCode,
    pub reason: String,
    /// Input means, 3 decimals
    pub indices: SpectralStatistics,
}

/// Confidence for a criteria count
pub fn confidence_for(criteria_met: u8) -> f64 {
    round2(f64::from(criteria_met) * 100.0 / f64::from(CRITERIA_TOTAL))
}

/// Whether a criteria count clears the detection policy
pub fn is_crop_detected(criteria_met: u8, thresholds: &SpectralThresholds) -> bool {
    criteria_met >= thresholds.min_criteria_for_crop
}

/// Early-flooding signal: LSWI no more than `margin` below NDVI
pub fn early_flooding_signal(stats: &SpectralStatistics, thresholds: &SpectralThresholds) -> bool {
    stats.lswi >= stats.ndvi - thresholds.early_flooding_margin
}

/// Evaluate the five criteria
pub fn evaluate_criteria(stats: &SpectralStatistics, thresholds: &SpectralThresholds) -> CropCriteria {
    let ndvi_ok = stats.ndvi >= thresholds.ndvi_min && stats.ndvi <= thresholds.ndvi_max;
    let lswi_ok = stats.lswi > thresholds.lswi_min;
    let ndvi_lswi_ratio = (stats.ndvi - stats.lswi).abs() < thresholds.ndvi_lswi_max_diff
        || early_flooding_signal(stats, thresholds);
    let ndwi_ok = stats.ndwi > thresholds.ndwi_min;
    let evi_ok = stats.evi >= thresholds.evi_min && stats.evi <= thresholds.evi_max;

    CropCriteria {
        ndvi_ok,
        lswi_ok,
        ndvi_lswi_ratio,
        ndwi_ok,
        evi_ok,
    }
}

/// Build the evidence record (verdict only, no text)
pub fn assess_crop(stats: &SpectralStatistics, thresholds: &SpectralThresholds) -> CropEvidence {
    let criteria = evaluate_criteria(stats, thresholds);
    let criteria_met = criteria.met();

    CropEvidence {
        statistics: *stats,
        criteria,
        early_flooding: early_flooding_signal(stats, thresholds),
        criteria_met,
        crop_detected: is_crop_detected(criteria_met, thresholds),
        confidence: confidence_for(criteria_met),
    }
}

/// Classify the field and attach its explanation
pub fn classify_crop(stats: &SpectralStatistics, config: &VerificationConfig) -> CropDetection {
    let evidence = assess_crop(stats, &config.spectral);
    let (reason_code, reason) = explain_crop(&evidence, config);

    tracing::debug!(
        "Crop criteria: ndvi={} lswi={} ratio={} ndwi={} evi={} ({}/{})",
        evidence.criteria.ndvi_ok,
        evidence.criteria.lswi_ok,
        evidence.criteria.ndvi_lswi_ratio,
        evidence.criteria.ndwi_ok,
        evidence.criteria.evi_ok,
        evidence.criteria_met,
        CRITERIA_TOTAL
    );

    CropDetection {
        crop_detected: evidence.crop_detected,
        confidence: evidence.confidence,
        criteria_met: evidence.criteria_met,
        criteria: evidence.criteria,
        early_flooding: evidence.early_flooding,
        reason_code,
        reason,
        indices: SpectralStatistics {
            ndvi: round3(stats.ndvi),
            ndwi: round3(stats.ndwi),
            lswi: round3(stats.lswi),
            evi: round3(stats.evi),
        },
    }
}
