//! Crop Reason Table
//!
//! Human-readable justification for the spectral verdict. Rules are evaluated
//! top to bottom and the first match wins. The forest rule sits above the
//! low-NDVI and low-NDWI rules because a dense canopy fails the water criteria
//! while still showing high greenness.

use crate::metrics::spectral_crop::{CropEvidence, CRITERIA_TOTAL};
use crate::utils::VerificationConfig;
use serde::{Deserialize, Serialize};

/// Machine-readable reason category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CropReasonCode {
    RiceDetected,
    LikelyForest,
    BareSoil,
    InsufficientWater,
    InsufficientCriteria,
}

impl CropReasonCode {
    pub fn display_text(&self) -> &'static str {
        match self {
            CropReasonCode::RiceDetected => "Rice detected",
            CropReasonCode::LikelyForest => "Likely trees/forest",
            CropReasonCode::BareSoil => "Bare soil / dry land / built-up",
            CropReasonCode::InsufficientWater => "Insufficient water content",
            CropReasonCode::InsufficientCriteria => "Insufficient criteria",
        }
    }
}

type Predicate = fn(&CropEvidence, &VerificationConfig) -> bool;
type Template = fn(&CropEvidence, &VerificationConfig) -> String;

/// One (predicate, message template) row of the decision table
pub struct ReasonRule {
    pub code: CropReasonCode,
    pub applies: Predicate,
    pub render: Template,
}

/// Priority-ordered decision table; the last row always applies
pub static CROP_REASON_RULES: [ReasonRule; 5] = [
    ReasonRule {
        code: CropReasonCode::RiceDetected,
        applies: |e, _| e.crop_detected,
        render: render_detected,
    },
    ReasonRule {
        code: CropReasonCode::LikelyForest,
        applies: |e, c| {
            e.statistics.ndvi > c.explanation.forest_ndvi_min
                && e.statistics.lswi < c.explanation.forest_lswi_max
        },
        render: |e, _| {
            format!(
                "Likely trees/forest: high greenness (NDVI {:.2}) with low water content (LSWI {:.2}) is not consistent with a flooded rice paddy",
                e.statistics.ndvi, e.statistics.lswi
            )
        },
    },
    ReasonRule {
        code: CropReasonCode::BareSoil,
        applies: |e, c| e.statistics.ndvi < c.spectral.ndvi_min,
        render: |e, c| {
            format!(
                "Bare soil, dry land or built-up area: NDVI {:.2} is below the rice minimum of {:.2}",
                e.statistics.ndvi, c.spectral.ndvi_min
            )
        },
    },
    ReasonRule {
        code: CropReasonCode::InsufficientWater,
        applies: |e, c| e.statistics.ndwi < c.explanation.dry_ndwi_max,
        render: |e, _| {
            format!(
                "Insufficient water content for rice: NDWI {:.2} indicates a dry surface",
                e.statistics.ndwi
            )
        },
    },
    ReasonRule {
        code: CropReasonCode::InsufficientCriteria,
        applies: |_, _| true,
        render: |e, c| {
            format!(
                "Vegetation present but insufficient rice criteria ({}/{} met, {} required)",
                e.criteria_met, CRITERIA_TOTAL, c.spectral.min_criteria_for_crop
            )
        },
    },
];

fn render_detected(e: &CropEvidence, _c: &VerificationConfig) -> String {
    let mut reason = format!(
        "Rice crop detected with {:.0}% confidence ({}/{} criteria met)",
        e.confidence, e.criteria_met, CRITERIA_TOTAL
    );
    if e.early_flooding {
        reason.push_str("; early flooding signal: LSWI close to or above NDVI (transplanting stage)");
    }
    reason
}

/// First matching rule
pub fn matching_rule(evidence: &CropEvidence, config: &VerificationConfig) -> &'static ReasonRule {
    CROP_REASON_RULES
        .iter()
        .find(|rule| (rule.applies)(evidence, config))
        .unwrap_or(&CROP_REASON_RULES[CROP_REASON_RULES.len() - 1])
}

/// Reason code and text for a crop verdict
pub fn explain_crop(evidence: &CropEvidence, config: &VerificationConfig) -> (CropReasonCode, String) {
    let rule = matching_rule(evidence, config);
    (rule.code, (rule.render)(evidence, config))
}
