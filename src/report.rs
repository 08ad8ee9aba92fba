//! Verification Report
//!
//! The report is the audit trail of a verification: declared inputs, every
//! check's verdict with its supporting numbers, the search window, scene counts
//! per sensor and a deep copy of the thresholds used. It is assembled once and
//! never mutated; the engine reads no clock, so identical inputs and config
//! serialize to identical bytes.

use crate::geometry::FieldBoundary;
use crate::metrics::{
    confidence_for, AreaComparison, CropDetection, RegimeMatch, WaterDetection, CRITERIA_TOTAL,
};
use crate::providers::VerificationWindow;
use crate::utils::VerificationConfig;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One field to verify
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Caller's project identifier, echoed in the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub boundary: FieldBoundary,
    /// Must be finite and > 0
    pub declared_area_hectares: f64,
    pub declared_water_regime: String,
    /// Window end; the window starts `window_months` earlier
    pub reference_date: NaiveDate,
    /// Caller-supplied request time, echoed verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub declared_area_hectares: f64,
    pub declared_water_regime: String,
    pub reference_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneCounts {
    pub sentinel_optical_image_count: u32,
    pub sentinel_radar_image_count: u32,
}

/// Set when a sensor contributed no scenes and its verdict rests on zero defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    pub no_optical_imagery: bool,
    pub no_radar_imagery: bool,
}

impl DataQuality {
    pub fn from_scene_counts(scenes: &SceneCounts) -> Self {
        Self {
            no_optical_imagery: scenes.sentinel_optical_image_count == 0,
            no_radar_imagery: scenes.sentinel_radar_image_count == 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.no_optical_imagery && !self.no_radar_imagery
    }
}

/// Overall outcome handed to the approval workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerificationStatus {
    /// Area, crop and regime checks all passed with imagery from both sensors
    Verified,
    /// A sensor had no scenes; verdicts default to negative and need review
    Inconclusive,
    /// Imagery present and at least one check failed
    Failed,
}

impl VerificationStatus {
    pub fn display_text(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Inconclusive => "Inconclusive",
            VerificationStatus::Failed => "Failed",
        }
    }

    fn derive(findings: &Findings, quality: &DataQuality) -> Self {
        if !quality.is_complete() {
            VerificationStatus::Inconclusive
        } else if findings.area.area_match && findings.crop.crop_detected && findings.regime.regime_match {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Failed
        }
    }
}

/// Outputs of the four checks
#[derive(Debug, Clone, PartialEq)]
pub struct Findings {
    pub area: AreaComparison,
    pub crop: CropDetection,
    pub water: WaterDetection,
    pub regime: RegimeMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub engine_version: String,
    pub config_version: String,
    pub declared: DeclaredInputs,
    pub area: AreaComparison,
    pub crop: CropDetection,
    pub water: WaterDetection,
    pub regime: RegimeMatch,
    pub window: VerificationWindow,
    pub scenes: SceneCounts,
    pub data_quality: DataQuality,
    pub status: VerificationStatus,
    pub summary: String,
    /// Thresholds this report was produced with
    pub config: VerificationConfig,
}

impl VerificationResult {
    /// Recompute every stored verdict from the report's own fields
    pub fn is_internally_consistent(&self) -> bool {
        let crop_ok = self.crop.criteria.met() == self.crop.criteria_met
            && self.crop.confidence == confidence_for(self.crop.criteria_met)
            && self.crop.crop_detected
                == (self.crop.criteria_met >= self.config.spectral.min_criteria_for_crop);

        let water_ok = self.water.water_detected
            == (self.water.water_fraction > self.config.radar.water_fraction_min);

        let area_ok = self.area.area_match
            == (self.area.area_match_percentage < self.config.area.mismatch_tolerance_pct);

        let quality_ok = self.data_quality == DataQuality::from_scene_counts(&self.scenes);

        let findings = Findings {
            area: self.area.clone(),
            crop: self.crop.clone(),
            water: self.water.clone(),
            regime: self.regime.clone(),
        };
        let status_ok = self.status == VerificationStatus::derive(&findings, &self.data_quality);

        crop_ok
            && water_ok
            && area_ok
            && quality_ok
            && status_ok
            && self.config_version == self.config.version
    }

    /// Serialize for persistence
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn summarize(findings: &Findings, quality: &DataQuality, status: VerificationStatus) -> String {
    let mut notes: Vec<String> = Vec::new();

    if quality.no_optical_imagery {
        notes.push("no optical imagery in window".to_string());
    }
    if quality.no_radar_imagery {
        notes.push("no radar imagery in window".to_string());
    }

    if findings.area.area_match {
        notes.push(format!(
            "area within tolerance ({:.2}% difference)",
            findings.area.area_match_percentage
        ));
    } else {
        notes.push(format!(
            "area mismatch ({:.2}% difference)",
            findings.area.area_match_percentage
        ));
    }

    if findings.crop.crop_detected {
        notes.push(format!("rice detected ({:.0}% confidence)", findings.crop.confidence));
    } else {
        notes.push(format!(
            "rice not detected ({}/{} criteria)",
            findings.crop.criteria_met, CRITERIA_TOTAL
        ));
    }

    if findings.regime.regime_match {
        notes.push("water regime consistent".to_string());
    } else {
        notes.push("water regime inconsistent".to_string());
    }

    format!("{}: {}", status.display_text(), notes.join(", "))
}

/// Compose the final report; pure aggregation, no checks are evaluated here
pub fn assemble_report(
    request: &VerificationRequest,
    config: &VerificationConfig,
    window: VerificationWindow,
    findings: Findings,
    scenes: SceneCounts,
) -> VerificationResult {
    let data_quality = DataQuality::from_scene_counts(&scenes);
    let status = VerificationStatus::derive(&findings, &data_quality);
    let summary = summarize(&findings, &data_quality, status);

    let Findings {
        area,
        crop,
        water,
        regime,
    } = findings;

    VerificationResult {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        config_version: config.version.clone(),
        declared: DeclaredInputs {
            project_id: request.project_id.clone(),
            declared_area_hectares: request.declared_area_hectares,
            declared_water_regime: request.declared_water_regime.clone(),
            reference_date: request.reference_date,
            requested_at: request.requested_at,
        },
        area,
        crop,
        water,
        regime,
        window,
        scenes,
        data_quality,
        status,
        summary,
        config: config.clone(),
    }
}
