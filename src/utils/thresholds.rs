//! Verification Thresholds
//!
//! Versioned threshold set used by every classifier. A config is loaded once,
//! validated, and passed explicitly into each classification call; every report
//! carries a deep copy so historical verdicts can be reproduced after retuning.
//!
//! Default values (version "1.0.0") come from published paddy-mapping work:
//! NDVI/EVI bands and the LSWI-vs-NDVI flooding signal (Xiao et al. 2005, 2006),
//! VV backscatter flooding threshold and coverage bands (Nguyen et al. 2016).

use crate::error::{Result, VerificationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete, versioned threshold set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerificationConfig {
    pub version: String,
    pub area: AreaThresholds,
    pub spectral: SpectralThresholds,
    pub explanation: ExplanationThresholds,
    pub radar: RadarThresholds,
    pub regimes: RegimeThresholds,
    pub acquisition: AcquisitionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AreaThresholds {
    /// Relative area difference (%) at or above which the boundary is a mismatch
    pub mismatch_tolerance_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpectralThresholds {
    pub ndvi_min: f64,
    pub ndvi_max: f64,
    pub evi_min: f64,
    pub evi_max: f64,
    pub lswi_min: f64,
    pub ndwi_min: f64,
    /// Maximum |NDVI - LSWI| for the ratio criterion
    pub ndvi_lswi_max_diff: f64,
    /// LSWI within this margin below NDVI counts as the early-flooding signal
    pub early_flooding_margin: f64,
    /// Criteria (out of 5) required to call the field rice
    pub min_criteria_for_crop: u8,
}

/// Thresholds used only for the human-readable crop reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExplanationThresholds {
    pub forest_ndvi_min: f64,
    pub forest_lswi_max: f64,
    pub dry_ndwi_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RadarThresholds {
    /// VV backscatter (dB) below which a pixel counts as flooded
    pub flooding_threshold_db: f64,
    /// Water fraction above which standing water is detected
    pub water_fraction_min: f64,
}

/// Per-regime water-fraction bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegimeThresholds {
    pub continuously_flooded_min: f64,
    pub intermittent_min: f64,
    pub intermittent_max: f64,
    pub irrigated_lswi_min: f64,
    pub irrigated_water_min: f64,
    pub upland_water_max: f64,
}

/// Filters handed to the statistics providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AcquisitionSettings {
    /// Length of the window ending at the reference date
    pub window_months: u32,
    pub max_cloud_percentage: f64,
    pub radar_polarization: String,
    pub radar_instrument_mode: String,
    pub speckle_filter_radius_m: f64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            area: AreaThresholds {
                mismatch_tolerance_pct: 15.0,
            },
            spectral: SpectralThresholds {
                ndvi_min: 0.4,
                ndvi_max: 0.8,
                evi_min: 0.3,
                evi_max: 0.85,
                lswi_min: 0.2,
                ndwi_min: -0.1,
                ndvi_lswi_max_diff: 0.3,
                early_flooding_margin: 0.05,
                min_criteria_for_crop: 4,
            },
            explanation: ExplanationThresholds {
                forest_ndvi_min: 0.7,
                forest_lswi_max: 0.2,
                dry_ndwi_max: -0.3,
            },
            radar: RadarThresholds {
                flooding_threshold_db: -15.0,
                water_fraction_min: 0.3,
            },
            regimes: RegimeThresholds {
                continuously_flooded_min: 0.4,
                intermittent_min: 0.15,
                intermittent_max: 0.5,
                irrigated_lswi_min: 0.15,
                irrigated_water_min: 0.2,
                upland_water_max: 0.2,
            },
            acquisition: AcquisitionSettings {
                window_months: 3,
                max_cloud_percentage: 20.0,
                radar_polarization: "VV".to_string(),
                radar_instrument_mode: "IW".to_string(),
                speckle_filter_radius_m: 50.0,
            },
        }
    }
}

impl VerificationConfig {
    /// Load and validate a config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            VerificationError::ConfigurationError(format!(
                "failed to read config file {:?}: {}",
                path, e
            ))
        })?;

        Self::from_json_str(&contents)
    }

    /// Parse and validate a config from JSON text
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: VerificationConfig = serde_json::from_str(contents).map_err(|e| {
            VerificationError::ConfigurationError(format!("failed to parse config JSON: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check every threshold; reports all problems at once
    pub fn validate(&self) -> Result<()> {
        let mut problems: Vec<String> = Vec::new();

        if self.version.trim().is_empty() {
            problems.push("version must not be empty".to_string());
        }

        let finite = [
            ("area.mismatchTolerancePct", self.area.mismatch_tolerance_pct),
            ("spectral.ndviMin", self.spectral.ndvi_min),
            ("spectral.ndviMax", self.spectral.ndvi_max),
            ("spectral.eviMin", self.spectral.evi_min),
            ("spectral.eviMax", self.spectral.evi_max),
            ("spectral.lswiMin", self.spectral.lswi_min),
            ("spectral.ndwiMin", self.spectral.ndwi_min),
            ("spectral.ndviLswiMaxDiff", self.spectral.ndvi_lswi_max_diff),
            ("spectral.earlyFloodingMargin", self.spectral.early_flooding_margin),
            ("explanation.forestNdviMin", self.explanation.forest_ndvi_min),
            ("explanation.forestLswiMax", self.explanation.forest_lswi_max),
            ("explanation.dryNdwiMax", self.explanation.dry_ndwi_max),
            ("radar.floodingThresholdDb", self.radar.flooding_threshold_db),
            ("acquisition.maxCloudPercentage", self.acquisition.max_cloud_percentage),
            ("acquisition.speckleFilterRadiusM", self.acquisition.speckle_filter_radius_m),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                problems.push(format!("{} must be finite (got {})", name, value));
            }
        }

        let fractions = [
            ("radar.waterFractionMin", self.radar.water_fraction_min),
            ("regimes.continuouslyFloodedMin", self.regimes.continuously_flooded_min),
            ("regimes.intermittentMin", self.regimes.intermittent_min),
            ("regimes.intermittentMax", self.regimes.intermittent_max),
            ("regimes.irrigatedWaterMin", self.regimes.irrigated_water_min),
            ("regimes.uplandWaterMax", self.regimes.upland_water_max),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                problems.push(format!("{} must be a fraction in [0, 1] (got {})", name, value));
            }
        }
        if !self.regimes.irrigated_lswi_min.is_finite() {
            problems.push("regimes.irrigatedLswiMin must be finite".to_string());
        }

        if self.spectral.ndvi_min > self.spectral.ndvi_max {
            problems.push(format!(
                "spectral.ndviMin ({}) exceeds spectral.ndviMax ({})",
                self.spectral.ndvi_min, self.spectral.ndvi_max
            ));
        }
        if self.spectral.evi_min > self.spectral.evi_max {
            problems.push(format!(
                "spectral.eviMin ({}) exceeds spectral.eviMax ({})",
                self.spectral.evi_min, self.spectral.evi_max
            ));
        }
        if self.regimes.intermittent_min >= self.regimes.intermittent_max {
            problems.push(format!(
                "regimes.intermittentMin ({}) must be below regimes.intermittentMax ({})",
                self.regimes.intermittent_min, self.regimes.intermittent_max
            ));
        }
        if !(self.spectral.ndvi_lswi_max_diff > 0.0) {
            problems.push("spectral.ndviLswiMaxDiff must be positive".to_string());
        }
        if self.spectral.early_flooding_margin < 0.0 {
            problems.push("spectral.earlyFloodingMargin must not be negative".to_string());
        }
        if !(1..=5).contains(&self.spectral.min_criteria_for_crop) {
            problems.push(format!(
                "spectral.minCriteriaForCrop must be between 1 and 5 (got {})",
                self.spectral.min_criteria_for_crop
            ));
        }
        if !(self.area.mismatch_tolerance_pct > 0.0) {
            problems.push("area.mismatchTolerancePct must be positive".to_string());
        }
        if self.acquisition.window_months == 0 {
            problems.push("acquisition.windowMonths must be at least 1".to_string());
        }
        if !(self.acquisition.max_cloud_percentage > 0.0 && self.acquisition.max_cloud_percentage <= 100.0) {
            problems.push("acquisition.maxCloudPercentage must be in (0, 100]".to_string());
        }
        if self.acquisition.radar_polarization.trim().is_empty() {
            problems.push("acquisition.radarPolarization must not be empty".to_string());
        }
        if self.acquisition.radar_instrument_mode.trim().is_empty() {
            problems.push("acquisition.radarInstrumentMode must not be empty".to_string());
        }
        if !(self.acquisition.speckle_filter_radius_m > 0.0) {
            problems.push("acquisition.speckleFilterRadiusM must be positive".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(VerificationError::ConfigurationError(problems.join("; ")))
        }
    }
}
