//! Radar Water Detector
//!
//! Standing water appears as low VV backscatter. The provider reports the
//! fraction of field pixels below `flooding_threshold_db`; water is detected
//! when that fraction exceeds `water_fraction_min` (strict).
//!
//! No radar coverage gives a fraction of 0 and therefore `false`. The scene
//! count travels with the report so callers can tell "no water" from "no data".

use crate::providers::SarStatistics;
use crate::utils::{round2, RadarThresholds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterDetection {
    pub water_detected: bool,
    /// Fraction as received (0..1), kept unrounded so the verdict can be recomputed
    pub water_fraction: f64,
    /// Fraction × 100, 2 decimals
    pub water_percentage: f64,
}

pub fn is_water_detected(water_fraction: f64, thresholds: &RadarThresholds) -> bool {
    water_fraction > thresholds.water_fraction_min
}

pub fn detect_water(stats: &SarStatistics, thresholds: &RadarThresholds) -> WaterDetection {
    WaterDetection {
        water_detected: is_water_detected(stats.water_fraction, thresholds),
        water_fraction: stats.water_fraction,
        water_percentage: round2(stats.water_fraction * 100.0),
    }
}
