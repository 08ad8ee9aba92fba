//! Water Regime Matcher
//!
//! Declared water-management regimes arrive as free text ("continuously_flooded",
//! "Intermittent - multiple aeration", "rainfed", "upland", ...). They are mapped
//! once into a `WaterRegime` family, then each family applies its own rule:
//!
//! | Family                | Matches when                                          |
//! |-----------------------|-------------------------------------------------------|
//! | ContinuouslyFlooded   | water detected AND fraction > 0.4                     |
//! | IntermittentOrRainfed | water detected AND 0.15 < fraction < 0.5              |
//! | Irrigated             | LSWI > 0.15 OR (water detected AND fraction > 0.2)    |
//! | Upland                | NOT water detected OR fraction < 0.2                  |
//! | Unrecognized          | water expected == water detected                      |
//!
//! Irrigated fields may be drained at acquisition time, so high canopy water
//! content (LSWI) alone is accepted.

use crate::metrics::radar_water::WaterDetection;
use crate::utils::RegimeThresholds;
use serde::{Deserialize, Serialize};

/// Declared regime family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "camelCase")]
pub enum WaterRegime {
    ContinuouslyFlooded,
    IntermittentOrRainfed,
    Irrigated,
    Upland,
    /// No family token found; `implies_water` when the text mentions flooding or irrigation
    Unrecognized {
        #[serde(rename = "impliesWater")]
        implies_water: bool,
    },
}

/// Substring tokens per family, in classification priority order
const REGIME_FAMILIES: [(WaterRegime, &[&str]); 4] = [
    (WaterRegime::ContinuouslyFlooded, &["continuous"]),
    (
        WaterRegime::IntermittentOrRainfed,
        &["intermittent", "rainfed", "rain fed", "aeration", "alternate wetting"],
    ),
    (WaterRegime::Irrigated, &["irrigat"]),
    (WaterRegime::Upland, &["upland", "dry"]),
];

impl WaterRegime {
    /// Classify a declared regime string (case-insensitive, `-`/`_` treated as spaces)
    pub fn classify(declared: &str) -> Self {
        let normalized = declared
            .trim()
            .to_lowercase()
            .replace(|c: char| c == '-' || c == '_', " ");

        for (family, tokens) in REGIME_FAMILIES.iter() {
            if tokens.iter().any(|token| normalized.contains(token)) {
                return *family;
            }
        }

        WaterRegime::Unrecognized {
            implies_water: normalized.contains("flooded") || normalized.contains("irrigated"),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WaterRegime::ContinuouslyFlooded => "Continuously flooded",
            WaterRegime::IntermittentOrRainfed => "Intermittently flooded / rainfed",
            WaterRegime::Irrigated => "Irrigated",
            WaterRegime::Upland => "Upland / dry",
            WaterRegime::Unrecognized { .. } => "Unrecognized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeMatch {
    pub regime_match: bool,
    pub regime: WaterRegime,
    pub reason: String,
}

fn pct(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Compare observed water against the declared regime family
pub fn match_regime(
    regime: WaterRegime,
    water: &WaterDetection,
    lswi: f64,
    thresholds: &RegimeThresholds,
) -> RegimeMatch {
    let fraction = water.water_fraction;
    let detected = water.water_detected;

    let (regime_match, reason) = match regime {
        WaterRegime::ContinuouslyFlooded => {
            let matched = detected && fraction > thresholds.continuously_flooded_min;
            let reason = if matched {
                format!(
                    "Continuous flooding confirmed: {:.1}% water coverage (>{:.0}% required)",
                    pct(fraction),
                    pct(thresholds.continuously_flooded_min)
                )
            } else {
                format!(
                    "Continuous flooding declared but only {:.1}% water coverage observed (>{:.0}% required)",
                    pct(fraction),
                    pct(thresholds.continuously_flooded_min)
                )
            };
            (matched, reason)
        }
        WaterRegime::IntermittentOrRainfed => {
            let in_band =
                fraction > thresholds.intermittent_min && fraction < thresholds.intermittent_max;
            let matched = detected && in_band;
            let reason = if matched {
                format!(
                    "Intermittent/rainfed pattern consistent: {:.1}% water coverage within the {:.0}-{:.0}% band",
                    pct(fraction),
                    pct(thresholds.intermittent_min),
                    pct(thresholds.intermittent_max)
                )
            } else if !detected {
                format!(
                    "Intermittent/rainfed regime declared but no standing water detected ({:.1}% coverage)",
                    pct(fraction)
                )
            } else {
                format!(
                    "Water coverage {:.1}% is outside the {:.0}-{:.0}% band expected for intermittent/rainfed fields",
                    pct(fraction),
                    pct(thresholds.intermittent_min),
                    pct(thresholds.intermittent_max)
                )
            };
            (matched, reason)
        }
        WaterRegime::Irrigated => {
            let moist_canopy = lswi > thresholds.irrigated_lswi_min;
            let standing_water = detected && fraction > thresholds.irrigated_water_min;
            let reason = if moist_canopy {
                format!(
                    "Irrigation consistent: high vegetation water content (LSWI {:.2} > {:.2})",
                    lswi, thresholds.irrigated_lswi_min
                )
            } else if standing_water {
                format!(
                    "Irrigation consistent: standing water on {:.1}% of the field (>{:.0}%)",
                    pct(fraction),
                    pct(thresholds.irrigated_water_min)
                )
            } else {
                format!(
                    "Irrigated regime declared but LSWI {:.2} <= {:.2} and water coverage {:.1}% shows no irrigation",
                    lswi,
                    thresholds.irrigated_lswi_min,
                    pct(fraction)
                )
            };
            (moist_canopy || standing_water, reason)
        }
        WaterRegime::Upland => {
            let matched = !detected || fraction < thresholds.upland_water_max;
            let reason = if matched {
                format!(
                    "Upland/dry regime consistent: no significant standing water ({:.1}% coverage)",
                    pct(fraction)
                )
            } else {
                format!(
                    "Upland/dry regime declared but {:.1}% water coverage observed (<{:.0}% expected)",
                    pct(fraction),
                    pct(thresholds.upland_water_max)
                )
            };
            (matched, reason)
        }
        WaterRegime::Unrecognized { implies_water } => {
            let matched = implies_water == detected;
            let expectation = if implies_water { "water expected" } else { "no water expected" };
            let observation = if detected { "water detected" } else { "no water detected" };
            let verdict = if matched { "consistent" } else { "inconsistent" };
            let reason = format!(
                "Unrecognized water regime ({}); {} at {:.1}% coverage: {}",
                expectation,
                observation,
                pct(fraction),
                verdict
            );
            (matched, reason)
        }
    };

    RegimeMatch {
        regime_match,
        regime,
        reason,
    }
}
