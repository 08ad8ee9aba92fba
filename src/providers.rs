//! External Statistics Providers
//!
//! The engine never touches imagery. Collaborators reduce scenes to per-field
//! means for a polygon and time window; these traits are the seams they plug
//! into. `PrecomputedObservations` serves callers (CLI, HTTP) that already
//! hold the provider output.

use crate::error::{Result, Sensor, VerificationError};
use crate::geometry::FieldBoundary;
use crate::utils::VerificationConfig;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date window `[start, end]` searched for scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VerificationWindow {
    /// Window of `months` calendar months ending at `reference_date`
    ///
    /// Month subtraction clamps to the last valid day (May 31 - 3 months = Feb 28/29).
    pub fn ending_at(reference_date: NaiveDate, months: u32) -> Result<Self> {
        let start = reference_date
            .checked_sub_months(Months::new(months))
            .ok_or_else(|| {
                VerificationError::InvalidRequest(format!(
                    "cannot subtract {} months from reference date {}",
                    months, reference_date
                ))
            })?;

        Ok(Self {
            start,
            end: reference_date,
        })
    }
}

/// Mean optical indices over the field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralStatistics {
    pub ndvi: f64,
    pub ndwi: f64,
    pub lswi: f64,
    pub evi: f64,
}

impl SpectralStatistics {
    pub fn is_finite(&self) -> bool {
        [self.ndvi, self.ndwi, self.lswi, self.evi]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Fraction of field pixels below the radar flooding threshold
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarStatistics {
    pub water_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpticalObservation {
    pub statistics: SpectralStatistics,
    pub scene_count: u32,
}

impl OpticalObservation {
    /// Degenerate observation used when no scene contributed
    pub fn no_coverage() -> Self {
        Self {
            statistics: SpectralStatistics::default(),
            scene_count: 0,
        }
    }

    /// Zero scenes always means all-zero statistics
    pub fn normalized(self) -> Self {
        if self.scene_count == 0 {
            Self::no_coverage()
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarObservation {
    pub statistics: SarStatistics,
    pub scene_count: u32,
}

impl RadarObservation {
    pub fn no_coverage() -> Self {
        Self {
            statistics: SarStatistics::default(),
            scene_count: 0,
        }
    }

    pub fn normalized(self) -> Self {
        if self.scene_count == 0 {
            Self::no_coverage()
        } else {
            self
        }
    }
}

/// Optical composite request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpticalQuery {
    pub window: VerificationWindow,
    pub max_cloud_percentage: f64,
}

impl OpticalQuery {
    pub fn from_config(window: VerificationWindow, config: &VerificationConfig) -> Self {
        Self {
            window,
            max_cloud_percentage: config.acquisition.max_cloud_percentage,
        }
    }
}

/// Radar water-fraction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarQuery {
    pub window: VerificationWindow,
    pub polarization: String,
    pub instrument_mode: String,
    pub flooding_threshold_db: f64,
    pub speckle_filter_radius_m: f64,
}

impl RadarQuery {
    pub fn from_config(window: VerificationWindow, config: &VerificationConfig) -> Self {
        Self {
            window,
            polarization: config.acquisition.radar_polarization.clone(),
            instrument_mode: config.acquisition.radar_instrument_mode.clone(),
            flooding_threshold_db: config.radar.flooding_threshold_db,
            speckle_filter_radius_m: config.acquisition.speckle_filter_radius_m,
        }
    }
}

/// Actual field area from the boundary ring
pub trait GeometryProvider: Send + Sync {
    fn area_hectares(&self, boundary: &FieldBoundary) -> Result<f64>;
}

/// Cloud-filtered optical composite statistics
///
/// May return `NoContributingImagery`; the verifier then proceeds with
/// all-zero statistics.
pub trait OpticalStatisticsProvider: Send + Sync {
    fn optical_statistics(
        &self,
        boundary: &FieldBoundary,
        query: &OpticalQuery,
    ) -> Result<OpticalObservation>;
}

/// Speckle-filtered radar water fraction
pub trait RadarStatisticsProvider: Send + Sync {
    fn radar_statistics(
        &self,
        boundary: &FieldBoundary,
        query: &RadarQuery,
    ) -> Result<RadarObservation>;
}

/// Provider output gathered ahead of time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecomputedObservations {
    #[serde(default)]
    pub optical: Option<OpticalObservation>,
    #[serde(default)]
    pub radar: Option<RadarObservation>,
    /// Externally computed area; falls back to the spherical ring area
    #[serde(default)]
    pub actual_area_hectares: Option<f64>,
}

impl GeometryProvider for PrecomputedObservations {
    fn area_hectares(&self, boundary: &FieldBoundary) -> Result<f64> {
        Ok(self
            .actual_area_hectares
            .unwrap_or_else(|| boundary.area_hectares()))
    }
}

impl OpticalStatisticsProvider for PrecomputedObservations {
    fn optical_statistics(
        &self,
        _boundary: &FieldBoundary,
        _query: &OpticalQuery,
    ) -> Result<OpticalObservation> {
        self.optical.ok_or(VerificationError::NoContributingImagery {
            sensor: Sensor::Optical,
        })
    }
}

impl RadarStatisticsProvider for PrecomputedObservations {
    fn radar_statistics(
        &self,
        _boundary: &FieldBoundary,
        _query: &RadarQuery,
    ) -> Result<RadarObservation> {
        self.radar.ok_or(VerificationError::NoContributingImagery {
            sensor: Sensor::Radar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_spans_three_months() {
        let window = VerificationWindow::ending_at(date(2024, 9, 15), 3).unwrap();
        assert_eq!(window.start, date(2024, 6, 15));
        assert_eq!(window.end, date(2024, 9, 15));
    }

    #[test]
    fn test_window_clamps_to_month_end() {
        let window = VerificationWindow::ending_at(date(2024, 5, 31), 3).unwrap();
        assert_eq!(window.start, date(2024, 2, 29));
    }

    #[test]
    fn test_zero_scene_observation_is_zeroed() {
        let obs = OpticalObservation {
            statistics: SpectralStatistics { ndvi: 0.5, ndwi: 0.1, lswi: 0.3, evi: 0.4 },
            scene_count: 0,
        };
        assert_eq!(obs.normalized(), OpticalObservation::no_coverage());

        let radar = RadarObservation {
            statistics: SarStatistics { water_fraction: 0.6 },
            scene_count: 0,
        };
        assert_eq!(radar.normalized().statistics.water_fraction, 0.0);
    }

    #[test]
    fn test_missing_precomputed_optical_reports_no_imagery() {
        let obs = PrecomputedObservations::default();
        let boundary = FieldBoundary::new(vec![[0.0, 0.0], [0.001, 0.0], [0.001, 0.001], [0.0, 0.0]]);
        let window = VerificationWindow::ending_at(date(2024, 9, 1), 3).unwrap();
        let config = VerificationConfig::default();

        let err = obs
            .optical_statistics(&boundary, &OpticalQuery::from_config(window, &config))
            .unwrap_err();
        assert_eq!(err, VerificationError::NoContributingImagery { sensor: Sensor::Optical });
    }

    #[test]
    fn test_radar_query_carries_config_filters() {
        let config = VerificationConfig::default();
        let window = VerificationWindow::ending_at(date(2024, 9, 1), 3).unwrap();
        let query = RadarQuery::from_config(window, &config);
        assert_eq!(query.polarization, "VV");
        assert_eq!(query.instrument_mode, "IW");
        assert_eq!(query.flooding_threshold_db, -15.0);
    }
}
