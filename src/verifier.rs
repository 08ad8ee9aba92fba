//! Paddy Verifier - coordinator for field verification
//!
//! Validates the request, acquires optical and radar statistics concurrently,
//! runs the four checks and assembles the report. Holds only immutable state,
//! so one verifier can serve any number of threads.

use crate::error::{Result, Sensor, VerificationError};
use crate::geometry::SphericalAreaProvider;
use crate::metrics::{
    classify_crop, compare_area, detect_water, match_regime, WaterRegime,
};
use crate::providers::{
    GeometryProvider, OpticalObservation, OpticalQuery, OpticalStatisticsProvider,
    PrecomputedObservations, RadarObservation, RadarQuery, RadarStatisticsProvider,
    VerificationWindow,
};
use crate::report::{assemble_report, Findings, SceneCounts, VerificationRequest, VerificationResult};
use crate::utils::VerificationConfig;
use rayon::prelude::*;
use std::sync::Arc;

/// Main verifier
pub struct PaddyVerifier {
    config: VerificationConfig,
    geometry: Arc<dyn GeometryProvider>,
    optical: Arc<dyn OpticalStatisticsProvider>,
    radar: Arc<dyn RadarStatisticsProvider>,
}

impl PaddyVerifier {
    /// Build a verifier; the config is validated here, before any provider is used
    pub fn new(
        config: VerificationConfig,
        optical: Arc<dyn OpticalStatisticsProvider>,
        radar: Arc<dyn RadarStatisticsProvider>,
    ) -> Result<Self> {
        config.validate()?;

        tracing::info!("Paddy verifier initialized (config version {})", config.version);

        Ok(Self {
            config,
            geometry: Arc::new(SphericalAreaProvider),
            optical,
            radar,
        })
    }

    /// Replace the default spherical-area geometry provider
    pub fn with_geometry_provider(mut self, geometry: Arc<dyn GeometryProvider>) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Verify one field
    pub fn verify(&self, request: &VerificationRequest) -> Result<VerificationResult> {
        run_verification(
            &self.config,
            request,
            self.geometry.as_ref(),
            self.optical.as_ref(),
            self.radar.as_ref(),
        )
    }

    /// Verify many independent fields in parallel (Rayon); results keep input order
    pub fn verify_batch_parallel(
        &self,
        requests: &[VerificationRequest],
    ) -> Vec<Result<VerificationResult>> {
        tracing::info!("Verifying batch of {} fields", requests.len());

        requests.par_iter().map(|request| self.verify(request)).collect()
    }
}

/// Verify a field whose provider output is already at hand
pub fn verify_observed(
    config: &VerificationConfig,
    request: &VerificationRequest,
    observations: &PrecomputedObservations,
) -> Result<VerificationResult> {
    config.validate()?;
    run_verification(config, request, observations, observations, observations)
}

fn run_verification(
    config: &VerificationConfig,
    request: &VerificationRequest,
    geometry: &dyn GeometryProvider,
    optical: &dyn OpticalStatisticsProvider,
    radar: &dyn RadarStatisticsProvider,
) -> Result<VerificationResult> {
    // Fatal request problems stop the run before any provider is queried
    request.boundary.validate()?;
    if !request.declared_area_hectares.is_finite() || request.declared_area_hectares <= 0.0 {
        return Err(VerificationError::InvalidRequest(format!(
            "declared area must be a positive number of hectares (got {})",
            request.declared_area_hectares
        )));
    }
    let window =
        VerificationWindow::ending_at(request.reference_date, config.acquisition.window_months)?;

    tracing::info!(
        "Verifying field {} ({} ha declared, regime '{}', window {} to {})",
        request.project_id.as_deref().unwrap_or("<unnamed>"),
        request.declared_area_hectares,
        request.declared_water_regime,
        window.start,
        window.end
    );

    // Geometry errors are fatal too, so the area is settled before imagery is fetched
    let actual_area_hectares = geometry.area_hectares(&request.boundary)?;
    let area = compare_area(request.declared_area_hectares, actual_area_hectares, &config.area)?;

    let optical_query = OpticalQuery::from_config(window, config);
    let radar_query = RadarQuery::from_config(window, config);

    let (optical_result, radar_result) = rayon::join(
        || optical.optical_statistics(&request.boundary, &optical_query),
        || radar.radar_statistics(&request.boundary, &radar_query),
    );
    let optical_obs = recover_optical(optical_result)?;
    let radar_obs = recover_radar(radar_result)?;

    let crop = classify_crop(&optical_obs.statistics, config);
    let water = detect_water(&radar_obs.statistics, &config.radar);
    let regime = match_regime(
        WaterRegime::classify(&request.declared_water_regime),
        &water,
        optical_obs.statistics.lswi,
        &config.regimes,
    );

    let scenes = SceneCounts {
        sentinel_optical_image_count: optical_obs.scene_count,
        sentinel_radar_image_count: radar_obs.scene_count,
    };

    let report = assemble_report(
        request,
        config,
        window,
        Findings {
            area,
            crop,
            water,
            regime,
        },
        scenes,
    );

    tracing::info!("{}", report.summary);

    Ok(report)
}

fn recover_optical(result: Result<OpticalObservation>) -> Result<OpticalObservation> {
    let observation = match result {
        Ok(obs) => obs.normalized(),
        Err(VerificationError::NoContributingImagery { sensor }) => {
            tracing::warn!("No {} scenes in window - using zero statistics", sensor);
            OpticalObservation::no_coverage()
        }
        Err(e) => return Err(e),
    };

    if !observation.statistics.is_finite() {
        return Err(VerificationError::Provider(format!(
            "optical provider returned non-finite statistics: {:?}",
            observation.statistics
        )));
    }
    if observation.scene_count == 0 {
        tracing::warn!("Optical provider reported 0 contributing scenes");
    }

    Ok(observation)
}

fn recover_radar(result: Result<RadarObservation>) -> Result<RadarObservation> {
    let observation = match result {
        Ok(obs) => obs.normalized(),
        Err(VerificationError::NoContributingImagery { sensor }) => {
            tracing::warn!("No {} scenes in window - using zero water fraction", sensor);
            RadarObservation::no_coverage()
        }
        Err(e) => return Err(e),
    };

    let fraction = observation.statistics.water_fraction;
    if !(0.0..=1.0).contains(&fraction) {
        return Err(VerificationError::Provider(format!(
            "{} provider returned water fraction {} outside [0, 1]",
            Sensor::Radar,
            fraction
        )));
    }
    if observation.scene_count == 0 {
        tracing::warn!("Radar provider reported 0 contributing scenes");
    }

    Ok(observation)
}
