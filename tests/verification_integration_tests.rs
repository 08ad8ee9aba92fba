// Verification integration tests
//
// End-to-end runs through `verify_observed` / `PaddyVerifier` with the
// shipped config and sample payload.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use paddy_verifier::explanation::CropReasonCode;
use paddy_verifier::{
    verify_observed, FieldBoundary, OpticalObservation, PaddyVerifier, PrecomputedObservations,
    RadarObservation, SarStatistics, SpectralStatistics, VerificationConfig, VerificationError,
    VerificationRequest, VerificationResult, VerificationStatus, WaterRegime,
};
use std::path::Path;
use std::sync::Arc;

fn manifest_path(relative: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn paddy_ring() -> Vec<[f64; 2]> {
    vec![
        [105.780, 10.030],
        [105.781, 10.030],
        [105.781, 10.031],
        [105.780, 10.031],
        [105.780, 10.030],
    ]
}

fn request(declared_area: f64, regime: &str) -> VerificationRequest {
    VerificationRequest {
        project_id: Some("farm-42".to_string()),
        boundary: FieldBoundary::new(paddy_ring()),
        declared_area_hectares: declared_area,
        declared_water_regime: regime.to_string(),
        reference_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
        requested_at: None,
    }
}

fn observations(
    spectral: Option<(f64, f64, f64, f64)>,
    water_fraction: Option<f64>,
    actual_area: Option<f64>,
) -> PrecomputedObservations {
    PrecomputedObservations {
        optical: spectral.map(|(ndvi, ndwi, lswi, evi)| OpticalObservation {
            statistics: SpectralStatistics { ndvi, ndwi, lswi, evi },
            scene_count: 5,
        }),
        radar: water_fraction.map(|water_fraction| RadarObservation {
            statistics: SarStatistics { water_fraction },
            scene_count: 6,
        }),
        actual_area_hectares: actual_area,
    }
}

fn run(req: &VerificationRequest, obs: &PrecomputedObservations) -> VerificationResult {
    verify_observed(&VerificationConfig::default(), req, obs).unwrap()
}

#[test]
fn test_shipped_config_matches_defaults() {
    let config = VerificationConfig::load(&manifest_path("config/verification_v1.json")).unwrap();
    assert_eq!(config, VerificationConfig::default());
}

#[test]
fn test_sample_payload_verifies() {
    #[derive(serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        request: VerificationRequest,
        observations: PrecomputedObservations,
    }

    let contents = std::fs::read_to_string(manifest_path("data/sample_payload.json")).unwrap();
    let payload: Payload = serde_json::from_str(&contents).unwrap();
    let report = run(&payload.request, &payload.observations);

    assert_eq!(report.status, VerificationStatus::Verified);
    assert_eq!(report.declared.project_id.as_deref(), Some("mekong-demo-001"));
    assert!(report.is_internally_consistent());
}

#[test]
fn test_area_boundary_is_strict() {
    let report = run(&request(2.0, "irrigated"), &observations(Some((0.6, 0.05, 0.25, 0.5)), Some(0.1), Some(2.3)));
    assert_eq!(report.area.area_match_percentage, 15.0);
    assert!(!report.area.area_match);
    assert_eq!(report.status, VerificationStatus::Failed);
}

#[test]
fn test_rice_with_one_divergent_index() {
    let report = run(
        &request(1.22, "irrigated"),
        &observations(Some((0.6, 0.05, 0.25, 0.5)), Some(0.1), None),
    );

    assert!(report.crop.criteria.ndvi_ok);
    assert!(report.crop.criteria.lswi_ok);
    assert!(!report.crop.criteria.ndvi_lswi_ratio);
    assert!(report.crop.criteria.ndwi_ok);
    assert!(report.crop.criteria.evi_ok);
    assert_eq!(report.crop.criteria_met, 4);
    assert!(report.crop.crop_detected);
    assert_relative_eq!(report.crop.confidence, 80.0);
    assert_eq!(report.crop.reason_code, CropReasonCode::RiceDetected);
}

#[test]
fn test_forest_guard() {
    let report = run(
        &request(1.22, "continuously_flooded"),
        &observations(Some((0.82, 0.3, 0.1, 0.6)), Some(0.0), None),
    );
    assert!(!report.crop.crop_detected);
    assert_eq!(report.crop.reason_code, CropReasonCode::LikelyForest);
    assert!(report.crop.reason.contains("trees/forest"));
}

#[test]
fn test_continuously_flooded_match() {
    let report = run(
        &request(1.22, "continuously_flooded"),
        &observations(Some((0.6, 0.05, 0.45, 0.5)), Some(0.45), None),
    );
    assert!(report.water.water_detected);
    assert_eq!(report.water.water_percentage, 45.0);
    assert!(report.regime.regime_match);
    assert_eq!(report.regime.regime, WaterRegime::ContinuouslyFlooded);
    assert_eq!(report.status, VerificationStatus::Verified);
}

#[test]
fn test_upland_with_standing_water() {
    let report = run(
        &request(1.22, "upland"),
        &observations(Some((0.6, 0.05, 0.45, 0.5)), Some(0.35), None),
    );
    assert!(report.water.water_detected);
    assert!(!report.regime.regime_match);
    assert_eq!(report.status, VerificationStatus::Failed);
}

#[test]
fn test_zero_optical_scenes() {
    let report = run(&request(1.22, "continuously_flooded"), &observations(None, Some(0.45), None));

    assert_eq!(report.scenes.sentinel_optical_image_count, 0);
    assert_eq!(report.crop.indices, SpectralStatistics::default());
    assert!(!report.crop.criteria.ndvi_ok);
    assert!(!report.crop.crop_detected);
    assert!(report.data_quality.no_optical_imagery);
    assert_eq!(report.status, VerificationStatus::Inconclusive);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["scenes"]["sentinelOpticalImageCount"], 0);
}

#[test]
fn test_reports_are_byte_identical() {
    let req = request(1.22, "intermittently_flooded");
    let obs = observations(Some((0.55, 0.02, 0.4, 0.45)), Some(0.38), None);

    let first = run(&req, &obs).to_json().unwrap();
    let second = run(&req, &obs).to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_report_embeds_config_snapshot() {
    let mut config = VerificationConfig::default();
    config.version = "1.1.0-strict".to_string();
    config.spectral.min_criteria_for_crop = 5;

    let req = request(1.22, "irrigated");
    let obs = observations(Some((0.6, 0.05, 0.25, 0.5)), Some(0.1), None);

    let strict = verify_observed(&config, &req, &obs).unwrap();
    let default = run(&req, &obs);

    // Same inputs, different threshold version, different verdict
    assert!(default.crop.crop_detected);
    assert!(!strict.crop.crop_detected);
    assert_eq!(strict.config_version, "1.1.0-strict");
    assert_eq!(strict.config, config);
    assert!(strict.is_internally_consistent());

    let json = serde_json::to_value(&strict).unwrap();
    assert_eq!(json["config"]["spectral"]["minCriteriaForCrop"], 5);
}

#[test]
fn test_stable_field_names() {
    let report = run(
        &request(1.22, "continuously_flooded"),
        &observations(Some((0.6, 0.05, 0.45, 0.5)), Some(0.45), None),
    );
    let json = serde_json::to_value(&report).unwrap();

    for key in ["areaMatch", "areaMatchPercentage", "actualAreaHectares"] {
        assert!(json["area"].get(key).is_some(), "missing area.{}", key);
    }
    for key in ["cropDetected", "confidence", "criteriaMet", "reason", "reasonCode"] {
        assert!(json["crop"].get(key).is_some(), "missing crop.{}", key);
    }
    assert!(json["water"].get("waterDetected").is_some());
    assert!(json["water"].get("waterPercentage").is_some());
    assert!(json["regime"].get("regimeMatch").is_some());
    assert_eq!(json["window"]["start"], "2024-07-01");
    assert_eq!(json["window"]["end"], "2024-10-01");
    assert!(json["scenes"].get("sentinelRadarImageCount").is_some());
}

#[test]
fn test_report_roundtrips_through_storage() {
    let report = run(
        &request(1.22, "rainfed"),
        &observations(Some((0.5, 0.0, 0.3, 0.4)), Some(0.4), None),
    );
    let stored = report.to_json().unwrap();
    let restored: VerificationResult = serde_json::from_str(&stored).unwrap();
    assert_eq!(restored, report);
    assert!(restored.is_internally_consistent());
}

#[test]
fn test_invalid_geometry_is_fatal() {
    let mut req = request(1.22, "irrigated");
    req.boundary = FieldBoundary::new(vec![[105.78, 10.03], [105.781, 10.03], [105.78, 10.03]]);

    let err = verify_observed(
        &VerificationConfig::default(),
        &req,
        &observations(Some((0.6, 0.05, 0.25, 0.5)), Some(0.1), None),
    )
    .unwrap_err();
    assert!(matches!(err, VerificationError::InvalidGeometry(_)));
}

#[test]
fn test_invalid_config_is_fatal() {
    let mut config = VerificationConfig::default();
    config.spectral.evi_min = 0.9;

    let err = verify_observed(
        &config,
        &request(1.22, "irrigated"),
        &observations(Some((0.6, 0.05, 0.25, 0.5)), Some(0.1), None),
    )
    .unwrap_err();
    assert!(matches!(err, VerificationError::ConfigurationError(_)));
}

#[test]
fn test_verifier_with_precomputed_providers() {
    let obs = Arc::new(observations(Some((0.6, 0.05, 0.45, 0.5)), Some(0.45), Some(1.25)));
    let verifier = PaddyVerifier::new(VerificationConfig::default(), obs.clone(), obs.clone())
        .unwrap()
        .with_geometry_provider(obs);

    let report = verifier.verify(&request(1.2, "continuously_flooded")).unwrap();
    assert_eq!(report.area.actual_area_hectares, 1.25);
    assert_eq!(report.area.area_match_percentage, 4.17);
    assert!(report.area.area_match);
}

#[test]
fn test_long_mantissa_fraction_survives_storage() {
    let fraction = 0.9856906946328695;
    let report = run(
        &request(1.22, "continuously_flooded"),
        &observations(Some((0.6, 0.05, 0.45, 0.5)), Some(fraction), None),
    );
    let restored: VerificationResult = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(restored.water.water_fraction.to_bits(), fraction.to_bits());
    assert_eq!(restored, report);
}
