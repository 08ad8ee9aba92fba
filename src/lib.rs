//! Rice-Paddy Verification Engine
//!
//! Turns per-field satellite statistics into an auditable verdict on a
//! farmer's rice-cultivation claim: is the declared area plausible, does the
//! field look like flooded rice, and does the observed water match the
//! declared water regime.
//!
//! Layout:
//! - `utils/`: versioned thresholds and report rounding
//! - `geometry`: field boundary validation and geodesic area
//! - `providers`: seams for the external statistics collaborators
//! - `metrics/`: the area, crop, radar water and regime checks
//! - `explanation/`: ordered reason tables for the crop verdict
//! - `report`: the immutable verification report
//! - `verifier`: coordinator (single and parallel batch verification)

pub mod error;
pub mod explanation;
pub mod geometry;
pub mod metrics;
pub mod providers;
pub mod report;
pub mod utils;
pub mod verifier;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use error::{Sensor, VerificationError};
pub use geometry::{FieldBoundary, SphericalAreaProvider};
pub use metrics::*;
pub use providers::{
    GeometryProvider, OpticalObservation, OpticalQuery, OpticalStatisticsProvider,
    PrecomputedObservations, RadarObservation, RadarQuery, RadarStatisticsProvider,
    SarStatistics, SpectralStatistics, VerificationWindow,
};
pub use report::{
    DataQuality, SceneCounts, VerificationRequest, VerificationResult, VerificationStatus,
};
pub use utils::VerificationConfig;
pub use verifier::{verify_observed, PaddyVerifier};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
