//! Verification Errors
//!
//! Failure taxonomy for the verification engine. Only `InvalidGeometry`,
//! `InvalidRequest`, `ConfigurationError` and `Provider` abort a run;
//! `NoContributingImagery` is absorbed by the verifier, which substitutes
//! all-zero statistics and flags the report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote-sensing instrument that contributes statistics to a verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sensor {
    /// Multispectral optical imagery (NDVI, NDWI, LSWI, EVI)
    Optical,
    /// C-band SAR backscatter (water fraction)
    Radar,
}

impl Sensor {
    pub fn display_name(&self) -> &'static str {
        match self {
            Sensor::Optical => "optical",
            Sensor::Radar => "radar",
        }
    }
}

impl std::fmt::Display for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationError {
    /// Malformed field boundary
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A sensor had no scenes inside the verification window
    #[error("no contributing {sensor} imagery in the verification window")]
    NoContributingImagery { sensor: Sensor },

    /// Missing or inconsistent threshold configuration
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// Request fields that violate a documented precondition
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An external statistics collaborator failed
    #[error("statistics provider failed: {0}")]
    Provider(String),
}

impl VerificationError {
    /// Whether the verifier proceeds with degenerate defaults instead of failing
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VerificationError::NoContributingImagery { .. })
    }
}

pub type Result<T> = std::result::Result<T, VerificationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_imagery_is_recoverable() {
        assert!(VerificationError::NoContributingImagery { sensor: Sensor::Radar }.is_recoverable());
        assert!(!VerificationError::InvalidGeometry("open ring".into()).is_recoverable());
        assert!(!VerificationError::ConfigurationError("ndvi".into()).is_recoverable());
        assert!(!VerificationError::Provider("timeout".into()).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = VerificationError::NoContributingImagery { sensor: Sensor::Optical };
        assert_eq!(err.to_string(), "no contributing optical imagery in the verification window");

        let err = VerificationError::InvalidGeometry("ring is not closed".into());
        assert_eq!(err.to_string(), "invalid geometry: ring is not closed");
    }
}
