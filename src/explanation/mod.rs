//! Explanation generation
//!
//! Human-readable justifications kept apart from the boolean verdicts so the
//! decision tables can be inspected and tested on their own.

pub mod crop_reason;

pub use crop_reason::{explain_crop, CropReasonCode, ReasonRule, CROP_REASON_RULES};
