// Verify a single field from a JSON payload
//
// Usage: verify_field <payload.json> [config.json]
//
// The payload holds `request` (boundary, declared area, regime, reference date)
// and `observations` (optical/radar statistics from the geospatial provider).
// The report is printed to stdout as pretty JSON.

use anyhow::{Context, Result};
use paddy_verifier::{verify_observed, PrecomputedObservations, VerificationConfig, VerificationRequest};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    request: VerificationRequest,
    #[serde(default)]
    observations: PrecomputedObservations,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paddy_verifier=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <payload.json> [config.json]", args[0]);
        std::process::exit(2);
    }

    let payload_path = Path::new(&args[1]);
    let contents = fs::read_to_string(payload_path)
        .with_context(|| format!("Failed to read payload file: {:?}", payload_path))?;
    let payload: Payload = serde_json::from_str(&contents)
        .with_context(|| "Failed to parse payload JSON")?;

    let config = match args.get(2) {
        Some(path) => VerificationConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load verification config: {}", path))?,
        None => VerificationConfig::default(),
    };

    let report = verify_observed(&config, &payload.request, &payload.observations)
        .with_context(|| "Verification failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
