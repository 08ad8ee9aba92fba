use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use paddy_verifier::{
    FieldBoundary, OpticalObservation, PaddyVerifier, PrecomputedObservations, RadarObservation,
    SarStatistics, SpectralStatistics, VerificationConfig, VerificationRequest,
};
use std::sync::Arc;

fn field_request(index: usize) -> VerificationRequest {
    let lon = 105.0 + (index % 100) as f64 * 0.01;
    let lat = 10.0 + (index / 100) as f64 * 0.01;
    VerificationRequest {
        project_id: Some(format!("bench-{}", index)),
        boundary: FieldBoundary::new(vec![
            [lon, lat],
            [lon + 0.001, lat],
            [lon + 0.001, lat + 0.001],
            [lon, lat + 0.001],
            [lon, lat],
        ]),
        declared_area_hectares: 1.2,
        declared_water_regime: "continuously_flooded".to_string(),
        reference_date: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
        requested_at: None,
    }
}

fn verifier() -> PaddyVerifier {
    let observations = Arc::new(PrecomputedObservations {
        optical: Some(OpticalObservation {
            statistics: SpectralStatistics {
                ndvi: 0.61,
                ndwi: 0.08,
                lswi: 0.42,
                evi: 0.52,
            },
            scene_count: 6,
        }),
        radar: Some(RadarObservation {
            statistics: SarStatistics {
                water_fraction: 0.47,
            },
            scene_count: 8,
        }),
        actual_area_hectares: None,
    });
    PaddyVerifier::new(
        VerificationConfig::default(),
        observations.clone(),
        observations,
    )
    .unwrap()
}

/// Sequential single-field verification against the Rayon batch path
fn bench_batch_verification(c: &mut Criterion) {
    let verifier = verifier();
    let mut group = c.benchmark_group("batch_verification");

    for size in [10usize, 100, 1000] {
        let requests: Vec<_> = (0..size).map(field_request).collect();

        group.bench_with_input(BenchmarkId::new("sequential", size), &requests, |b, reqs| {
            b.iter(|| {
                for req in reqs {
                    black_box(verifier.verify(req).unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &requests, |b, reqs| {
            b.iter(|| black_box(verifier.verify_batch_parallel(reqs)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_batch_verification);
criterion_main!(benches);
