use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use formcast::quality::{self, TelemetrySnapshot};
use formcast::record::MatchContext;
use formcast::store::{EntityStore, StoreFilter};
use formcast::{predict, sample_data};

fn bench_quality_assess(c: &mut Criterion) {
    let store = sample_data::sample_store(42, 2000);
    let telemetry = TelemetrySnapshot::default();

    c.bench_function("quality_assess_2000", |b| {
        b.iter(|| {
            let report = quality::assess(black_box(&store), &telemetry, Vec::new());
            black_box(report.outliers.len());
        })
    });
}

fn bench_bulk_predict(c: &mut Criterion) {
    let store = sample_data::sample_store(42, 2000);
    let cfg = sample_data::sample_config();
    let players = store.list(&StoreFilter::all());
    let ctx = MatchContext {
        own_team: "Crestfield".to_string(),
        opponent_team: "Harbour Town".to_string(),
    };

    c.bench_function("bulk_predict_2000", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for player in &players {
                total += predict::predict(black_box(player), &ctx, &cfg).expected_contribution;
            }
            black_box(total);
        })
    });
}

criterion_group!(benches, bench_quality_assess, bench_bulk_predict);
criterion_main!(benches);
