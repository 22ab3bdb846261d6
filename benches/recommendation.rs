use criterion::{black_box, criterion_group, criterion_main, Criterion};
use soil_sync::{advise_timing, resolve_recommendation, CropType, SoilParameters};

fn bench_resolve(c: &mut Criterion) {
    let known = SoilParameters::default();
    let unknown = SoilParameters {
        crop_type: CropType::from_label("Sorghum"),
        ..SoilParameters::default()
    };

    c.bench_function("resolve_known_crop", |b| {
        b.iter(|| resolve_recommendation(black_box(&known)))
    });
    c.bench_function("resolve_unknown_crop", |b| {
        b.iter(|| resolve_recommendation(black_box(&unknown)))
    });
    c.bench_function("advise_timing", |b| {
        b.iter(|| advise_timing(black_box(55.0), black_box(22.0)))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
