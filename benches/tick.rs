use criterion::{black_box, criterion_group, criterion_main, Criterion};

use orrery::nbody::NBodyConfig;
use orrery::presets;

fn kepler_frame(c: &mut Criterion) {
    let model = presets::full_solar_system().unwrap();
    let mut frame = 0;
    c.bench_function("kepler full system frame", |b| {
        b.iter(|| {
            frame += 1;
            black_box(model.advance_frame(black_box(frame)))
        })
    });
}

fn nbody_tick(c: &mut Criterion) {
    let config = NBodyConfig::new().with_trail_capacity(1_000);
    let mut system = presets::nbody_solar_system(config).unwrap();
    c.bench_function("nbody preset tick", |b| {
        b.iter(|| system.advance_tick().unwrap())
    });
}

criterion_group!(benches, kepler_frame, nbody_tick);
criterion_main!(benches);
