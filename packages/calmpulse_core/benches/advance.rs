use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use calmpulse::vitals::rates::UniformHeartRate;
use calmpulse::vitals::simulator::{Simulator, SimulatorConfig};

fn bench_advance(c: &mut Criterion) {
    c.bench_function("simulator_advance", |b| {
        let mut simulator = Simulator::new(SimulatorConfig::default());
        let mut rates = UniformHeartRate::seeded(70..=160, 7);
        let dt = Duration::from_secs(1);
        b.iter(|| black_box(simulator.advance(dt, &mut rates)));
    });
}

criterion_group!(benches, bench_advance);
criterion_main!(benches);
