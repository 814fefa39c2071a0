use criterion::{black_box, criterion_group, criterion_main, Criterion};
use physics::{IdentityStep, State};
use runtime::{ManualClock, NullObserver, Settings, Simulation, SimulationConfig};

fn bench_tick(c: &mut Criterion) {
    let clock = ManualClock::new(0.0);
    let mut sim = Simulation::create(
        SimulationConfig::default(),
        State::new(0.0, 0.0),
        IdentityStep,
        clock.clone(),
    )
    .unwrap();

    // 30 fps against 60 Hz physics: two steps and one history append per tick.
    c.bench_function("tick_two_steps", |b| {
        b.iter(|| {
            clock.advance(1000.0 / 30.0);
            let record = sim.tick(Settings::running(), &mut NullObserver).unwrap();
            black_box(record.physics_steps)
        });
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
