use std::thread;

use physics::{IdentityStep, State, StepError};
use runtime::{
    Clock, Driver, ManualClock, NullObserver, Settings, Simulation, SimulationConfig, StopSignal,
    TickHistory,
};

fn simulation(clock: &ManualClock) -> Simulation<IdentityStep, ManualClock> {
    Simulation::create(
        SimulationConfig::default(),
        State::new(0.0, 0.0),
        IdentityStep,
        clock.clone(),
    )
    .expect("default config is valid")
}

#[test]
fn max_ticks_bounds_the_loop() -> anyhow::Result<()> {
    let clock = ManualClock::new(0.0);
    let mut sim = simulation(&clock);
    let driver = Driver::new(60.0).with_max_ticks(30);

    let ticks = driver.run(&mut sim, &mut Settings::running(), &mut NullObserver, &StopSignal::new())?;
    assert_eq!(ticks, 30);
    assert_eq!(sim.history().len(), 31);
    // Pacing sleeps on the simulation clock: one frame per physics step.
    assert!((clock.now_ms() - 30.0 * 1000.0 / 60.0).abs() < 1e-6);
    let steps: usize = sim.history().iter().map(|r| r.physics_steps).sum();
    assert!((29..=30).contains(&steps), "{steps}");
    Ok(())
}

#[test]
fn stop_finishes_the_current_tick_only() -> anyhow::Result<()> {
    let clock = ManualClock::new(0.0);
    let mut sim = simulation(&clock);
    let stop = StopSignal::new();
    let mut observed = 0;
    let mut observer = |history: &TickHistory| -> Result<(), StepError> {
        observed += 1;
        if history.len() == 6 {
            stop.stop();
        }
        Ok(())
    };

    let ticks = Driver::new(60.0).run(&mut sim, &mut Settings::running(), &mut observer, &stop)?;
    assert_eq!(ticks, 5);
    assert_eq!(observed, 5);
    assert_eq!(sim.history().len(), 6);
    Ok(())
}

#[test]
fn already_stopped_driver_does_not_tick() -> anyhow::Result<()> {
    let clock = ManualClock::new(0.0);
    let mut sim = simulation(&clock);
    let stop = StopSignal::new();
    stop.stop();
    let ticks = Driver::new(60.0).run(&mut sim, &mut Settings::running(), &mut NullObserver, &stop)?;
    assert_eq!(ticks, 0);
    assert_eq!(sim.history().len(), 1);
    Ok(())
}

#[test]
fn settings_are_sampled_every_tick() -> anyhow::Result<()> {
    let clock = ManualClock::new(0.0);
    let mut sim = simulation(&clock);
    let mut tick = 0;
    let mut settings = || {
        tick += 1;
        Settings::new(tick % 2 == 0, 0.0)
    };

    Driver::new(60.0)
        .with_max_ticks(6)
        .run(&mut sim, &mut settings, &mut NullObserver, &StopSignal::new())?;
    let paused: Vec<bool> = sim.history().iter().skip(1).map(|r| r.paused).collect();
    assert_eq!(paused, [false, true, false, true, false, true]);
    Ok(())
}

#[test]
fn slow_frames_produce_catch_up_steps() -> anyhow::Result<()> {
    let clock = ManualClock::new(0.0);
    let mut sim = simulation(&clock);
    // 50 ms of artificial delay per tick against a 60 Hz physics rate.
    Driver::new(60.0).with_max_ticks(4).run(
        &mut sim,
        &mut Settings::new(false, 50.0),
        &mut NullObserver,
        &StopSignal::new(),
    )?;
    for record in sim.history().iter().skip(1) {
        assert!((2..=3).contains(&record.physics_steps));
        assert_eq!(record.delay_ms, 50.0);
    }
    let steps: usize = sim.history().iter().map(|r| r.physics_steps).sum();
    assert_eq!(steps, 12);
    Ok(())
}

#[test]
fn independent_instances_run_on_their_own_threads() {
    let results: Vec<(u64, f64)> = thread::scope(|scope| {
        let handles: Vec<_> = (1..=4_u32)
            .map(|i| {
                scope.spawn(move || {
                    let clock = ManualClock::new(0.0);
                    let mut sim = simulation(&clock);
                    let ticks = Driver::new(60.0)
                        .with_max_ticks(u64::from(i) * 10)
                        .run(&mut sim, &mut Settings::running(), &mut NullObserver, &StopSignal::new())
                        .expect("identity step never fails");
                    (ticks, sim.current_state().end_ms())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("instance thread panicked"))
            .collect()
    });

    for (i, (ticks, simulated_ms)) in results.into_iter().enumerate() {
        let expected_ticks = (i as u64 + 1) * 10;
        assert_eq!(ticks, expected_ticks);
        #[allow(clippy::cast_precision_loss)]
        let wall = expected_ticks as f64 * 1000.0 / 60.0;
        assert!(simulated_ms <= wall + 1e-6);
        assert!(simulated_ms >= wall - 1000.0 / 60.0 - 1e-6);
    }
}
