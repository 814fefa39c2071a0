use std::path::Path;

use clap::Parser;
use stickwalk::app::{run, Cli};

#[test]
fn defaults_match_the_reference_rates() {
    let cli = Cli::parse_from(["stickwalk"]);
    assert_eq!(cli.ups, 60);
    assert_eq!(cli.history, 100);
    assert_eq!(cli.instances, 1);
    assert!(cli.rig.is_none());
    assert!(!cli.paused);
}

#[test]
fn unpaced_instances_each_run_their_ticks() {
    let cli = Cli::parse_from(["stickwalk", "--fps", "0", "--ticks", "25", "--instances", "3"]);
    let reports = run(&cli).unwrap();
    assert_eq!(reports.len(), 3);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.instance, i);
        assert_eq!(report.ticks, 25);
        assert_eq!(report.clock_anomalies, 0);
    }
}

#[test]
fn paused_run_never_advances_physics() {
    let cli = Cli::parse_from(["stickwalk", "--fps", "200", "--ticks", "10", "--paused"]);
    let reports = run(&cli).unwrap();
    assert_eq!(reports[0].simulated_ms, 0.0);
    let stats = reports[0].stats.expect("ten ticks span wall time");
    assert_eq!(stats.updates_per_second, 0.0);
}

#[test]
fn negative_delay_is_accepted_and_clamped() {
    let cli = Cli::parse_from(["stickwalk", "--fps", "0", "--ticks", "3", "--delay-ms", "-5"]);
    assert_eq!(cli.delay_ms, -5.0);
    assert_eq!(run(&cli).unwrap()[0].ticks, 3);
}

#[test]
fn zero_update_rate_is_a_config_error() {
    let cli = Cli::parse_from(["stickwalk", "--ups", "0", "--ticks", "1"]);
    let err = run(&cli).unwrap_err();
    assert!(format!("{err:#}").contains("updates per second"));
}

#[test]
fn cyclic_rig_is_refused() {
    let rig = Path::new(env!("CARGO_MANIFEST_DIR")).join("../crates/phenotype/tests/data/cyclic.json");
    let cli = Cli::parse_from([
        "stickwalk".to_owned(),
        "--rig".to_owned(),
        rig.display().to_string(),
        "--ticks".to_owned(),
        "1".to_owned(),
    ]);
    let err = run(&cli).unwrap_err();
    assert!(format!("{err:#}").contains("cycle"));
}
