//! Integration tests for the polling loop
//!
//! Drives `Monitor` end to end with scripted frames and checks the state
//! sequence, the reports handed to the sink and the failure handling.

mod common;

use easymoo_core::time::ImmediateWake;
use easymoo_core::{DeviceState, LinkState, Metric, Monitor, MonitorConfig, Report};

use common::{
    collapsed, grazing, heat_stress, night, resting, RecordingSink, ScriptedSource, SlowWake,
};

fn quiet_config() -> MonitorConfig {
    MonitorConfig::builder()
        .inactive(2.0, 3)
        .hot(40.0, 2)
        .dark(10.0, 2)
        .report_every(1000)
        .build()
        .unwrap()
}

#[test]
fn off_sensing_sleep_critical_and_back() {
    let source = ScriptedSource::new(grazing())
        .then(grazing(), 1)
        .then(resting(), 3)
        .then(collapsed(), 2)
        .then(grazing(), 2);
    let mut monitor =
        Monitor::new(&quiet_config(), source, RecordingSink::default(), ImmediateWake).unwrap();

    let mut states = Vec::new();
    for _ in 0..8 {
        monitor.run_cycle();
        states.push(monitor.fsm().current());
    }

    use DeviceState::*;
    assert_eq!(
        states,
        vec![Sensing, Sensing, Sensing, Sleep, Sleep, Critical, Sleep, Sensing]
    );
    // One report per state change
    assert_eq!(
        monitor.sink().states(),
        vec![Sensing, Sleep, Critical, Sleep, Sensing]
    );
    assert_eq!(monitor.fsm().transitions(), 5);
}

#[test]
fn heat_while_moving_goes_critical_from_sensing() {
    let source = ScriptedSource::new(heat_stress()).then(grazing(), 1);
    let mut monitor =
        Monitor::new(&quiet_config(), source, RecordingSink::default(), ImmediateWake).unwrap();

    monitor.run(3).unwrap();
    assert_eq!(monitor.fsm().current(), DeviceState::Critical);
    assert!(monitor.snapshot().flags.too_hot);
}

#[test]
fn darkness_alone_raises_critical() {
    let source = ScriptedSource::new(night());
    let mut monitor =
        Monitor::new(&quiet_config(), source, RecordingSink::default(), ImmediateWake).unwrap();

    monitor.run(1).unwrap();
    assert_eq!(monitor.fsm().current(), DeviceState::Sensing);
    assert!(!monitor.snapshot().flags.too_dark);

    monitor.run(1).unwrap();
    assert_eq!(monitor.fsm().current(), DeviceState::Critical);
    assert!(monitor.snapshot().flags.too_dark);
}

#[test]
fn default_inactivity_needs_six_hundred_cycles() {
    let source = ScriptedSource::new(resting()).then(grazing(), 1);
    let mut monitor = Monitor::new(
        &MonitorConfig::default(),
        source,
        RecordingSink::default(),
        ImmediateWake,
    )
    .unwrap();

    // cycle 1 grazing, then 599 still cycles
    monitor.run(600).unwrap();
    assert_eq!(monitor.fsm().current(), DeviceState::Sensing);
    assert!(!monitor.snapshot().flags.inactive);

    monitor.run(1).unwrap();
    assert_eq!(monitor.fsm().current(), DeviceState::Sleep);
}

#[test]
fn read_failures_skip_ingest_only() {
    let source = ScriptedSource::new(grazing())
        .then(grazing(), 2)
        .then_fail(3);
    let mut monitor =
        Monitor::new(&quiet_config(), source, RecordingSink::default(), ImmediateWake).unwrap();

    monitor.run(6).unwrap();

    let stats = monitor.stats();
    assert_eq!(stats.cycles, 6);
    assert_eq!(stats.read_errors, 3);
    assert_eq!(monitor.engine().window(Metric::Light).len(), 3);
    assert_eq!(monitor.source_mut().reads, 6);
}

#[test]
fn refused_reports_are_counted() {
    let sink = RecordingSink {
        refuse: true,
        ..RecordingSink::default()
    };
    let mut monitor =
        Monitor::new(&quiet_config(), ScriptedSource::new(grazing()), sink, ImmediateWake)
            .unwrap();

    monitor.run(3).unwrap();
    let stats = monitor.stats();
    assert_eq!(stats.transmit_errors, 1);
    assert_eq!(stats.reports_sent, 0);
    assert_eq!(monitor.fsm().current(), DeviceState::Sensing);
}

#[test]
fn loop_blocks_on_the_wake_source() {
    let mut monitor = Monitor::new(
        &quiet_config(),
        ScriptedSource::new(grazing()),
        RecordingSink::default(),
        SlowWake::new(2),
    )
    .unwrap();

    monitor.run(5).unwrap();
    let (_, _, wake) = monitor.into_parts();
    assert_eq!(wake.polls, 15);
}

#[test]
fn periodic_reports_carry_the_score() {
    let config = MonitorConfig::builder()
        .window_capacity(4)
        .report_every(4)
        .build()
        .unwrap();
    let mut monitor = Monitor::new(
        &config,
        ScriptedSource::new(grazing()),
        RecordingSink::default(),
        ImmediateWake,
    )
    .unwrap();

    monitor.run(8).unwrap();

    let sink = monitor.sink();
    let cycles: Vec<u64> = sink.reports.iter().map(|r| r.cycle).collect();
    assert_eq!(cycles, vec![1, 4, 8]);

    // light 18 vs target 8 saturates; accel |(4,-3,2.5)| ≈ 5.59 vs 16
    let last = sink.reports[2];
    let expected = (100.0 + 5.590_17 / 16.0 * 100.0) / 2.0;
    assert!((last.score.value() - expected).abs() < 0.01);

    let record = Report::decode(&sink.payloads[2]).unwrap();
    assert_eq!(record.score, last.score.as_byte());
    assert_eq!(record.state, DeviceState::Sensing);
    assert_eq!(record.temperature, 22);
}

#[test]
fn receiver_session_enters_and_leaves_talk() {
    let mut monitor = Monitor::new(
        &quiet_config(),
        ScriptedSource::new(grazing()),
        RecordingSink::default(),
        ImmediateWake,
    )
    .unwrap();

    monitor.run(2).unwrap();
    monitor.sink_mut().link = LinkState::Connected;
    monitor.run(3).unwrap();
    assert_eq!(monitor.fsm().current(), DeviceState::Talk);

    monitor.sink_mut().link = LinkState::Idle;
    monitor.run(1).unwrap();
    assert_eq!(monitor.fsm().current(), DeviceState::Sleep);
    monitor.run(1).unwrap();
    assert_eq!(monitor.fsm().current(), DeviceState::Sensing);

    assert_eq!(monitor.stats().sessions, 1);
}

#[test]
fn windows_stay_bounded_across_prunes() {
    let config = MonitorConfig::builder()
        .window_capacity(5)
        .prune_every(7)
        .build()
        .unwrap();
    let mut monitor = Monitor::new(
        &config,
        ScriptedSource::new(grazing()),
        RecordingSink::default(),
        ImmediateWake,
    )
    .unwrap();

    for _ in 0..50 {
        monitor.run_cycle();
        for metric in Metric::ALL {
            assert!(monitor.engine().window(metric).len() <= 5);
        }
    }
    assert!(monitor.engine().window(Metric::Light).is_full());
}
