//! Integration tests for the tick pipeline: read → validate → encode →
//! connection-gated notify.
//!
//! These drive [`AppService`] with scripted sensors and recording ports,
//! so every assertion sees the full notify/event history.

use std::sync::Arc;

use airlink::app::events::AppEvent;
use airlink::app::service::{AppService, Health};
use airlink::link::{LinkObserver, PeerLink};

use crate::mock_hw::{RecordingRadio, RecordingSink, ScriptedSensor};

fn make_service() -> (AppService, Arc<PeerLink>) {
    let link = Arc::new(PeerLink::new());
    (AppService::new(Arc::clone(&link)), link)
}

// ── Reference frame delivery ──────────────────────────────────

#[test]
fn connected_tick_sends_exactly_one_reference_frame() {
    let (mut app, link) = make_service();
    let mut sensor = ScriptedSensor::new(vec![ScriptedSensor::ok(412, 35)]);
    let mut radio = RecordingRadio::new();
    let mut sink = RecordingSink::new();

    link.on_peer_connected();
    app.tick(&mut sensor, &mut radio, &mut sink);

    assert_eq!(radio.sent.len(), 1);
    assert_eq!(radio.sent[0], b"412,35\n");
    assert_eq!(radio.sent[0].len(), 7);
    assert_eq!(app.frames_sent(), 1);
}

#[test]
fn disconnected_tick_never_touches_the_radio() {
    let (mut app, _link) = make_service();
    let mut sensor = ScriptedSensor::new(vec![ScriptedSensor::ok(600, 12)]);
    let mut radio = RecordingRadio::new();
    let mut sink = RecordingSink::new();

    for _ in 0..5 {
        app.tick(&mut sensor, &mut radio, &mut sink);
    }

    assert!(radio.sent.is_empty(), "no peer, no notify");
    assert_eq!(app.frames_sent(), 0);
    // The sample is still taken and logged locally.
    assert_eq!(sink.samples(), 5);
}

// ── Fault isolation ───────────────────────────────────────────

#[test]
fn faults_on_two_of_ten_ticks_send_eight_frames_and_never_halt() {
    let (mut app, link) = make_service();
    // Faults on ticks 2 and 5 of a ten-tick run.
    let mut script = Vec::new();
    for tick in 1..=10u16 {
        script.push(if tick == 2 || tick == 5 {
            ScriptedSensor::fault()
        } else {
            ScriptedSensor::ok(400 + tick, tick)
        });
    }
    let mut sensor = ScriptedSensor::new(script);
    let mut radio = RecordingRadio::new();
    let mut sink = RecordingSink::new();

    link.on_peer_connected();
    for _ in 0..10 {
        app.tick(&mut sensor, &mut radio, &mut sink);
    }

    assert_eq!(radio.sent.len(), 8);
    assert_eq!(sink.sensor_faults(), 2);
    assert_eq!(app.fault_count(), 2);
    assert_eq!(app.tick_count(), 10);
    assert_eq!(app.health(), Health::Running, "per-tick faults are never fatal");
}

#[test]
fn fault_reading_is_never_encoded_or_sent() {
    let (mut app, link) = make_service();
    let mut sensor = ScriptedSensor::new(vec![ScriptedSensor::fault()]);
    let mut radio = RecordingRadio::new();
    let mut sink = RecordingSink::new();

    link.on_peer_connected();
    for _ in 0..4 {
        app.tick(&mut sensor, &mut radio, &mut sink);
    }

    assert!(radio.sent.is_empty());
    assert_eq!(sink.samples(), 0, "a fault tick produces no sample event");
    assert_eq!(sink.sensor_faults(), 4);
}

// ── Startup halt ──────────────────────────────────────────────

#[test]
fn init_failure_halts_before_the_first_tick_forever() {
    let (mut app, link) = make_service();
    let mut sensor = ScriptedSensor::new(vec![ScriptedSensor::ok(412, 35)]);
    let mut radio = RecordingRadio::new();
    let mut sink = RecordingSink::new();

    link.on_peer_connected();
    app.mark_halted("sensor init failed", &mut sink);
    for _ in 0..20 {
        app.tick(&mut sensor, &mut radio, &mut sink);
    }

    assert_eq!(app.health(), Health::Halted);
    assert_eq!(app.tick_count(), 0, "a halted service never samples");
    assert_eq!(sensor.reads, 0, "the sensor is never touched after halt");
    assert!(radio.sent.is_empty());

    // Exactly one diagnostic: the halt itself. Nothing follows it.
    assert_eq!(sink.events.len(), 1);
    assert!(matches!(sink.events[0], AppEvent::Halted { .. }));
}

// ── Connection churn mid-run ──────────────────────────────────

#[test]
fn frames_flow_only_while_a_peer_is_connected() {
    let (mut app, link) = make_service();
    let mut sensor = ScriptedSensor::new(vec![ScriptedSensor::ok(450, 20)]);
    let mut radio = RecordingRadio::new();
    let mut sink = RecordingSink::new();

    app.tick(&mut sensor, &mut radio, &mut sink); // disconnected
    link.on_peer_connected();
    app.tick(&mut sensor, &mut radio, &mut sink); // connected
    app.tick(&mut sensor, &mut radio, &mut sink); // connected
    link.on_peer_disconnected();
    app.tick(&mut sensor, &mut radio, &mut sink); // dropped, not buffered
    link.on_peer_connected();
    app.tick(&mut sensor, &mut radio, &mut sink); // connected again

    assert_eq!(radio.sent.len(), 3);
    assert_eq!(app.tick_count(), 5, "every tick samples regardless of the peer");
    assert_eq!(sink.samples(), 5);
}
