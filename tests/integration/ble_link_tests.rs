//! Integration tests for the BLE adapter ↔ shared link ↔ sample loop
//! interplay, using the adapter's host-side simulation hooks in place of
//! the Bluedroid callback context.

use std::sync::Arc;

use airlink::adapters::ble::BleUartAdapter;
use airlink::app::service::AppService;
use airlink::link::PeerLink;

use crate::mock_hw::{RecordingSink, ScriptedSensor};

fn make_stack() -> (AppService, BleUartAdapter, Arc<PeerLink>) {
    let link = Arc::new(PeerLink::new());
    let mut name = heapless::String::<24>::new();
    name.push_str("Air-Quality UART").ok();
    let mut ble = BleUartAdapter::new(name, Arc::clone(&link));
    ble.start().expect("sim BLE start cannot fail");
    (AppService::new(Arc::clone(&link)), ble, link)
}

// ── Connection events gate the pipeline ───────────────────────

#[test]
fn peer_connect_event_enables_notifies() {
    let (mut app, mut ble, _link) = make_stack();
    let mut sensor = ScriptedSensor::new(vec![ScriptedSensor::ok(412, 35)]);
    let mut sink = RecordingSink::new();

    app.tick(&mut sensor, &mut ble, &mut sink);
    assert_eq!(app.frames_sent(), 0, "nothing flows before a peer arrives");

    ble.sim_peer_connected();
    app.tick(&mut sensor, &mut ble, &mut sink);
    assert_eq!(app.frames_sent(), 1);
}

#[test]
fn disconnect_event_stops_notifies_and_reconnect_resumes() {
    let (mut app, mut ble, _link) = make_stack();
    let mut sensor = ScriptedSensor::new(vec![ScriptedSensor::ok(500, 40)]);
    let mut sink = RecordingSink::new();

    ble.sim_peer_connected();
    app.tick(&mut sensor, &mut ble, &mut sink);
    ble.sim_peer_disconnected();
    app.tick(&mut sensor, &mut ble, &mut sink);
    ble.sim_peer_connected();
    app.tick(&mut sensor, &mut ble, &mut sink);

    assert_eq!(app.frames_sent(), 2);
    assert_eq!(app.tick_count(), 3);
}

// ── Duplicate lifecycle events ────────────────────────────────

#[test]
fn duplicate_connect_events_are_a_no_op() {
    let (_app, ble, link) = make_stack();

    ble.sim_peer_connected();
    ble.sim_peer_connected();
    assert!(link.is_connected());

    // One disconnect fully clears the flag; connects do not nest.
    ble.sim_peer_disconnected();
    assert!(!link.is_connected());
}

// ── Inbound RX path ───────────────────────────────────────────

#[test]
fn inbound_writes_are_discarded_without_side_effects() {
    let (mut app, mut ble, link) = make_stack();
    let mut sensor = ScriptedSensor::new(vec![ScriptedSensor::ok(412, 35)]);
    let mut sink = RecordingSink::new();

    ble.sim_peer_connected();
    ble.sim_peer_write(b"gimme readings\r\n");
    ble.sim_peer_write(&[]);
    ble.sim_peer_write(&[0xA5; 2048]); // oversized, opaque

    assert!(link.is_connected(), "RX traffic must not disturb the link");
    app.tick(&mut sensor, &mut ble, &mut sink);
    assert_eq!(app.frames_sent(), 1, "pipeline unaffected by RX traffic");
}
