//! End-to-end link lifecycle flows against the mock advertiser.
//!
//! Drives the GAP coordinator and GATT access handler the way the
//! main loop does, without a radio stack.

use blehub::commands::Command;
use blehub::gap::{Coordinator, GapEvent};
use blehub::gatt::{GattAccessHandler, READ_PAYLOAD};
use blehub::slots::{ConnHandle, MAX_DEVICES};

use crate::mock_adv::MockAdvertiser;

fn connect(h: u16) -> GapEvent {
    GapEvent::Connect {
        handle: ConnHandle(h),
        success: true,
    }
}

fn disconnect(h: u16) -> GapEvent {
    GapEvent::Disconnect {
        handle: ConnHandle(h),
    }
}

#[test]
fn connect_write_disconnect_flow() {
    let mut coord = Coordinator::new();
    let mut adv = MockAdvertiser::default();
    let gatt = GattAccessHandler::new();

    coord.handle_event(connect(7), &mut adv);
    assert_eq!(coord.slots().device_number(ConnHandle(7)), 1);

    let cmd = gatt.on_write(coord.slots(), ConnHandle(7), b"LIGHT ON");
    assert_eq!(cmd, Command::LightOn);

    coord.handle_event(disconnect(7), &mut adv);
    assert_eq!(coord.slots().device_number(ConnHandle(7)), 0);

    // Connect and disconnect each restarted advertising once.
    assert_eq!(adv.restarts, 2);
}

#[test]
fn five_centrals_then_overflow() {
    let mut coord = Coordinator::new();
    let mut adv = MockAdvertiser::default();
    let gatt = GattAccessHandler::new();

    for i in 0..MAX_DEVICES as u16 {
        coord.handle_event(connect(100 + i), &mut adv);
    }
    assert_eq!(coord.slots().occupied_count(), MAX_DEVICES);

    // Sixth central: accepted by the radio layer, untracked by us.
    coord.handle_event(connect(200), &mut adv);
    assert_eq!(coord.slots().occupied_count(), MAX_DEVICES);
    assert_eq!(coord.slots().device_number(ConnHandle(200)), 0);

    // Its writes still succeed, attributed to device 0.
    let cmd = gatt.on_write(coord.slots(), ConnHandle(200), b"FAN OFF");
    assert_eq!(cmd, Command::FanOff);

    // Every successful connect re-advertised, including the overflow one.
    assert_eq!(adv.restarts, MAX_DEVICES + 1);
}

#[test]
fn slot_is_stable_while_others_come_and_go() {
    let mut coord = Coordinator::new();
    let mut adv = MockAdvertiser::default();

    coord.handle_event(connect(1), &mut adv);
    coord.handle_event(connect(2), &mut adv);
    coord.handle_event(connect(3), &mut adv);

    coord.handle_event(disconnect(1), &mut adv);
    coord.handle_event(connect(4), &mut adv);
    coord.handle_event(disconnect(3), &mut adv);

    // Device 2 never moved from slot 2.
    assert_eq!(coord.slots().device_number(ConnHandle(2)), 2);
    // Device 4 reused the freed slot 1.
    assert_eq!(coord.slots().device_number(ConnHandle(4)), 1);
}

#[test]
fn read_is_invariant_across_history() {
    let mut coord = Coordinator::new();
    let mut adv = MockAdvertiser::default();
    let gatt = GattAccessHandler::new();

    assert_eq!(gatt.on_read(ConnHandle(9)), READ_PAYLOAD);

    coord.handle_event(connect(9), &mut adv);
    let _ = gatt.on_write(coord.slots(), ConnHandle(9), b"garbage");
    assert_eq!(gatt.on_read(ConnHandle(9)), READ_PAYLOAD);

    coord.handle_event(disconnect(9), &mut adv);
    assert_eq!(gatt.on_read(ConnHandle(9)), READ_PAYLOAD);
}

#[test]
fn failed_connect_then_adv_complete_cycle() {
    let mut coord = Coordinator::new();
    let mut adv = MockAdvertiser::default();

    // A failed attempt does not re-advertise by itself...
    coord.handle_event(
        GapEvent::Connect {
            handle: ConnHandle(5),
            success: false,
        },
        &mut adv,
    );
    assert_eq!(adv.restarts, 0);
    assert_eq!(coord.slots().occupied_count(), 0);

    // ...the stack's advertising-complete event does.
    coord.handle_event(GapEvent::AdvComplete, &mut adv);
    assert_eq!(adv.restarts, 1);
}
