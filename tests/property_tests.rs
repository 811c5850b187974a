//! Property tests for the slot table invariants.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets. On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use blehub::slots::{ConnHandle, SlotTable, MAX_DEVICES};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum SlotOp {
    Assign(u16),
    Release(u16),
}

fn arb_slot_op() -> impl Strategy<Value = SlotOp> {
    // A small handle space forces plenty of duplicate assigns and
    // releases of both tracked and untracked handles.
    prop_oneof![
        (0u16..8).prop_map(SlotOp::Assign),
        (0u16..8).prop_map(SlotOp::Release),
    ]
}

/// Reference model: the same semantics, written independently.
fn model_apply(model: &mut [Option<u16>; MAX_DEVICES], op: SlotOp) {
    match op {
        SlotOp::Assign(h) => {
            if model.iter().any(|s| *s == Some(h)) {
                return;
            }
            if let Some(free) = model.iter().position(Option::is_none) {
                model[free] = Some(h);
            }
        }
        SlotOp::Release(h) => {
            if let Some(idx) = model.iter().position(|s| *s == Some(h)) {
                model[idx] = None;
            }
        }
    }
}

proptest! {
    /// No two occupied slots ever hold the same handle, occupancy never
    /// exceeds capacity, and the table agrees with an independently
    /// written reference model, for any operation sequence.
    #[test]
    fn uniqueness_and_capacity_hold(
        ops in proptest::collection::vec(arb_slot_op(), 0..64),
    ) {
        let mut table = SlotTable::new();
        let mut model: [Option<u16>; MAX_DEVICES] = [None; MAX_DEVICES];

        for op in ops {
            match op {
                SlotOp::Assign(h) => {
                    let _ = table.assign(ConnHandle(h));
                }
                SlotOp::Release(h) => {
                    let _ = table.release(ConnHandle(h));
                }
            }
            model_apply(&mut model, op);

            prop_assert!(table.occupied_count() <= MAX_DEVICES);

            // Slot-for-slot agreement with the model.
            for (entry, expected) in table.entries().iter().zip(model.iter()) {
                prop_assert_eq!(*entry, expected.map(ConnHandle));
            }

            // No handle occupies two slots.
            for h in 0u16..8 {
                let dups = table
                    .entries()
                    .iter()
                    .filter(|s| **s == Some(ConnHandle(h)))
                    .count();
                prop_assert!(dups <= 1, "handle {} occupies {} slots", h, dups);
            }
        }
    }

    /// An assigned handle keeps its index across arbitrary activity on
    /// other handles.
    #[test]
    fn slot_index_is_stable_until_release(
        ops in proptest::collection::vec(arb_slot_op(), 0..64),
    ) {
        let mut table = SlotTable::new();
        let pinned = ConnHandle(100);
        let pinned_idx = table.assign(pinned).unwrap();

        for op in ops {
            match op {
                SlotOp::Assign(h) => {
                    let _ = table.assign(ConnHandle(h));
                }
                SlotOp::Release(h) => {
                    let _ = table.release(ConnHandle(h));
                }
            }
            prop_assert_eq!(table.find(pinned), Some(pinned_idx));
        }
    }
}
