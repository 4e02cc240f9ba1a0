//! Property and fuzz-style tests for robustness of core data structures.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;
use scanpoint::automation::{Automation, FixedDelayAutomation};
use scanpoint::history::ScanHistory;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

// ── Scan history ring-buffer invariants ───────────────────────

#[derive(Debug, Clone)]
enum HistOp {
    Push(String),
    Pop,
    DropOldest,
    Clear,
}

fn arb_hist_op() -> impl Strategy<Value = HistOp> {
    prop_oneof![
        "[a-f0-9]{1,12}".prop_map(HistOp::Push),
        Just(HistOp::Pop),
        Just(HistOp::DropOldest),
        Just(HistOp::Clear),
    ]
}

proptest! {
    /// Whatever sequence of operations runs, the live count never exceeds
    /// capacity and always matches a straightforward queue model.
    #[test]
    fn history_matches_queue_model(
        ops in proptest::collection::vec(arb_hist_op(), 1..=64),
    ) {
        let mut hist: ScanHistory<4> = ScanHistory::new();
        let mut model: VecDeque<String> = VecDeque::new();

        for op in &ops {
            match op {
                HistOp::Push(id) => {
                    let accepted = hist.push(id);
                    let expected = model.len() < 4;
                    prop_assert_eq!(accepted, expected, "push accept mismatch");
                    if accepted {
                        model.push_back(id.clone());
                    }
                }
                HistOp::Pop => {
                    let got = hist.pop();
                    let want = model.pop_front();
                    prop_assert_eq!(got.as_deref(), want.as_deref(), "FIFO order violated");
                }
                HistOp::DropOldest => {
                    let dropped = hist.drop_oldest();
                    prop_assert_eq!(dropped, model.pop_front().is_some());
                }
                HistOp::Clear => {
                    hist.clear();
                    model.clear();
                }
            }

            prop_assert!(hist.len() <= hist.capacity());
            prop_assert_eq!(hist.len(), model.len());
            prop_assert_eq!(hist.is_empty(), model.is_empty());
            prop_assert_eq!(hist.is_full(), model.len() == 4);
        }

        // Membership agrees with the model for every live entry.
        for id in &model {
            prop_assert!(hist.contains(id));
        }
    }

    /// A rejected push (full history or oversized id) must not change
    /// anything.
    #[test]
    fn failed_push_is_side_effect_free(
        ids in proptest::collection::vec("[a-f0-9]{1,12}", 4),
        extra in "[a-f0-9]{1,12}",
        oversized in "[a-z]{33,64}",
    ) {
        let mut hist: ScanHistory<4> = ScanHistory::new();
        for id in &ids {
            hist.push(id);
        }
        let len_before = hist.len();

        if hist.is_full() {
            prop_assert!(!hist.push(&extra));
        }
        prop_assert!(!hist.push(&oversized));

        prop_assert_eq!(hist.len(), len_before);
        for id in &ids {
            prop_assert!(hist.contains(id));
        }
    }
}

// ── Automation callback discipline ────────────────────────────

#[derive(Debug, Clone)]
enum AutoOp {
    Run,
    Update(u32),
    Cancel,
}

fn arb_auto_op() -> impl Strategy<Value = AutoOp> {
    prop_oneof![
        Just(AutoOp::Run),
        (0u32..=10_000u32).prop_map(AutoOp::Update),
        Just(AutoOp::Cancel),
    ]
}

proptest! {
    /// Under any interleaving of run/update/cancel, each armed callback
    /// fires at most once, and total fires never exceed the number of runs.
    #[test]
    fn callbacks_fire_at_most_once_per_run(
        ops in proptest::collection::vec(arb_auto_op(), 1..=40),
    ) {
        let mut a = FixedDelayAutomation::new(500);
        let mut now: u32 = 0;
        let mut runs: u32 = 0;
        let mut per_run: Vec<Rc<Cell<u32>>> = Vec::new();

        for op in &ops {
            match op {
                AutoOp::Run => {
                    let hits = Rc::new(Cell::new(0u32));
                    let h = Rc::clone(&hits);
                    per_run.push(hits);
                    a.run(now, Box::new(move || h.set(h.get() + 1)));
                    runs += 1;
                }
                AutoOp::Update(advance) => {
                    now = now.wrapping_add(*advance);
                    a.update(now);
                }
                AutoOp::Cancel => {
                    a.cancel();
                }
            }
        }

        // Drive time far past the hold to flush any pending completion.
        for _ in 0..3 {
            now = now.wrapping_add(1_000);
            a.update(now);
        }

        let total: u32 = per_run.iter().map(|c| c.get()).sum();
        prop_assert!(total <= runs, "more completions ({total}) than runs ({runs})");
        for hits in &per_run {
            prop_assert!(hits.get() <= 1, "a single run completed twice");
        }
    }
}
