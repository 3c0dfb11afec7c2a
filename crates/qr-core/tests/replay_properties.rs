//! Property-based tests for replay invariants.
//!
//! Traces are generated well-formed: exit ticks always land after the pid's
//! last event, matching the contract the simulator assumes. The dedupe step
//! is supposed to make invariant violations unobservable, so these assert
//! the invariants hold everywhere rather than expecting an error path.

use proptest::prelude::*;
use qr_common::Pid;
use qr_core::{replay_queues, ExitMap, QueueLabel, TickEvent};
use std::collections::HashSet;

fn label_strategy() -> impl Strategy<Value = QueueLabel> {
    prop_oneof![
        3 => Just(QueueLabel::Top),
        3 => Just(QueueLabel::Mid),
        2 => Just(QueueLabel::Low),
        1 => Just(QueueLabel::Idle),
    ]
}

fn trace_strategy() -> impl Strategy<Value = (Vec<TickEvent>, ExitMap)> {
    (
        proptest::collection::vec((1u32..=5, label_strategy()), 1..60),
        proptest::collection::vec(any::<bool>(), 5),
    )
        .prop_map(|(steps, exit_flags)| {
            let events: Vec<TickEvent> = steps
                .into_iter()
                .enumerate()
                .map(|(i, (pid, queue))| TickEvent {
                    tick: i as u64,
                    pid: Pid(pid),
                    name: format!("p{pid}"),
                    queue,
                    ms: 10,
                    work_left: None,
                    ticks_left: None,
                })
                .collect();

            let mut exits = ExitMap::new();
            for (offset, exit) in exit_flags.into_iter().enumerate() {
                let pid = Pid(offset as u32 + 1);
                if !exit {
                    continue;
                }
                // Record the exit right after the pid's last scheduling
                // decision, the way the parser numbers exit lines.
                if let Some(last) = events
                    .iter()
                    .rposition(|e| e.pid == pid && !e.queue.is_idle())
                {
                    exits.insert(pid, last as u64 + 1);
                }
            }
            (events, exits)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    #[test]
    fn pid_occupies_at_most_one_place((events, exits) in trace_strategy()) {
        for snapshot in replay_queues(&events, &exits, 600) {
            let mut seen = HashSet::new();
            for pid in snapshot
                .top
                .iter()
                .chain(snapshot.mid.iter())
                .chain(snapshot.low.iter())
                .chain(snapshot.running.iter())
            {
                prop_assert!(
                    seen.insert(*pid),
                    "pid {} occupies two places at tick {}",
                    pid,
                    snapshot.tick
                );
            }
        }
    }

    #[test]
    fn exited_pids_vanish_from_their_exit_tick_on((events, exits) in trace_strategy()) {
        let snapshots = replay_queues(&events, &exits, 600);
        for (pid, exit_tick) in &exits {
            for snapshot in snapshots.iter().filter(|s| s.tick >= *exit_tick) {
                prop_assert!(
                    !snapshot.top.contains(pid)
                        && !snapshot.mid.contains(pid)
                        && !snapshot.low.contains(pid),
                    "exited pid {} still queued at tick {}",
                    pid,
                    snapshot.tick
                );
                prop_assert_ne!(snapshot.running, Some(*pid));
            }
        }
    }

    #[test]
    fn replay_is_deterministic((events, exits) in trace_strategy()) {
        let first = replay_queues(&events, &exits, 600);
        let second = replay_queues(&events, &exits, 600);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn frame_cap_bounds_the_sequence(
        (events, exits) in trace_strategy(),
        cap in 0usize..100,
    ) {
        let snapshots = replay_queues(&events, &exits, cap);
        prop_assert_eq!(snapshots.len(), events.len().min(cap));
    }
}
