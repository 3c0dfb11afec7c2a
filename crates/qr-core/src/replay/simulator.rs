//! Three-level queue membership replay.
//!
//! Replays the event stream through a small promotion/demotion state machine
//! and emits one immutable snapshot per processed event. The policy
//! approximates a multi-level feedback queue observed from the outside:
//!
//! - a process that ran from the top level is demoted to the tail of mid;
//! - a process that stays in mid for [`MID_DEMOTION_STREAK`] consecutive
//!   turns ages down to low;
//! - low-level processes stay at the bottom indefinitely;
//! - when the log claims a mid-level run while the mid queue is empty and
//!   low is populated, the two queues' contents are exchanged first
//!   (starvation relief: the mid pipeline must have drained into low).
//!
//! The swap and the streak demotion are independently triggered policies
//! that can both fire around one event; the swap always runs before the
//! removal/reinsertion sequence.

use crate::trace::{ExitMap, QueueLabel, TickEvent};
use qr_common::Pid;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::mem;
use tracing::trace;

/// Consecutive mid-queue turns before a process ages down to the low queue.
pub const MID_DEMOTION_STREAK: u32 = 3;

/// Full queue/running state at one tick.
///
/// Queue order is FIFO with the head next to run. A pid occurs in at most
/// one of `top`/`mid`/`low`/`running`; pids whose exit tick is at or before
/// `tick` occur nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QueueSnapshot {
    /// Simulated tick this snapshot was taken at.
    pub tick: u64,
    /// Top-priority queue contents.
    pub top: Vec<Pid>,
    /// Mid-priority queue contents.
    pub mid: Vec<Pid>,
    /// Low-priority queue contents.
    pub low: Vec<Pid>,
    /// Pid on the processor, or `None` for an idle tick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<Pid>,
    /// Queue label the running pid was dispatched from (IDLE when none).
    pub running_queue: QueueLabel,
}

/// Carried fold state: the three queues plus per-pid streak counters.
#[derive(Debug, Clone, Default)]
struct ReplayState {
    top: Vec<Pid>,
    mid: Vec<Pid>,
    low: Vec<Pid>,
    streak: HashMap<Pid, u32>,
}

impl ReplayState {
    /// Seed each pid into the queue where the trace first shows it, highest
    /// level first. Idle and custom labels never seed.
    fn seeded(events: &[TickEvent]) -> Self {
        let mut state = ReplayState::default();
        let mut seen = HashSet::new();
        for event in events {
            if event.queue == QueueLabel::Top && seen.insert(event.pid) {
                state.top.push(event.pid);
            }
        }
        for event in events {
            if event.queue == QueueLabel::Mid && seen.insert(event.pid) {
                state.mid.push(event.pid);
            }
        }
        for event in events {
            if event.queue == QueueLabel::Low && seen.insert(event.pid) {
                state.low.push(event.pid);
            }
        }
        state
    }

    /// Emit the snapshot for `event` without mutating the state.
    ///
    /// The running pid is excluded from the emitted queue copies so that a
    /// pid occupies at most one place per snapshot; the fold state keeps it
    /// queued until the dispatch removal in [`ReplayState::apply`].
    fn snapshot(&self, tick: u64, event: &TickEvent) -> QueueSnapshot {
        let running = (!event.queue.is_idle()).then_some(event.pid);
        let copy = |queue: &[Pid]| -> Vec<Pid> {
            queue
                .iter()
                .copied()
                .filter(|pid| Some(*pid) != running)
                .collect()
        };
        QueueSnapshot {
            tick,
            top: copy(&self.top),
            mid: copy(&self.mid),
            low: copy(&self.low),
            running,
            running_queue: event.queue.clone(),
        }
    }

    /// Apply one non-idle event's membership transition.
    fn apply(&mut self, event: &TickEvent, exits: &ExitMap, tick: u64) {
        if event.queue == QueueLabel::Mid && self.mid.is_empty() && !self.low.is_empty() {
            trace!(tick, pid = %event.pid, "mid queue empty with low populated, swapping contents");
            mem::swap(&mut self.mid, &mut self.low);
        }

        self.remove_everywhere(event.pid);

        let exited = exits.get(&event.pid).is_some_and(|&at| at <= tick);
        if !exited {
            self.reinsert(event);
        }

        self.dedupe();
        self.purge_exited(exits, tick);
    }

    /// Reinsertion policy, keyed by the queue the event ran from.
    fn reinsert(&mut self, event: &TickEvent) {
        match event.queue {
            QueueLabel::Top => {
                self.streak.insert(event.pid, 0);
                self.mid.push(event.pid);
            }
            QueueLabel::Mid => {
                let streak = self.streak.entry(event.pid).or_insert(0);
                *streak += 1;
                if *streak >= MID_DEMOTION_STREAK {
                    *streak = 0;
                    self.low.push(event.pid);
                } else {
                    self.mid.push(event.pid);
                }
            }
            // Low and custom labels both stay at the lowest level.
            _ => {
                *self.streak.entry(event.pid).or_insert(0) += 1;
                self.low.push(event.pid);
            }
        }
    }

    fn remove_everywhere(&mut self, pid: Pid) {
        self.top.retain(|p| *p != pid);
        self.mid.retain(|p| *p != pid);
        self.low.retain(|p| *p != pid);
    }

    /// Keep each pid's first occurrence scanning top, mid, low in that fixed
    /// order. Invariant repair; idempotent.
    fn dedupe(&mut self) {
        let mut seen = HashSet::new();
        for queue in [&mut self.top, &mut self.mid, &mut self.low] {
            queue.retain(|pid| seen.insert(*pid));
        }
    }

    fn purge_exited(&mut self, exits: &ExitMap, tick: u64) {
        for (&pid, &at) in exits {
            if at <= tick {
                self.remove_everywhere(pid);
            }
        }
    }
}

/// Replay the event stream into an ordered snapshot sequence.
///
/// A pure left fold over `events`: deterministic for a given event sequence
/// and exit map, materialized eagerly, and bounded by `max_frames`. Idle
/// events produce a snapshot and nothing else.
pub fn replay_queues(events: &[TickEvent], exits: &ExitMap, max_frames: usize) -> Vec<QueueSnapshot> {
    let mut state = ReplayState::seeded(events);
    let mut snapshots = Vec::with_capacity(events.len().min(max_frames));
    let mut tick: u64 = 0;

    for event in events.iter().take(max_frames) {
        snapshots.push(state.snapshot(tick, event));
        tick += 1;
        if event.queue.is_idle() {
            continue;
        }
        state.apply(event, exits, tick);
    }

    snapshots
}
