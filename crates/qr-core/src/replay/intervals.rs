//! Run-length interval aggregation for timeline rendering.
//!
//! Collapses each pid's per-tick queue labels into contiguous intervals so a
//! renderer can draw one bar per stretch instead of one per tick.

use crate::trace::{QueueLabel, TickEvent};
use qr_common::Pid;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One contiguous stretch of ticks a pid spent under the same queue label.
///
/// Tick bounds are half-open; millisecond bounds are the tick bounds scaled
/// by the ms-per-tick value the aggregation ran with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QueueInterval {
    pub queue: QueueLabel,
    pub start_tick: u64,
    pub end_tick: u64,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// A pid's full timeline, intervals in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessTimeline {
    pub pid: Pid,
    /// Display name, taken from the pid's first non-idle event.
    pub name: String,
    pub intervals: Vec<QueueInterval>,
}

/// Group each pid's chronologically contiguous runs of identical queue
/// labels into intervals, in ascending pid order.
///
/// Two consecutive events merge only when their labels match and their ticks
/// are consecutive; any gap or label change starts a new interval. Idle
/// events are excluded entirely.
pub fn aggregate_intervals(events: &[TickEvent], ms_per_tick: u64) -> Vec<ProcessTimeline> {
    let mut by_pid: BTreeMap<Pid, Vec<&TickEvent>> = BTreeMap::new();
    for event in events.iter().filter(|e| !e.queue.is_idle()) {
        by_pid.entry(event.pid).or_default().push(event);
    }

    by_pid
        .into_iter()
        .map(|(pid, sequence)| {
            let name = sequence[0].name.clone();
            let mut intervals: Vec<QueueInterval> = Vec::new();
            for event in sequence {
                match intervals.last_mut() {
                    Some(last) if last.queue == event.queue && last.end_tick == event.tick => {
                        last.end_tick = event.tick + 1;
                        last.end_ms = last.end_tick * ms_per_tick;
                    }
                    _ => intervals.push(QueueInterval {
                        queue: event.queue.clone(),
                        start_tick: event.tick,
                        end_tick: event.tick + 1,
                        start_ms: event.tick * ms_per_tick,
                        end_ms: (event.tick + 1) * ms_per_tick,
                    }),
                }
            }
            ProcessTimeline {
                pid,
                name,
                intervals,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(pid: u32, tick: u64, queue: QueueLabel) -> TickEvent {
        TickEvent {
            tick,
            pid: Pid(pid),
            name: format!("p{pid}"),
            queue,
            ms: 10,
            work_left: None,
            ticks_left: None,
        }
    }

    #[test]
    fn test_contiguous_same_label_events_merge() {
        let events = [
            event(1, 0, QueueLabel::Mid),
            event(1, 1, QueueLabel::Mid),
            event(1, 2, QueueLabel::Mid),
        ];
        let timelines = aggregate_intervals(&events, 10);

        assert_eq!(timelines.len(), 1);
        assert_eq!(
            timelines[0].intervals,
            vec![QueueInterval {
                queue: QueueLabel::Mid,
                start_tick: 0,
                end_tick: 3,
                start_ms: 0,
                end_ms: 30,
            }]
        );
    }

    #[test]
    fn test_label_change_starts_new_interval() {
        let events = [
            event(1, 0, QueueLabel::Top),
            event(1, 1, QueueLabel::Mid),
            event(1, 2, QueueLabel::Mid),
        ];
        let intervals = &aggregate_intervals(&events, 10)[0].intervals;

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].queue, QueueLabel::Top);
        assert_eq!(intervals[0].end_tick, 1);
        assert_eq!(intervals[1].start_tick, 1);
        assert_eq!(intervals[1].end_tick, 3);
    }

    #[test]
    fn test_tick_gap_starts_new_interval() {
        // Same label, but another pid ran at tick 1.
        let events = [
            event(1, 0, QueueLabel::Mid),
            event(2, 1, QueueLabel::Mid),
            event(1, 2, QueueLabel::Mid),
        ];
        let timelines = aggregate_intervals(&events, 10);

        assert_eq!(timelines[0].pid, Pid(1));
        assert_eq!(timelines[0].intervals.len(), 2);
        assert_eq!(timelines[1].pid, Pid(2));
        assert_eq!(timelines[1].intervals.len(), 1);
    }

    #[test]
    fn test_idle_events_are_excluded() {
        let events = [
            event(1, 0, QueueLabel::Top),
            event(0, 1, QueueLabel::Idle),
            event(1, 2, QueueLabel::Mid),
        ];
        let timelines = aggregate_intervals(&events, 10);

        assert_eq!(timelines.len(), 1);
        assert_eq!(timelines[0].intervals.len(), 2);
    }

    #[test]
    fn test_name_comes_from_first_event() {
        let mut renamed = event(1, 1, QueueLabel::Mid);
        renamed.name = "late-name".to_owned();
        let events = [event(1, 0, QueueLabel::Top), renamed];

        assert_eq!(aggregate_intervals(&events, 10)[0].name, "p1");
    }

    #[test]
    fn test_ms_bounds_scale_with_tick_duration() {
        let events = [event(1, 4, QueueLabel::Low)];
        let interval = &aggregate_intervals(&events, 25)[0].intervals[0];
        assert_eq!(interval.start_ms, 100);
        assert_eq!(interval.end_ms, 125);
    }

    #[test]
    fn test_empty_input_yields_no_timelines() {
        assert!(aggregate_intervals(&[], 10).is_empty());
    }
}
