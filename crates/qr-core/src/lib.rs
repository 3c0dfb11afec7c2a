//! Queue Replay core: trace parsing and queue-state reconstruction.
//!
//! Replays an execution trace emitted by an external CPU scheduler simulator
//! and reconstructs, tick by tick, which process occupies the processor and
//! which processes sit in each of three priority queues. Downstream renderers
//! (timeline charts, animations) consume the outputs; they are not part of
//! this crate.
//!
//! Data flow:
//!
//! ```text
//! raw text -> trace::parse_trace -> events + exit map
//!          -> replay::replay_queues -> snapshot sequence
//!          -> replay::aggregate_intervals -> per-pid timelines
//!          -> export::ReplayExport (JSON for renderers)
//! ```
//!
//! The replay itself is a sequential, deterministic fold: each snapshot
//! depends on all prior snapshots through carried queue order and streak
//! counters, so nothing here is concurrent and nothing blocks.

pub mod config;
pub mod exit_codes;
pub mod export;
pub mod replay;
pub mod trace;

pub use config::{ReplayConfig, SchedulerMode, MAX_FRAMES_DEFAULT, TICK_MS_DEFAULT};
pub use export::{display_names, ReplayExport};
pub use replay::{
    aggregate_intervals, replay_queues, ProcessTimeline, QueueInterval, QueueSnapshot,
    MID_DEMOTION_STREAK,
};
pub use trace::{parse_trace, ExitMap, ParsedTrace, QueueLabel, TickEvent};
