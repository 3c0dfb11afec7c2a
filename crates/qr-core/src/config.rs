//! Replay configuration: scheduler-variant mode and replay limits.
//!
//! Resolution order is CLI flag, then config file, then built-in default;
//! the file is plain JSON and may be partial.

use qr_common::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Milliseconds assumed per tick when an event does not carry `ms`.
pub const TICK_MS_DEFAULT: u64 = 10;

/// Default cap on the snapshot sequence length.
pub const MAX_FRAMES_DEFAULT: usize = 600;

/// Scheduler variant the trace was produced by.
///
/// Selects the queue-name remapping table applied to every parsed queue
/// label; see [`crate::trace::QueueLabel::normalize`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerMode {
    /// Queue labels pass through unchanged (case-normalized to upper form).
    #[default]
    Default,
    /// Multi-level feedback queue labels (L0/L1/L2, HIGH/MID/LOW, Q0/Q1/Q2)
    /// are remapped onto the three canonical levels.
    Mlfq,
}

/// Knobs recognized by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReplayConfig {
    /// Queue-name remapping table selector.
    pub mode: SchedulerMode,
    /// Default value used when an event omits `ms`.
    pub tick_ms: u64,
    /// Caps the snapshot sequence length.
    pub max_frames: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            mode: SchedulerMode::Default,
            tick_ms: TICK_MS_DEFAULT,
            max_frames: MAX_FRAMES_DEFAULT,
        }
    }
}

impl ReplayConfig {
    /// Load a (possibly partial) JSON config file; missing fields take the
    /// built-in defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))
    }
}
