//! JSON export of replay results for downstream renderers.
//!
//! Bundles the core output contract (event list, exit map, snapshot
//! sequence, per-pid timelines) with enough metadata that a renderer can
//! label its output and a later load can check compatibility.

use crate::config::{ReplayConfig, SchedulerMode};
use crate::replay::{ProcessTimeline, QueueSnapshot};
use crate::trace::{ExitMap, ParsedTrace, TickEvent};
use qr_common::{schema, Error, Pid, Result, RunId, SCHEMA_VERSION};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Complete replay export: everything a renderer needs for one trace.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReplayExport {
    /// Schema version for compatibility checking.
    pub schema_version: String,

    /// Identifier of the replay invocation that produced this file.
    pub run_id: RunId,

    /// ISO-8601 timestamp of export creation.
    pub generated_at: String,

    /// Scheduler-variant mode the trace was parsed under.
    pub mode: SchedulerMode,

    /// Milliseconds assumed per tick for events without `ms`.
    pub tick_ms: u64,

    /// Snapshot cap the replay ran with.
    pub max_frames: usize,

    /// Display name per pid (last non-idle occurrence wins).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<Pid, String>,

    /// Canonical event stream, in observed order.
    pub events: Vec<TickEvent>,

    /// Exit tick per terminated pid.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exits: ExitMap,

    /// Queue/running state per processed event.
    pub snapshots: Vec<QueueSnapshot>,

    /// Run-length-encoded per-pid queue occupancy.
    pub timelines: Vec<ProcessTimeline>,
}

impl ReplayExport {
    /// Assemble an export from the core's outputs.
    pub fn build(
        cfg: &ReplayConfig,
        trace: ParsedTrace,
        snapshots: Vec<QueueSnapshot>,
        timelines: Vec<ProcessTimeline>,
    ) -> Self {
        let names = display_names(&trace.events);
        ReplayExport {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: RunId::new(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            mode: cfg.mode,
            tick_ms: cfg.tick_ms,
            max_frames: cfg.max_frames,
            names,
            events: trace.events,
            exits: trace.exits,
            snapshots,
            timelines,
        }
    }

    /// Save the export to a pretty-printed JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load an export from a JSON file, rejecting incompatible schema
    /// major versions.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let export: ReplayExport = serde_json::from_str(&content)?;
        if !schema::is_compatible(&export.schema_version) {
            return Err(Error::IncompatibleSchema {
                found: export.schema_version,
                expected: SCHEMA_VERSION.to_string(),
            });
        }
        Ok(export)
    }
}

/// Display name per pid, from the non-idle events. Later events overwrite
/// earlier names, matching how the animation renderer labels boxes.
pub fn display_names(events: &[TickEvent]) -> BTreeMap<Pid, String> {
    let mut names = BTreeMap::new();
    for event in events {
        if !event.queue.is_idle() {
            names.insert(event.pid, event.name.clone());
        }
    }
    names
}
