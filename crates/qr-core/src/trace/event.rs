//! Canonical tick events and queue labels.

use crate::config::SchedulerMode;
use qr_common::Pid;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Mapping from pid to the tick at which that process terminated.
/// A pid with no entry is still running at trace end.
pub type ExitMap = BTreeMap<Pid, u64>;

/// Canonical queue label.
///
/// The three priority levels are written `FQ`/`AQ`/`EQ` on the wire (the
/// labels the source simulators emit), plus `IDLE` for ticks with no process
/// on the CPU. Labels that match no canonical form under the active mode are
/// carried verbatim (upper-cased) as [`QueueLabel::Custom`]; they never seed
/// a queue and take the lowest-level reinsertion path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QueueLabel {
    /// Highest priority level (wire form `FQ`).
    Top,
    /// Middle priority level (wire form `AQ`).
    Mid,
    /// Lowest priority level (wire form `EQ`).
    Low,
    /// No scheduling decision this tick (wire form `IDLE`).
    Idle,
    /// Unrecognized scheduler-specific label, upper-cased.
    Custom(String),
}

impl QueueLabel {
    /// Map a raw scheduler-variant label onto its canonical form.
    ///
    /// Pure function of `(mode, raw)`: upper-cases the label, applies the
    /// mlfq remapping table when that mode is selected, then matches the
    /// canonical wire forms. Anything left over becomes `Custom`.
    pub fn normalize(mode: SchedulerMode, raw: &str) -> Self {
        let upper = raw.to_ascii_uppercase();
        let canonical = match mode {
            SchedulerMode::Mlfq => match upper.as_str() {
                "L0" | "HIGH" | "Q0" => "FQ",
                "L1" | "MID" | "Q1" => "AQ",
                "L2" | "LOW" | "Q2" => "EQ",
                other => other,
            },
            SchedulerMode::Default => upper.as_str(),
        };
        match canonical {
            "FQ" => QueueLabel::Top,
            "AQ" => QueueLabel::Mid,
            "EQ" => QueueLabel::Low,
            "IDLE" => QueueLabel::Idle,
            other => QueueLabel::Custom(other.to_owned()),
        }
    }

    /// Parse an already-canonical wire label (no mode remapping).
    pub fn from_wire(raw: &str) -> Self {
        Self::normalize(SchedulerMode::Default, raw)
    }

    /// The wire form of this label.
    pub fn as_str(&self) -> &str {
        match self {
            QueueLabel::Top => "FQ",
            QueueLabel::Mid => "AQ",
            QueueLabel::Low => "EQ",
            QueueLabel::Idle => "IDLE",
            QueueLabel::Custom(s) => s,
        }
    }

    /// True for ticks that carry no scheduling decision.
    pub fn is_idle(&self) -> bool {
        matches!(self, QueueLabel::Idle)
    }
}

impl fmt::Display for QueueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for QueueLabel {
    fn from(s: String) -> Self {
        QueueLabel::from_wire(&s)
    }
}

impl From<QueueLabel> for String {
    fn from(label: QueueLabel) -> Self {
        label.as_str().to_owned()
    }
}

impl JsonSchema for QueueLabel {
    fn schema_name() -> String {
        "QueueLabel".to_owned()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        gen.subschema_for::<String>()
    }
}

/// One observed scheduling decision.
///
/// `tick` is a logical time step, not wall-clock time; `ms` is only used for
/// time-axis scaling downstream. The remaining-work hints are carried through
/// for renderers and ignored by the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TickEvent {
    /// Logical time step of the decision.
    #[serde(rename = "t")]
    pub tick: u64,
    /// Process dispatched this tick.
    pub pid: Pid,
    /// Process display name (not unique).
    pub name: String,
    /// Queue the process ran from.
    pub queue: QueueLabel,
    /// Milliseconds consumed during this tick.
    pub ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_left: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticks_left: Option<i64>,
}
