//! Trace parser: heterogeneous log lines to a canonical event stream.
//!
//! Two grammars are tried per line, in order:
//! 1. one JSON object per line (strict field types; any failure falls
//!    through to grammar 2 for the same line);
//! 2. free text, either an exit line or a consumption line.
//!
//! Lines matching neither grammar are dropped without error; the trace is a
//! possibly lossy, human-authored or machine-generated log and the parser
//! never fails on a single bad line. It does fail on a trace that yields no
//! usable events at all.

use crate::config::ReplayConfig;
use crate::trace::event::{ExitMap, QueueLabel, TickEvent};
use qr_common::{Error, Pid, Result};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, trace};

static CONSUMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Process\s+(?P<name>\S+)\s+(?P<pid>\d+)\s+has\s+consumed\s+(?P<ms>\d+)\s+ms\s+in\s+(?P<queue>\S+)",
    )
    .expect("consumption line regex")
});

static EXIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Process\s+(?P<name>\S+)\s+(?P<pid>\d+)\s+EXIT").expect("exit line regex"));

/// Parser output: the canonical event stream plus the exit map.
#[derive(Debug, Clone, Default)]
pub struct ParsedTrace {
    /// Events ordered as observed; per-pid ticks are non-decreasing.
    pub events: Vec<TickEvent>,
    /// Tick at which each exited pid terminated.
    pub exits: ExitMap,
}

/// Structured grammar: one JSON object per line. Unknown keys are ignored;
/// a wrong type on any known key rejects the whole line.
#[derive(Debug, Deserialize)]
struct RawStructuredLine {
    t: Option<u64>,
    pid: u32,
    name: String,
    queue: Option<String>,
    ms: Option<u64>,
    work_left: Option<i64>,
    ticks_left: Option<i64>,
}

/// Parse raw trace text into an ordered event list and an exit map.
///
/// The internal counter numbers events by scheduling decisions observed:
/// every appended event advances it, a JSON line with an explicit `t` syncs
/// it to `t + 1`, and exit lines record the current counter without
/// advancing it.
///
/// Fails only on traces that produce no events, or only IDLE events; both
/// signal a formatting problem on the simulator side.
pub fn parse_trace(input: &str, cfg: &ReplayConfig) -> Result<ParsedTrace> {
    let mut events: Vec<TickEvent> = Vec::new();
    let mut exits = ExitMap::new();
    let mut counter: u64 = 0;

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('{') && line.ends_with('}') {
            if let Some(event) = parse_structured(line, counter, cfg) {
                counter = event.tick + 1;
                events.push(event);
                continue;
            }
            // Malformed JSON falls through to the free-text grammar.
        }

        if let Some(caps) = EXIT_RE.captures(line) {
            if let Ok(pid) = caps["pid"].parse::<u32>() {
                exits.insert(Pid(pid), counter);
            }
            continue;
        }

        if let Some(caps) = CONSUMED_RE.captures(line) {
            let (Ok(pid), Ok(ms)) = (caps["pid"].parse::<u32>(), caps["ms"].parse::<u64>()) else {
                trace!(line = %line, "dropped consumption line with out-of-range number");
                continue;
            };
            events.push(TickEvent {
                tick: counter,
                pid: Pid(pid),
                name: caps["name"].to_owned(),
                queue: QueueLabel::normalize(cfg.mode, &caps["queue"]),
                ms,
                work_left: None,
                ticks_left: None,
            });
            counter += 1;
            continue;
        }

        trace!(line = %line, "dropped unrecognized trace line");
    }

    if events.is_empty() {
        return Err(Error::EmptyTrace);
    }
    if events.iter().all(|e| e.queue.is_idle()) {
        return Err(Error::IdleOnlyTrace);
    }

    debug!(
        events = events.len(),
        exits = exits.len(),
        "parsed trace"
    );
    Ok(ParsedTrace { events, exits })
}

fn parse_structured(line: &str, counter: u64, cfg: &ReplayConfig) -> Option<TickEvent> {
    let raw: RawStructuredLine = serde_json::from_str(line).ok()?;
    Some(TickEvent {
        tick: raw.t.unwrap_or(counter),
        pid: Pid(raw.pid),
        name: raw.name,
        queue: QueueLabel::normalize(cfg.mode, raw.queue.as_deref().unwrap_or("FQ")),
        ms: raw.ms.unwrap_or(cfg.tick_ms),
        work_left: raw.work_left,
        ticks_left: raw.ticks_left,
    })
}
