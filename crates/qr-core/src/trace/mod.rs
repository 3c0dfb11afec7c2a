//! Trace parsing: raw simulator log text to a canonical event stream.
//!
//! The external simulator writes one of two line formats (or a mix):
//!
//! ```text
//! {"t":0,"pid":1,"name":"spin","queue":"FQ","ms":10,"work_left":90}
//! Process spin 1 has consumed 10 ms in FQ
//! Process spin 1 EXIT
//! ```
//!
//! [`parse_trace`] turns that text into ordered [`TickEvent`]s plus an
//! [`ExitMap`], applying the mode-specific queue-name normalization of
//! [`QueueLabel::normalize`] to every label on the way in.

pub mod event;
pub mod parse;

pub use event::{ExitMap, QueueLabel, TickEvent};
pub use parse::{parse_trace, ParsedTrace};
