//! Error types for Queue Replay.

use thiserror::Error;

/// Result type alias for Queue Replay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Queue Replay.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Trace errors (20-29)
    #[error(
        "no tick events parsed from trace; emit one JSON object per line like \
         {{\"t\":0,\"pid\":1,\"name\":\"spin\",\"queue\":\"FQ\",\"ms\":10}} or text lines like \
         `Process spin 1 has consumed 10 ms in FQ`"
    )]
    EmptyTrace,

    #[error(
        "trace parsed to IDLE events only; no scheduling decisions to replay \
         (check the queue labels the simulator emits, or the --mode mapping)"
    )]
    IdleOnlyTrace,

    // Export errors (30-39)
    #[error("export schema version {found} is not compatible (expected {expected})")]
    IncompatibleSchema { found: String, expected: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting and exit-code mapping.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::EmptyTrace => 20,
            Error::IdleOnlyTrace => 21,
            Error::IncompatibleSchema { .. } => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_grouped_by_domain() {
        assert_eq!(Error::Config("bad".into()).code(), 10);
        assert_eq!(Error::EmptyTrace.code(), 20);
        assert_eq!(Error::IdleOnlyTrace.code(), 21);
        assert_eq!(
            Error::IncompatibleSchema {
                found: "2.0.0".into(),
                expected: "1.0.0".into()
            }
            .code(),
            30
        );
    }

    #[test]
    fn test_empty_trace_message_carries_format_guidance() {
        let message = Error::EmptyTrace.to_string();
        assert!(message.contains("\"pid\""));
        assert!(message.contains("has consumed"));
    }
}
