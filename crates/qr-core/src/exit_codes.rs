//! Exit codes for the qr-core CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing; values at or above 10 indicate errors.

use qr_common::Error;

/// Exit codes for qr-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Replay completed and outputs were written
    Ok = 0,

    /// Configuration error
    ConfigError = 10,

    /// Trace error (empty or idle-only parse)
    TraceError = 11,

    /// Export error (incompatible schema)
    ExportError = 12,

    /// I/O or serialization error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Ok)
    }

    /// Map an error to its exit code by error-code range.
    pub fn from_error(error: &Error) -> Self {
        match error.code() {
            10..=19 => ExitCode::ConfigError,
            20..=29 => ExitCode::TraceError,
            30..=39 => ExitCode::ExportError,
            60..=69 => ExitCode::IoError,
            _ => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            ExitCode::from_error(&Error::Config("x".into())),
            ExitCode::ConfigError
        );
        assert_eq!(ExitCode::from_error(&Error::EmptyTrace), ExitCode::TraceError);
        assert_eq!(
            ExitCode::from_error(&Error::IdleOnlyTrace),
            ExitCode::TraceError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Io(std::io::Error::other("x"))),
            ExitCode::IoError
        );
    }

    #[test]
    fn test_only_zero_is_success() {
        assert!(ExitCode::Ok.is_success());
        assert!(!ExitCode::TraceError.is_success());
        assert_eq!(i32::from(ExitCode::TraceError), 11);
    }
}
