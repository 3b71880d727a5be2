//! Exit codes and error classification.

use crate::duplicates::FinderError;

/// Exit codes for the dupepurge binary.
///
/// - 0: Success (completed normally, or usage was printed)
/// - 1: General error (including a failed removal in strict mode)
/// - 2: Invalid root (a root does not exist or is not a directory)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the run completed.
    Success = 0,
    /// General error: an unexpected failure.
    GeneralError = 1,
    /// Invalid root: a supplied root is missing or not a directory.
    InvalidRoot = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DP000",
            Self::GeneralError => "DP001",
            Self::InvalidRoot => "DP002",
        }
    }

    /// Pick the exit code for an error returned by the application.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<FinderError>() {
            Some(e) if e.is_invalid_root() => Self::InvalidRoot,
            _ => Self::GeneralError,
        }
    }
}
