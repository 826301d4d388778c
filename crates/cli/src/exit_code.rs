//! Exit code definitions for the bkt CLI
//!
//! Per-target failures (a missing bucket or key in a batch) are logged and do
//! not change the exit code. Only failures that stop a command before or while
//! doing its work are reported here.

/// Process exit status of a bkt command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed, possibly skipping unresolvable targets
    Success = 0,

    /// Configuration, connection, local I/O or bucket creation failure
    GeneralError = 1,

    /// Invalid arguments, bucket name or path
    UsageError = 2,
}

impl ExitCode {
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&bkt_core::Error> for ExitCode {
    fn from(err: &bkt_core::Error) -> Self {
        match err.exit_code() {
            2 => Self::UsageError,
            _ => Self::GeneralError,
        }
    }
}
