//! Error type for allocating formatters.

use thiserror::Error;

/// Failure modes of [`format_string`](crate::format_string).
///
/// Allocation is the only way formatting can fail. Malformed templates and
/// mismatched arguments still produce output (see the crate docs for the
/// exact rules).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The allocator could not provide the output buffer.
    #[error("failed to allocate {requested} bytes for formatted output")]
    AllocationFailure {
        /// Bytes requested, including the NUL terminator.
        requested: usize,
    },
}

impl FormatError {
    /// Bytes the failed allocation asked for.
    #[must_use]
    pub const fn requested(&self) -> usize {
        match self {
            Self::AllocationFailure { requested } => *requested,
        }
    }
}
