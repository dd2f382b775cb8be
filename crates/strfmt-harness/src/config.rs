//! Harness configuration resolved from CLI flags and the environment.

use std::path::PathBuf;

use strfmt_core::{BufferAllocator, CappedAllocator, FormatError, SystemAllocator};

use crate::HarnessError;

/// Environment variable naming the JSONL log path.
pub const LOG_ENV: &str = "STRFMT_HARNESS_LOG";
/// Environment variable capping the bytes a single `render` may allocate.
pub const MAX_ALLOC_ENV: &str = "STRFMT_MAX_ALLOC";

/// Resolved settings shared by the harness subcommands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Where structured log lines go, if anywhere.
    pub log_path: Option<PathBuf>,
    /// Allocation cap in bytes, including the terminator.
    pub max_alloc: Option<usize>,
}

impl HarnessConfig {
    /// Build from the raw flag values (clap already applied env fallbacks).
    pub fn new(log_path: Option<PathBuf>, max_alloc: Option<&str>) -> Result<Self, HarnessError> {
        let max_alloc = max_alloc.map(parse_byte_count).transpose()?;
        Ok(Self {
            log_path,
            max_alloc,
        })
    }

    /// Allocator honouring `max_alloc`.
    #[must_use]
    pub fn allocator(&self) -> HarnessAllocator {
        match self.max_alloc {
            Some(max) => HarnessAllocator::Capped(CappedAllocator::new(max)),
            None => HarnessAllocator::System(SystemAllocator),
        }
    }
}

/// Accepts plain byte counts and `k`/`m` suffixes (`64k`, `1m`).
fn parse_byte_count(raw: &str) -> Result<usize, HarnessError> {
    let trimmed = raw.trim();
    let (digits, scale) = match trimmed.as_bytes().last() {
        Some(b'k' | b'K') => (&trimmed[..trimmed.len() - 1], 1024),
        Some(b'm' | b'M') => (&trimmed[..trimmed.len() - 1], 1024 * 1024),
        _ => (trimmed, 1),
    };
    digits
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_mul(scale))
        .ok_or_else(|| HarnessError::InvalidCap(raw.to_string()))
}

/// Allocator chosen by [`HarnessConfig::allocator`].
#[derive(Debug, Clone, Copy)]
pub enum HarnessAllocator {
    System(SystemAllocator),
    Capped(CappedAllocator),
}

impl BufferAllocator for HarnessAllocator {
    fn allocate(&self, capacity: usize) -> Result<Vec<u8>, FormatError> {
        match self {
            Self::System(a) => a.allocate(capacity),
            Self::Capped(a) => a.allocate(capacity),
        }
    }
}
