//! # strfmt-core
//!
//! printf-style formatting into exact-fit owned buffers.
//!
//! The crate pairs a POSIX printf engine with an allocating front end:
//! [`format_string`] measures the output in a dry-run pass, allocates
//! `len + 1` bytes once, renders, and appends a NUL terminator. Allocation
//! failure is reported as [`FormatError::AllocationFailure`] and nothing is
//! rendered.
//!
//! Arguments are a materialized slice of [`FormatArg`] rather than a
//! single-pass cursor, so the measuring and rendering passes read the same
//! values independently.
//!
//! ```
//! use strfmt_core::string_fmt;
//!
//! let out = string_fmt!("%d-%d", 3, 7).unwrap();
//! assert_eq!(out.as_bytes_with_nul(), b"3-7\0");
//! ```
//!
//! Argument handling follows the C calling convention where C leaves it
//! undefined: numeric conversions read a 64-bit register image narrowed by
//! the length modifier, `%s` with a non-string argument prints `(null)`,
//! missing arguments print nothing, and `%n` prints nothing.
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod alloc_fmt;
pub mod args;
pub mod error;
pub mod printf;
pub mod render;
pub mod sink;

pub use alloc_fmt::{
    BufferAllocator, CappedAllocator, FormattedString, SystemAllocator, format_string,
    format_string_in,
};
pub use args::FormatArg;
pub use error::FormatError;
pub use printf::{FormatSegment, FormatSpec, parse_format_string};
pub use render::{format_into, measure, measure_segments, render_segments};
pub use sink::{CountingSink, FormatSink, SliceSink};

/// Format into a [`FormattedString`], converting each argument with
/// [`FormatArg::from`].
///
/// Expands to a call to [`format_string`] and yields its `Result`.
#[macro_export]
macro_rules! string_fmt {
    ($template:expr $(,)?) => {
        $crate::format_string($template, &[])
    };
    ($template:expr, $($arg:expr),+ $(,)?) => {
        $crate::format_string($template, &[$($crate::FormatArg::from($arg)),+])
    };
}
