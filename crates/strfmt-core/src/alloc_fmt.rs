//! Allocating formatter: measure, allocate exactly, render.
//!
//! [`format_string`] runs the template twice over the same argument slice.
//! The first pass counts bytes, the buffer is allocated once at
//! `len + 1`, and the second pass renders into it before the NUL terminator
//! is appended. If the allocation fails nothing is rendered.

use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;
use std::str::Utf8Error;
use std::string::FromUtf8Error;

use crate::args::FormatArg;
use crate::error::FormatError;
use crate::printf::parse_format_string;
use crate::render::{measure_segments, render_segments};

// ---------------------------------------------------------------------------
// Allocators
// ---------------------------------------------------------------------------

/// Source of output buffers.
///
/// Implementations return an empty `Vec` that can hold `capacity` bytes
/// without reallocating, or an error. They must not abort on exhaustion.
pub trait BufferAllocator {
    fn allocate(&self, capacity: usize) -> Result<Vec<u8>, FormatError>;
}

impl<A: BufferAllocator + ?Sized> BufferAllocator for &A {
    fn allocate(&self, capacity: usize) -> Result<Vec<u8>, FormatError> {
        (**self).allocate(capacity)
    }
}

/// The global allocator, reached through `Vec::try_reserve_exact`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn allocate(&self, capacity: usize) -> Result<Vec<u8>, FormatError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)
            .map_err(|_| FormatError::AllocationFailure {
                requested: capacity,
            })?;
        Ok(buf)
    }
}

/// Refuses any request larger than `max_bytes`; otherwise behaves like
/// [`SystemAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CappedAllocator {
    pub max_bytes: usize,
}

impl CappedAllocator {
    #[must_use]
    pub const fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl BufferAllocator for CappedAllocator {
    fn allocate(&self, capacity: usize) -> Result<Vec<u8>, FormatError> {
        if capacity > self.max_bytes {
            return Err(FormatError::AllocationFailure {
                requested: capacity,
            });
        }
        SystemAllocator.allocate(capacity)
    }
}

// ---------------------------------------------------------------------------
// Owned result
// ---------------------------------------------------------------------------

/// Owned formatted text followed by exactly one trailing NUL byte.
///
/// The content itself may contain NUL bytes (e.g. from `%c` with 0); the
/// [`as_c_str`](Self::as_c_str) view stops at the first one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FormattedString {
    bytes: Vec<u8>,
}

impl FormattedString {
    /// Wrap a buffer whose last byte is the terminator.
    fn from_vec_with_nul(bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.last(), Some(&0));
        Self { bytes }
    }

    /// Content length, excluding the terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Content bytes without the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// Content bytes including the terminator.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// C string view, up to the first NUL.
    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(&self.bytes).unwrap_or_default()
    }

    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Content bytes, terminator dropped.
    #[must_use]
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.bytes.pop();
        self.bytes
    }

    #[must_use]
    pub fn into_bytes_with_nul(self) -> Vec<u8> {
        self.bytes
    }

    pub fn into_string(self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.into_bytes())
    }
}

impl AsRef<[u8]> for FormattedString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for FormattedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string_lossy(), f)
    }
}

impl fmt::Display for FormattedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl PartialEq<str> for FormattedString {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for FormattedString {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<[u8]> for FormattedString {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Format `template` with `args` into a newly allocated, exact-fit buffer.
///
/// Returns [`FormatError::AllocationFailure`] if the buffer cannot be
/// allocated.
pub fn format_string(
    template: impl AsRef<[u8]>,
    args: &[FormatArg<'_>],
) -> Result<FormattedString, FormatError> {
    format_string_in(&SystemAllocator, template, args)
}

/// [`format_string`] with a caller-supplied allocator.
pub fn format_string_in<A: BufferAllocator + ?Sized>(
    allocator: &A,
    template: impl AsRef<[u8]>,
    args: &[FormatArg<'_>],
) -> Result<FormattedString, FormatError> {
    let segments = parse_format_string(template.as_ref());
    let len = measure_segments(&segments, args);
    // A saturated measurement has no room for the terminator either.
    let requested = len.checked_add(1).ok_or(FormatError::AllocationFailure {
        requested: usize::MAX,
    })?;

    let mut buf = allocator.allocate(requested)?;
    render_segments(&segments, args, &mut buf);
    debug_assert_eq!(buf.len(), len);
    buf.push(0);
    Ok(FormattedString::from_vec_with_nul(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Records every request and fails all of them.
    struct RefusingAllocator {
        requests: Cell<usize>,
        last_request: Cell<usize>,
    }

    impl RefusingAllocator {
        fn new() -> Self {
            Self {
                requests: Cell::new(0),
                last_request: Cell::new(0),
            }
        }
    }

    impl BufferAllocator for RefusingAllocator {
        fn allocate(&self, capacity: usize) -> Result<Vec<u8>, FormatError> {
            self.requests.set(self.requests.get() + 1);
            self.last_request.set(capacity);
            Err(FormatError::AllocationFailure {
                requested: capacity,
            })
        }
    }

    #[test]
    fn allocation_request_is_length_plus_terminator() {
        let alloc = RefusingAllocator::new();
        let err = format_string_in(&alloc, "%s", &[FormatArg::from("hello")]).unwrap_err();
        assert_eq!(err, FormatError::AllocationFailure { requested: 6 });
        assert_eq!(alloc.requests.get(), 1);
        assert_eq!(alloc.last_request.get(), 6);
    }

    #[test]
    fn capped_allocator_rejects_oversized_requests() {
        let capped = CappedAllocator::new(4);
        assert!(format_string_in(&capped, "abc", &[]).is_ok());
        let err = format_string_in(&capped, "abcd", &[]).unwrap_err();
        assert_eq!(err.requested(), 5);
    }

    #[test]
    fn system_allocator_reports_impossible_sizes() {
        let err = SystemAllocator.allocate(usize::MAX).unwrap_err();
        assert_eq!(err.requested(), usize::MAX);
    }

    #[test]
    fn saturated_width_fails_before_allocating() {
        let alloc = RefusingAllocator::new();
        let err = format_string_in(&alloc, "a%99999999999999999999d", &[FormatArg::SignedInt(1)])
            .unwrap_err();
        assert_eq!(err.requested(), usize::MAX);
        assert_eq!(alloc.requests.get(), 0);

        let err = format_string("%.99999999999999999999f", &[FormatArg::Float(1.0)]).unwrap_err();
        assert_eq!(err, FormatError::AllocationFailure { requested: usize::MAX });
    }

    #[test]
    fn result_has_single_trailing_nul() {
        let out = format_string("%d-%d", &[FormatArg::from(3), FormatArg::from(7)]).unwrap();
        assert_eq!(out.as_bytes(), b"3-7");
        assert_eq!(out.as_bytes_with_nul(), b"3-7\0");
        assert_eq!(out.len(), 3);
        assert_eq!(out.as_c_str(), c"3-7");
    }

    #[test]
    fn interior_nul_is_kept_in_bytes() {
        let out = format_string("a%cb", &[FormatArg::Char(0)]).unwrap();
        assert_eq!(out.as_bytes(), b"a\0b");
        assert_eq!(out.as_c_str(), c"a");
    }

    #[test]
    fn conversions_and_comparisons() {
        let out = format_string("%s!", &[FormatArg::from("hi")]).unwrap();
        assert_eq!(out, "hi!");
        assert_eq!(out.to_str(), Ok("hi!"));
        assert_eq!(out.to_string(), "hi!");
        assert_eq!(format!("{out:?}"), "\"hi!\"");
        assert_eq!(out.clone().into_bytes_with_nul(), b"hi!\0");
        assert_eq!(out.into_string().unwrap(), "hi!");
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let out = format_string(b"\xff", &[]).unwrap();
        assert!(out.to_str().is_err());
        assert_eq!(out.to_string_lossy(), "\u{fffd}");
    }
}
