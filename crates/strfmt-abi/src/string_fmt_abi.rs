//! ABI layer for the allocating formatter.
//!
//! `string_fmt` measures the output, `malloc`s `len + 1` bytes, and renders
//! into the new block. A failed `malloc` returns null before anything is
//! written.

use std::ffi::{CStr, c_char, c_int};
use std::ptr;

use strfmt_core::printf::{FormatSegment, Precision, Width, parse_format_string};
use strfmt_core::{FormatArg, SliceSink, measure_segments, render_segments};

// ---------------------------------------------------------------------------
// Argument decoding
// ---------------------------------------------------------------------------

/// Rebuild typed arguments from raw registers, guided by the parsed template.
///
/// Integers keep their full register and are narrowed later by the length
/// modifier; doubles arrive as bit patterns; `%s` registers are C string
/// addresses, read no further than the directive's precision. Decoding stops
/// when the registers run out.
unsafe fn decode_args<'a>(segments: &[FormatSegment<'_>], regs: &[u64]) -> Vec<FormatArg<'a>> {
    let mut out = Vec::with_capacity(regs.len());
    let mut next = regs.iter().copied();

    for seg in segments {
        let FormatSegment::Spec(spec) = seg else {
            continue;
        };
        if spec.width == Width::FromArg {
            let Some(raw) = next.next() else { break };
            out.push(FormatArg::SignedInt(raw as i64));
        }
        let mut max_len = match spec.precision {
            Precision::Fixed(p) => Some(p),
            _ => None,
        };
        if spec.precision == Precision::FromArg {
            let Some(raw) = next.next() else { break };
            out.push(FormatArg::SignedInt(raw as i64));
            // Same reading as the renderer: an `int`, negative means none.
            max_len = usize::try_from(raw as u32 as i32).ok();
        }
        if spec.conversion == b'%' {
            continue;
        }
        let Some(raw) = next.next() else { break };
        let arg = match spec.conversion {
            b'd' | b'i' => FormatArg::SignedInt(raw as i64),
            b'u' | b'o' | b'x' | b'X' => FormatArg::UnsignedInt(raw),
            b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {
                FormatArg::Float(f64::from_bits(raw))
            }
            b'c' => FormatArg::Char(raw as u8),
            b's' if raw != 0 => {
                // SAFETY: the caller passed a string for `%s` that is readable
                // up to its NUL or the precision, whichever comes first.
                let s = unsafe { c_str_bytes(raw as usize as *const c_char, max_len) };
                FormatArg::Str(s)
            }
            _ => FormatArg::Pointer(raw as usize),
        };
        out.push(arg);
    }
    out
}

/// Bytes of the C string at `s`, scanning at most `max_len` bytes.
unsafe fn c_str_bytes<'a>(s: *const c_char, max_len: Option<usize>) -> &'a [u8] {
    match max_len {
        Some(limit) => {
            let len = unsafe { libc::strnlen(s, limit) };
            unsafe { std::slice::from_raw_parts(s.cast::<u8>(), len) }
        }
        None => unsafe { CStr::from_ptr(s) }.to_bytes(),
    }
}

/// Measure, `malloc`, render. Returns null if `malloc` fails.
unsafe fn format_malloc(segments: &[FormatSegment<'_>], regs: &[u64]) -> *mut c_char {
    let args = unsafe { decode_args(segments, regs) };
    let len = measure_segments(segments, &args);
    let Some(size) = len.checked_add(1) else {
        return ptr::null_mut();
    };

    let block = unsafe { libc::malloc(size) }.cast::<u8>();
    if block.is_null() {
        return ptr::null_mut();
    }
    // SAFETY: `block` is a fresh allocation of `size` bytes; zeroing it first
    // makes the slice below fully initialized.
    let out = unsafe {
        ptr::write_bytes(block, 0, size);
        std::slice::from_raw_parts_mut(block, size)
    };
    let mut sink = SliceSink::new(&mut out[..len]);
    render_segments(segments, &args, &mut sink);
    debug_assert_eq!(sink.total(), len);
    out[len] = 0;
    block.cast()
}

unsafe fn regs_from_raw<'a>(args: *const u64, nargs: usize) -> &'a [u64] {
    if args.is_null() || nargs == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(args, nargs) }
    }
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// Format `fmt` with `nargs` raw argument registers into a `malloc`'d string.
///
/// Each register holds one argument as a variadic call would pass it:
/// integers sign/zero-extended, doubles as their bit pattern, strings and
/// pointers as addresses. A `%s` string is read up to its NUL or, when the
/// directive has a precision, at most that many bytes. There is no limit on
/// `nargs`. Returns null for a null `fmt` or when `malloc` fails. The caller
/// frees the result with `free`.
///
/// `%n` consumes its register but never writes through it, unlike
/// `vsnprintf`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strfmt_format_raw(
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
) -> *mut c_char {
    if fmt.is_null() {
        return ptr::null_mut();
    }
    let fmt_bytes = unsafe { CStr::from_ptr(fmt) }.to_bytes();
    let segments = parse_format_string(fmt_bytes);
    unsafe { format_malloc(&segments, regs_from_raw(args, nargs)) }
}

/// Bounded variant: writes at most `size - 1` bytes plus NUL into `buf`.
///
/// Returns the untruncated length, or -1 for a null `fmt` or a length that
/// does not fit in `int`. A null `buf` or zero `size` only measures.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn strfmt_snprintf(
    buf: *mut c_char,
    size: usize,
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    if fmt.is_null() {
        return -1;
    }
    let fmt_bytes = unsafe { CStr::from_ptr(fmt) }.to_bytes();
    let segments = parse_format_string(fmt_bytes);
    let decoded = unsafe { decode_args(&segments, regs_from_raw(args, nargs)) };

    let total = if buf.is_null() || size == 0 {
        measure_segments(&segments, &decoded)
    } else {
        let out = unsafe { std::slice::from_raw_parts_mut(buf.cast::<u8>(), size) };
        let mut sink = SliceSink::new(&mut out[..size - 1]);
        render_segments(&segments, &decoded, &mut sink);
        let (stored, total) = (sink.stored(), sink.total());
        out[stored] = 0;
        total
    };
    c_int::try_from(total).unwrap_or(-1)
}

/// Read one register per consumed argument from `$args` into the `Vec`
/// `$buf`, guided by `$segments`.
/// Uses a macro to avoid naming the unstable `VaListImpl` type directly.
#[cfg(feature = "c-variadic")]
macro_rules! extract_va_args {
    ($segments:expr, $args:expr, $buf:expr) => {{
        for seg in $segments {
            if let FormatSegment::Spec(spec) = seg {
                if spec.width == Width::FromArg {
                    $buf.push(unsafe { $args.arg::<u64>() });
                }
                if spec.precision == Precision::FromArg {
                    $buf.push(unsafe { $args.arg::<u64>() });
                }
                match spec.conversion {
                    b'%' => {}
                    b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {
                        $buf.push(unsafe { $args.arg::<f64>() }.to_bits());
                    }
                    _ => $buf.push(unsafe { $args.arg::<u64>() }),
                }
            }
        }
    }};
}

/// `string_fmt(fmt, ...)`: format into a `malloc`'d string.
///
/// The `va_list` is read exactly once, one register per argument the
/// template consumes, with no upper bound; both passes then work from that
/// copy. Otherwise behaves like [`strfmt_format_raw`], including `%n`.
/// Returns null for a null `fmt` or when `malloc` fails.
#[cfg(feature = "c-variadic")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn string_fmt(fmt: *const c_char, mut args: ...) -> *mut c_char {
    if fmt.is_null() {
        return ptr::null_mut();
    }
    let fmt_bytes = unsafe { CStr::from_ptr(fmt) }.to_bytes();
    let segments = parse_format_string(fmt_bytes);
    let mut regs = Vec::with_capacity(strfmt_core::printf::count_args(&segments));
    extract_va_args!(&segments, &mut args, regs);
    unsafe { format_malloc(&segments, &regs) }
}
