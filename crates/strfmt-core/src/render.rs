//! Drive parsed segments against a materialized argument list.
//!
//! Arguments are consumed left to right: `*` width, then `.*` precision,
//! then the conversion value. Missing arguments render the directive as
//! nothing; surplus arguments are ignored.

use crate::args::FormatArg;
use crate::printf::{
    FormatSegment, FormatSpec, LengthMod, Precision, Width, format_char, format_float,
    format_null_str, format_pointer, format_signed, format_str, format_unsigned,
    parse_format_string,
};
use crate::sink::{CountingSink, FormatSink, SliceSink};

/// Independent read position over an argument slice.
///
/// Each pass creates its own cursor, so the slice itself is never consumed.
#[derive(Debug, Clone)]
pub struct ArgCursor<'s, 'a> {
    args: &'s [FormatArg<'a>],
    next: usize,
}

impl<'s, 'a> ArgCursor<'s, 'a> {
    #[must_use]
    pub const fn new(args: &'s [FormatArg<'a>]) -> Self {
        Self { args, next: 0 }
    }

    /// Take the next argument, if any remain.
    pub fn next_arg(&mut self) -> Option<FormatArg<'a>> {
        let arg = self.args.get(self.next).copied();
        if arg.is_some() {
            self.next += 1;
        }
        arg
    }

    /// Arguments consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.next
    }
}

/// Render every segment into `out`.
pub fn render_segments<S: FormatSink + ?Sized>(
    segments: &[FormatSegment<'_>],
    args: &[FormatArg<'_>],
    out: &mut S,
) {
    let mut cursor = ArgCursor::new(args);
    for seg in segments {
        match seg {
            FormatSegment::Literal(lit) => out.put_slice(lit),
            FormatSegment::Percent => out.put(b'%'),
            FormatSegment::Spec(spec) => render_spec(spec, &mut cursor, out),
        }
    }
}

/// Dry-run pass: exact output length without writing anywhere.
#[must_use]
pub fn measure_segments(segments: &[FormatSegment<'_>], args: &[FormatArg<'_>]) -> usize {
    let mut sink = CountingSink::new();
    render_segments(segments, args, &mut sink);
    sink.count()
}

/// Exact length of `template` formatted with `args`, saturating at
/// `usize::MAX`.
#[must_use]
pub fn measure(template: impl AsRef<[u8]>, args: &[FormatArg<'_>]) -> usize {
    measure_segments(&parse_format_string(template.as_ref()), args)
}

/// Bounded formatting into `buf`, the `vsnprintf` counterpart.
///
/// Writes at most `buf.len() - 1` bytes followed by a NUL. Returns the length
/// the full output would have, so a return value `>= buf.len()` means the
/// output was truncated. An empty `buf` receives nothing.
pub fn format_into(buf: &mut [u8], template: impl AsRef<[u8]>, args: &[FormatArg<'_>]) -> usize {
    let segments = parse_format_string(template.as_ref());
    let Some(body_len) = buf.len().checked_sub(1) else {
        return measure_segments(&segments, args);
    };
    let mut sink = SliceSink::new(&mut buf[..body_len]);
    render_segments(&segments, args, &mut sink);
    let (stored, total) = (sink.stored(), sink.total());
    buf[stored] = 0;
    total
}

fn render_spec<S: FormatSink + ?Sized>(
    spec: &FormatSpec,
    cursor: &mut ArgCursor<'_, '_>,
    out: &mut S,
) {
    let mut resolved = spec.clone();

    if spec.width == Width::FromArg {
        resolved.width = match cursor.next_arg() {
            Some(arg) => {
                let w = arg.register() as u32 as i32;
                if w < 0 {
                    resolved.flags.left_justify = true;
                    resolved.flags.zero_pad = false;
                }
                Width::Fixed(w.unsigned_abs() as usize)
            }
            None => Width::None,
        };
    }
    if spec.precision == Precision::FromArg {
        resolved.precision = match cursor.next_arg() {
            Some(arg) => {
                let p = arg.register() as u32 as i32;
                if p < 0 {
                    Precision::None
                } else {
                    Precision::Fixed(p as usize)
                }
            }
            None => Precision::None,
        };
    }

    if spec.conversion == b'%' {
        out.put(b'%');
        return;
    }

    let Some(arg) = cursor.next_arg() else {
        return;
    };

    match spec.conversion {
        // Counting into the caller's storage needs a pointer we cannot
        // write through; the argument is consumed and nothing is emitted.
        b'n' => {}
        b'd' | b'i' => {
            format_signed(narrow_signed(arg.register(), spec.length), &resolved, out);
        }
        b'u' | b'x' | b'X' | b'o' => {
            format_unsigned(narrow_unsigned(arg.register(), spec.length), &resolved, out);
        }
        b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {
            format_float(arg.float_value(), &resolved, out);
        }
        b'c' => format_char(arg.register() as u8, &resolved, out),
        b's' => match arg.str_bytes() {
            Some(s) => format_str(s, &resolved, out),
            None => format_null_str(&resolved, out),
        },
        b'p' => format_pointer(arg.register() as usize, &resolved, out),
        _ => {}
    }
}

/// Narrow a register image to the width selected by the length modifier.
fn narrow_signed(raw: u64, length: LengthMod) -> i64 {
    match length {
        LengthMod::Hh => i64::from(raw as i8),
        LengthMod::H => i64::from(raw as i16),
        LengthMod::L | LengthMod::Ll | LengthMod::J | LengthMod::Z | LengthMod::T => raw as i64,
        LengthMod::None | LengthMod::BigL => i64::from(raw as i32),
    }
}

fn narrow_unsigned(raw: u64, length: LengthMod) -> u64 {
    match length {
        LengthMod::Hh => u64::from(raw as u8),
        LengthMod::H => u64::from(raw as u16),
        LengthMod::L | LengthMod::Ll | LengthMod::J | LengthMod::Z | LengthMod::T => raw,
        LengthMod::None | LengthMod::BigL => u64::from(raw as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(template: &str, args: &[FormatArg<'_>]) -> String {
        let mut buf = Vec::new();
        render_segments(&parse_format_string(template.as_bytes()), args, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cursor_never_runs_past_end() {
        let args = [FormatArg::SignedInt(1)];
        let mut cursor = ArgCursor::new(&args);
        assert_eq!(cursor.next_arg(), Some(FormatArg::SignedInt(1)));
        assert_eq!(cursor.next_arg(), None);
        assert_eq!(cursor.consumed(), 1);
    }

    #[test]
    fn star_width_and_precision_consume_in_order() {
        let args = [
            FormatArg::SignedInt(8),
            FormatArg::SignedInt(2),
            FormatArg::Float(1.23456),
        ];
        assert_eq!(render("[%*.*f]", &args), "[    1.23]");
    }

    #[test]
    fn negative_star_width_left_justifies() {
        let args = [FormatArg::SignedInt(-5), FormatArg::SignedInt(42)];
        assert_eq!(render("[%*d]", &args), "[42   ]");
    }

    #[test]
    fn negative_star_precision_is_ignored() {
        let args = [FormatArg::SignedInt(-1), FormatArg::Str(b"hello")];
        assert_eq!(render("%.*s", &args), "hello");
    }

    #[test]
    fn missing_arguments_render_nothing() {
        assert_eq!(render("a%db%sc", &[FormatArg::SignedInt(1)]), "a1bc");
    }

    #[test]
    fn surplus_arguments_are_ignored() {
        let args = [FormatArg::SignedInt(1), FormatArg::SignedInt(2)];
        assert_eq!(render("%d", &args), "1");
    }

    #[test]
    fn length_modifiers_narrow_register() {
        assert_eq!(render("%hhd", &[FormatArg::SignedInt(300)]), "44");
        assert_eq!(render("%hu", &[FormatArg::SignedInt(-1)]), "65535");
        assert_eq!(render("%u", &[FormatArg::SignedInt(-1)]), "4294967295");
        assert_eq!(render("%lu", &[FormatArg::SignedInt(-1)]), "18446744073709551615");
        assert_eq!(render("%d", &[FormatArg::SignedInt(5_000_000_000)]), "705032704");
        assert_eq!(render("%lld", &[FormatArg::SignedInt(5_000_000_000)]), "5000000000");
    }

    #[test]
    fn string_conversion_with_non_string_prints_null() {
        assert_eq!(render("%s", &[FormatArg::Pointer(0)]), "(null)");
        assert_eq!(render("%d", &[FormatArg::Str(b"x")]), "0");
    }

    #[test]
    fn percent_n_consumes_argument_silently() {
        let args = [FormatArg::Pointer(0x1000), FormatArg::SignedInt(9)];
        assert_eq!(render("ab%ncd%d", &args), "abcd9");
    }

    #[test]
    fn malformed_directive_is_literal() {
        assert_eq!(render("%q%d", &[FormatArg::SignedInt(3)]), "%q3");
    }

    #[test]
    fn measure_matches_rendered_length() {
        let args = [
            FormatArg::Str(b"hello"),
            FormatArg::SignedInt(-17),
            FormatArg::Float(2.5),
        ];
        let template = "%-10s|%+5d|%08.3e|%%";
        assert_eq!(measure(template, &args), render(template, &args).len());
    }

    #[test]
    fn format_into_truncates_and_terminates() {
        let mut buf = [0xffu8; 4];
        let args = [FormatArg::from(123), FormatArg::from(456)];
        let total = format_into(&mut buf, "%d-%d", &args);
        assert_eq!(total, 7);
        assert_eq!(&buf, b"123\0");
    }

    #[test]
    fn format_into_fits_exactly() {
        let mut buf = [0u8; 4];
        let total = format_into(&mut buf, "%s", &[FormatArg::from("abc")]);
        assert_eq!(total, 3);
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn format_into_empty_buffer_only_measures() {
        let mut buf: [u8; 0] = [];
        assert_eq!(format_into(&mut buf, "hello", &[]), 5);
    }
}
