//! printf formatting engine.
//!
//! Parses POSIX printf format directives and renders typed arguments into any
//! [`FormatSink`], with full width/precision/flag support.
//!
//! Reference: POSIX.1-2024 fprintf, ISO C11 7.21.6.1
//!
//! Renderers never inspect what the sink already holds, so feeding the same
//! spec and value to a [`CountingSink`](crate::sink::CountingSink) and to a
//! real buffer always yields the same byte count.

use crate::sink::FormatSink;

// ---------------------------------------------------------------------------
// Format spec types
// ---------------------------------------------------------------------------

/// Flags parsed from a printf format directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// Width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg, // '*'
}

/// Precision specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg, // '.*'
}

/// Length modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    Hh,   // 'hh'
    H,    // 'h'
    L,    // 'l'
    Ll,   // 'll'
    Z,    // 'z'
    T,    // 't'
    J,    // 'j'
    BigL, // 'L'
}

/// A parsed printf format specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: u8,
}

impl FormatSpec {
    /// Spec with no flags, width, precision or length modifier.
    #[must_use]
    pub const fn plain(conversion: u8) -> Self {
        Self {
            flags: FormatFlags {
                left_justify: false,
                force_sign: false,
                space_sign: false,
                alt_form: false,
                zero_pad: false,
            },
            width: Width::None,
            precision: Precision::None,
            length: LengthMod::None,
            conversion,
        }
    }

    /// True for `d i u o x X`.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self.conversion,
            b'd' | b'i' | b'u' | b'o' | b'x' | b'X'
        )
    }

    /// True for `f F e E g G a A`.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(
            self.conversion,
            b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A'
        )
    }

    /// Number of arguments this directive consumes.
    #[must_use]
    pub fn arg_count(&self) -> usize {
        let value = usize::from(self.conversion != b'%');
        usize::from(self.width == Width::FromArg)
            + usize::from(self.precision == Precision::FromArg)
            + value
    }
}

// ---------------------------------------------------------------------------
// Segment: parsed pieces of a format string
// ---------------------------------------------------------------------------

/// A segment of a parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSegment<'a> {
    /// Literal bytes to emit verbatim.
    Literal(&'a [u8]),
    /// A `%%` escape (emit a single '%').
    Percent,
    /// A conversion specifier requiring an argument.
    Spec(FormatSpec),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single format specifier starting after the '%' character.
///
/// `fmt` points to the first byte AFTER '%'. Returns `(spec, bytes_consumed)`
/// where `bytes_consumed` counts from `fmt[0]`. Returns `None` if malformed.
pub fn parse_format_spec(fmt: &[u8]) -> Option<(FormatSpec, usize)> {
    let mut pos = 0;
    let len = fmt.len();

    // --- flags ---
    let mut flags = FormatFlags::default();
    while pos < len {
        match fmt[pos] {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        pos += 1;
    }
    // POSIX: '+' overrides ' '; '-' overrides '0'.
    if flags.force_sign {
        flags.space_sign = false;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }

    // --- width ---
    let width = if pos < len && fmt[pos] == b'*' {
        pos += 1;
        Width::FromArg
    } else {
        let start = pos;
        while pos < len && fmt[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos > start {
            Width::Fixed(parse_decimal(&fmt[start..pos]))
        } else {
            Width::None
        }
    };

    // --- precision ---
    let precision = if pos < len && fmt[pos] == b'.' {
        pos += 1;
        if pos < len && fmt[pos] == b'*' {
            pos += 1;
            Precision::FromArg
        } else {
            let start = pos;
            while pos < len && fmt[pos].is_ascii_digit() {
                pos += 1;
            }
            Precision::Fixed(if pos > start {
                parse_decimal(&fmt[start..pos])
            } else {
                0
            })
        }
    } else {
        Precision::None
    };

    // --- length modifier ---
    let length = if pos < len {
        match fmt[pos] {
            b'h' => {
                pos += 1;
                if pos < len && fmt[pos] == b'h' {
                    pos += 1;
                    LengthMod::Hh
                } else {
                    LengthMod::H
                }
            }
            b'l' => {
                pos += 1;
                if pos < len && fmt[pos] == b'l' {
                    pos += 1;
                    LengthMod::Ll
                } else {
                    LengthMod::L
                }
            }
            b'z' => {
                pos += 1;
                LengthMod::Z
            }
            b't' => {
                pos += 1;
                LengthMod::T
            }
            b'j' => {
                pos += 1;
                LengthMod::J
            }
            b'L' => {
                pos += 1;
                LengthMod::BigL
            }
            _ => LengthMod::None,
        }
    } else {
        LengthMod::None
    };

    // --- conversion specifier ---
    if pos >= len {
        return None;
    }
    let conversion = fmt[pos];
    pos += 1;

    match conversion {
        b'd' | b'i' | b'u' | b'x' | b'X' | b'o' | b's' | b'c' | b'p' | b'n' | b'%' | b'f'
        | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {}
        _ => return None,
    }

    Some((
        FormatSpec {
            flags,
            width,
            precision,
            length,
            conversion,
        },
        pos,
    ))
}

/// Split a printf format string into segments.
///
/// Yields `FormatSegment::Literal` for literal runs and `FormatSegment::Spec`
/// for each `%`-directive. `%%` yields `FormatSegment::Percent`.
pub fn parse_format_string(fmt: &[u8]) -> Vec<FormatSegment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;
    let len = fmt.len();

    while pos < len {
        let start = pos;
        while pos < len && fmt[pos] != b'%' {
            pos += 1;
        }
        if pos > start {
            segments.push(FormatSegment::Literal(&fmt[start..pos]));
        }
        if pos >= len {
            break;
        }
        // Skip the '%'.
        pos += 1;
        if pos >= len {
            // Trailing '%' with nothing after: literal.
            segments.push(FormatSegment::Literal(&fmt[pos - 1..pos]));
            break;
        }
        if fmt[pos] == b'%' {
            segments.push(FormatSegment::Percent);
            pos += 1;
            continue;
        }
        if let Some((spec, consumed)) = parse_format_spec(&fmt[pos..]) {
            pos += consumed;
            segments.push(FormatSegment::Spec(spec));
        } else {
            // Malformed spec: emit the '%' as literal and continue.
            segments.push(FormatSegment::Literal(&fmt[pos - 1..pos]));
        }
    }
    segments
}

/// Total arguments a parsed format string consumes.
#[must_use]
pub fn count_args(segments: &[FormatSegment<'_>]) -> usize {
    segments
        .iter()
        .map(|seg| match seg {
            FormatSegment::Spec(spec) => spec.arg_count(),
            _ => 0,
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Render a signed integer according to `spec`.
pub fn format_signed<S: FormatSink + ?Sized>(value: i64, spec: &FormatSpec, out: &mut S) {
    let negative = value < 0;
    let abs = value.unsigned_abs();

    let mut digits = [0u8; 64];
    let digit_count = render_digits(abs, 10, false, &mut digits);
    let digit_slice = &digits[64 - digit_count..];

    let sign = sign_byte(negative, spec);

    // Precision: minimum digits (pad with zeros).
    let precision = match spec.precision {
        Precision::Fixed(p) => p,
        _ => 1,
    };
    // Explicit precision 0 with value 0: no digits emitted.
    let suppress_zero = value == 0 && precision == 0;
    let shown_digits = if suppress_zero { 0 } else { digit_count };
    let zero_prefix_count = precision.saturating_sub(shown_digits);

    let content_len = zero_prefix_count.saturating_add(usize::from(sign.is_some()) + shown_digits);
    let pad_total = resolve_width(spec).saturating_sub(content_len);
    let zero_pad = spec.flags.zero_pad && spec.precision == Precision::None;

    if !spec.flags.left_justify && !zero_pad {
        out.put_repeat(b' ', pad_total);
    }
    if let Some(s) = sign {
        out.put(s);
    }
    if !spec.flags.left_justify && zero_pad {
        out.put_repeat(b'0', pad_total);
    }
    out.put_repeat(b'0', zero_prefix_count);
    if !suppress_zero {
        out.put_slice(digit_slice);
    }
    if spec.flags.left_justify {
        out.put_repeat(b' ', pad_total);
    }
}

/// Render an unsigned integer (`u o x X`) according to `spec`.
pub fn format_unsigned<S: FormatSink + ?Sized>(value: u64, spec: &FormatSpec, out: &mut S) {
    let (base, uppercase) = int_base(spec.conversion);
    let mut digits = [0u8; 64];
    let digit_count = render_digits(value, base, uppercase, &mut digits);
    let digit_slice = &digits[64 - digit_count..];

    let mut precision = match spec.precision {
        Precision::Fixed(p) => p,
        _ => 1,
    };
    let octal_alt = spec.flags.alt_form && base == 8;
    // '#' with 'o' raises the precision so the first digit is a zero.
    if octal_alt {
        precision = precision.max(if value == 0 { 1 } else { digit_count + 1 });
    }
    let suppress_zero = value == 0 && precision == 0;
    let shown_digits = if suppress_zero { 0 } else { digit_count };
    let zero_prefix_count = precision.saturating_sub(shown_digits);

    let prefix = if value != 0 && !octal_alt {
        alt_prefix(spec)
    } else {
        b"" as &[u8]
    };

    let content_len = zero_prefix_count.saturating_add(prefix.len() + shown_digits);
    let pad_total = resolve_width(spec).saturating_sub(content_len);
    let zero_pad = spec.flags.zero_pad && spec.precision == Precision::None;

    if !spec.flags.left_justify && !zero_pad {
        out.put_repeat(b' ', pad_total);
    }
    out.put_slice(prefix);
    if !spec.flags.left_justify && zero_pad {
        out.put_repeat(b'0', pad_total);
    }
    out.put_repeat(b'0', zero_prefix_count);
    if !suppress_zero {
        out.put_slice(digit_slice);
    }
    if spec.flags.left_justify {
        out.put_repeat(b' ', pad_total);
    }
}

/// Render a floating-point value according to `spec`.
///
/// Supports `%f`/`%F`, `%e`/`%E`, `%g`/`%G` and `%a`/`%A`. Decimal digit
/// generation uses Rust's exactly-rounded float formatting; POSIX
/// width/flag rules are applied on top. Precision is unbounded: digits past
/// the exact expansion of the value are emitted as zeros.
pub fn format_float<S: FormatSink + ?Sized>(value: f64, spec: &FormatSpec, out: &mut S) {
    let uppercase = spec.conversion.is_ascii_uppercase();
    let sign = sign_byte(value.is_sign_negative(), spec);

    if !value.is_finite() {
        let text = match (value.is_nan(), uppercase) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        // Zero padding never applies to non-finite values.
        let body = FloatBody::plain(text.to_string());
        return emit_float(sign, b"", &body, spec.flags.left_justify, false, spec, out);
    }

    let abs = value.abs();
    let alt = spec.flags.alt_form;
    let precision = match spec.precision {
        Precision::Fixed(p) => Some(p),
        _ => None,
    };

    let (prefix, body): (&[u8], FloatBody) = match spec.conversion | 0x20 {
        b'e' => (b"", format_e(abs, precision.unwrap_or(6), uppercase, alt)),
        b'g' => (b"", format_g(abs, precision.unwrap_or(6), uppercase, alt)),
        b'a' => (
            if uppercase { b"0X" } else { b"0x" },
            format_a(abs, precision, uppercase, alt),
        ),
        _ => (b"", format_f(abs, precision.unwrap_or(6), alt)),
    };

    emit_float(
        sign,
        prefix,
        &body,
        spec.flags.left_justify,
        spec.flags.zero_pad,
        spec,
        out,
    );
}

/// Render a string argument according to `spec`.
///
/// `s` is the raw byte content (need not be NUL-terminated).
/// Precision truncates the string if set.
pub fn format_str<S: FormatSink + ?Sized>(s: &[u8], spec: &FormatSpec, out: &mut S) {
    let max_len = match spec.precision {
        Precision::Fixed(p) => p,
        _ => s.len(),
    };
    let effective = &s[..s.len().min(max_len)];
    let pad_total = resolve_width(spec).saturating_sub(effective.len());

    if !spec.flags.left_justify {
        out.put_repeat(b' ', pad_total);
    }
    out.put_slice(effective);
    if spec.flags.left_justify {
        out.put_repeat(b' ', pad_total);
    }
}

/// Render `%s` for a null string pointer.
///
/// Prints `(null)`, or nothing when the precision is too small to hold it.
pub fn format_null_str<S: FormatSink + ?Sized>(spec: &FormatSpec, out: &mut S) {
    const NULL_STR: &[u8] = b"(null)";
    let text: &[u8] = match spec.precision {
        Precision::Fixed(p) if p < NULL_STR.len() => b"",
        _ => NULL_STR,
    };
    format_str(text, &FormatSpec::plain(b's').with_layout_of(spec), out);
}

/// Render a character according to `spec`.
pub fn format_char<S: FormatSink + ?Sized>(c: u8, spec: &FormatSpec, out: &mut S) {
    let pad_total = resolve_width(spec).saturating_sub(1);

    if !spec.flags.left_justify {
        out.put_repeat(b' ', pad_total);
    }
    out.put(c);
    if spec.flags.left_justify {
        out.put_repeat(b' ', pad_total);
    }
}

/// Render a pointer as `0x...` hex, or `(nil)` for null.
pub fn format_pointer<S: FormatSink + ?Sized>(addr: usize, spec: &FormatSpec, out: &mut S) {
    if addr == 0 {
        return format_str(b"(nil)", &FormatSpec::plain(b's').with_layout_of(spec), out);
    }

    let mut digits = [0u8; 64];
    let count = render_digits(addr as u64, 16, false, &mut digits);
    let digit_slice = &digits[64 - count..];
    let content_len = 2 + count; // "0x" + digits
    let pad_total = resolve_width(spec).saturating_sub(content_len);

    if !spec.flags.left_justify {
        out.put_repeat(b' ', pad_total);
    }
    out.put_slice(b"0x");
    out.put_slice(digit_slice);
    if spec.flags.left_justify {
        out.put_repeat(b' ', pad_total);
    }
}

impl FormatSpec {
    /// Copy width and justification from `other`, keeping everything else.
    fn with_layout_of(mut self, other: &FormatSpec) -> Self {
        self.width = other.width;
        self.flags.left_justify = other.flags.left_justify;
        self
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_decimal(digits: &[u8]) -> usize {
    let mut result = 0_usize;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add((d - b'0') as usize);
    }
    result
}

fn resolve_width(spec: &FormatSpec) -> usize {
    match spec.width {
        Width::Fixed(w) => w,
        _ => 0,
    }
}

fn sign_byte(negative: bool, spec: &FormatSpec) -> Option<u8> {
    if negative {
        Some(b'-')
    } else if spec.flags.force_sign {
        Some(b'+')
    } else if spec.flags.space_sign {
        Some(b' ')
    } else {
        None
    }
}

fn int_base(conversion: u8) -> (u64, bool) {
    match conversion {
        b'o' => (8, false),
        b'x' => (16, false),
        b'X' => (16, true),
        _ => (10, false),
    }
}

/// Render `value` in the given `base` into the END of `buf`.
/// Returns the number of digits written. Digits are placed right-aligned.
fn render_digits(mut value: u64, base: u64, uppercase: bool, buf: &mut [u8; 64]) -> usize {
    if value == 0 {
        buf[63] = b'0';
        return 1;
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = 64;
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    64 - pos
}

fn alt_prefix(spec: &FormatSpec) -> &'static [u8] {
    if !spec.flags.alt_form {
        return b"";
    }
    match spec.conversion {
        b'x' => b"0x",
        b'X' => b"0X",
        _ => b"",
    }
}

/// Decimal digits requested beyond this are zeros for every finite `f64`
/// (at most 1074 fractional and 767 significant digits), and `format!`
/// precision itself stops at `u16::MAX`.
const EXACT_DIGITS: usize = 1100;

/// Float text as `digits`, then `zeros` literal `'0'` bytes, then `suffix`
/// (exponent). Long zero runs are counted rather than built.
#[derive(Debug, Default)]
struct FloatBody {
    digits: String,
    zeros: usize,
    suffix: String,
}

impl FloatBody {
    fn plain(digits: String) -> Self {
        Self {
            digits,
            ..Self::default()
        }
    }

    fn len(&self) -> usize {
        self.digits
            .len()
            .saturating_add(self.zeros)
            .saturating_add(self.suffix.len())
    }

    /// Drop fractional trailing zeros and a dangling point.
    fn strip_trailing_zeros(&mut self) {
        self.zeros = 0;
        strip_trailing_zeros(&mut self.digits);
    }

    fn write<S: FormatSink + ?Sized>(&self, out: &mut S) {
        out.put_slice(self.digits.as_bytes());
        out.put_repeat(b'0', self.zeros);
        out.put_slice(self.suffix.as_bytes());
    }
}

/// Lay out `[pad][sign][prefix][zeros]body[pad]` for a float conversion.
fn emit_float<S: FormatSink + ?Sized>(
    sign: Option<u8>,
    prefix: &[u8],
    body: &FloatBody,
    left_justify: bool,
    zero_pad: bool,
    spec: &FormatSpec,
    out: &mut S,
) {
    let content_len = body
        .len()
        .saturating_add(usize::from(sign.is_some()) + prefix.len());
    let pad_total = resolve_width(spec).saturating_sub(content_len);

    if !left_justify && !zero_pad {
        out.put_repeat(b' ', pad_total);
    }
    if let Some(s) = sign {
        out.put(s);
    }
    out.put_slice(prefix);
    if !left_justify && zero_pad {
        out.put_repeat(b'0', pad_total);
    }
    body.write(out);
    if left_justify {
        out.put_repeat(b' ', pad_total);
    }
}

/// `%f` / `%F`: fixed-point decimal.
fn format_f(value: f64, precision: usize, alt_form: bool) -> FloatBody {
    let shown = precision.min(EXACT_DIGITS);
    let mut digits = format!("{value:.shown$}");
    if alt_form && precision == 0 {
        digits.push('.');
    }
    FloatBody {
        digits,
        zeros: precision - shown,
        suffix: String::new(),
    }
}

/// Split Rust's `{:e}` output into mantissa, zero fill past the exact
/// digits, and decimal exponent.
fn sci_parts(value: f64, precision: usize) -> (String, usize, i32) {
    let shown = precision.min(EXACT_DIGITS);
    let s = format!("{value:.shown$e}");
    let zeros = precision - shown;
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), zeros, exp.parse().unwrap_or(0)),
        None => (s, zeros, 0),
    }
}

fn exponent_suffix(marker: char, exp: i32) -> String {
    let mut s = String::with_capacity(5);
    s.push(marker);
    s.push(if exp < 0 { '-' } else { '+' });
    let abs = exp.unsigned_abs();
    if abs < 10 {
        s.push('0');
    }
    s.push_str(&abs.to_string());
    s
}

/// `%e` / `%E`: scientific notation with at least two exponent digits.
fn format_e(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> FloatBody {
    let (mut digits, zeros, exp) = sci_parts(value, precision);
    if alt_form && precision == 0 {
        digits.push('.');
    }
    FloatBody {
        digits,
        zeros,
        suffix: exponent_suffix(if uppercase { 'E' } else { 'e' }, exp),
    }
}

/// `%g` / `%G`: `%e` when the exponent is below -4 or at least the
/// precision, `%f` otherwise; trailing zeros removed unless `#`.
fn format_g(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> FloatBody {
    let p = precision.max(1);
    // The exponent after rounding to `p` significant digits decides the style.
    let (mantissa, zeros, exp) = sci_parts(value, p - 1);

    let fixed = match usize::try_from(exp) {
        Ok(e) => e < p,
        Err(_) => exp >= -4,
    };
    if fixed {
        let frac_digits = match usize::try_from(exp) {
            Ok(e) => p - 1 - e,
            Err(_) => (p - 1).saturating_add(exp.unsigned_abs() as usize),
        };
        let mut body = format_f(value, frac_digits, alt_form);
        if !alt_form {
            body.strip_trailing_zeros();
        }
        body
    } else {
        let mut body = FloatBody {
            digits: mantissa,
            zeros,
            suffix: exponent_suffix(if uppercase { 'E' } else { 'e' }, exp),
        };
        if alt_form {
            if p == 1 {
                body.digits.push('.');
            }
        } else {
            body.strip_trailing_zeros();
        }
        body
    }
}

/// Remove trailing zeros after the decimal point.
fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}

/// `%a` / `%A`: hexadecimal mantissa and binary exponent, without the `0x`
/// prefix (the caller places zero padding between prefix and body).
///
/// With no precision the mantissa is exact with trailing zeros removed.
/// Otherwise it is rounded half-to-even to `precision` hex digits.
fn format_a(value: f64, precision: Option<usize>, uppercase: bool, alt_form: bool) -> FloatBody {
    const MANT_BITS: u32 = 52;
    const MANT_NIBBLES: usize = 13;

    let bits = value.to_bits();
    let biased = ((bits >> MANT_BITS) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << MANT_BITS) - 1);

    let (mut lead, mut mant, exp) = if value == 0.0 {
        (0u64, 0u64, 0i32)
    } else if biased == 0 {
        (0, fraction, -1022)
    } else {
        (1, fraction, biased - 1023)
    };

    let nibbles = match precision {
        Some(p) if p < MANT_NIBBLES => {
            let shift = ((MANT_NIBBLES - p) * 4) as u32;
            let full = (lead << MANT_BITS) | mant;
            let rem = full & ((1u64 << shift) - 1);
            let half = 1u64 << (shift - 1);
            let mut kept = full >> shift;
            if rem > half || (rem == half && kept & 1 == 1) {
                kept += 1;
            }
            let frac_bits = (p * 4) as u32;
            lead = kept >> frac_bits;
            mant = kept & ((1u64 << frac_bits) - 1);
            p
        }
        // Exact; padded with zeros below.
        Some(_) => MANT_NIBBLES,
        None => {
            let mut n = MANT_NIBBLES;
            while n > 0 && mant & 0xf == 0 {
                mant >>= 4;
                n -= 1;
            }
            n
        }
    };

    let digit = |d: u64| -> char {
        let d = d as u8;
        let c = if d < 10 {
            b'0' + d
        } else if uppercase {
            b'A' + (d - 10)
        } else {
            b'a' + (d - 10)
        };
        c as char
    };

    let mut s = String::with_capacity(24);
    s.push(digit(lead));
    let extra_zeros = precision.map_or(0, |p| p.saturating_sub(MANT_NIBBLES));
    if nibbles > 0 || extra_zeros > 0 || alt_form {
        s.push('.');
    }
    for i in (0..nibbles).rev() {
        s.push(digit((mant >> (i * 4)) & 0xf));
    }
    let mut suffix = String::with_capacity(6);
    suffix.push(if uppercase { 'P' } else { 'p' });
    suffix.push(if exp < 0 { '-' } else { '+' });
    suffix.push_str(&exp.unsigned_abs().to_string());
    FloatBody {
        digits: s,
        zeros: extra_zeros,
        suffix,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
