//! Materialized argument lists.
//!
//! A C `va_list` is a single-pass cursor; formatting needs two passes over the
//! same values (measure, then render). Arguments are therefore captured up
//! front into an immutable slice of [`FormatArg`] and both passes walk that
//! slice independently.

use std::ffi::CStr;

/// Typed argument value.
///
/// Scalars carry their value directly. Strings borrow their bytes; they need
/// not be NUL-terminated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatArg<'a> {
    SignedInt(i64),
    UnsignedInt(u64),
    Float(f64),
    Char(u8),
    Str(&'a [u8]),
    Pointer(usize),
}

impl FormatArg<'_> {
    /// 64-bit register image of the argument, as a variadic call would pass it.
    ///
    /// Integer conversions read this image and narrow it according to the
    /// length modifier. Strings have no scalar image and read as 0.
    #[must_use]
    pub fn register(&self) -> u64 {
        match *self {
            Self::SignedInt(v) => v as u64,
            Self::UnsignedInt(v) => v,
            Self::Float(v) => v.to_bits(),
            Self::Char(c) => u64::from(c),
            Self::Str(_) => 0,
            Self::Pointer(p) => p as u64,
        }
    }

    /// Floating-point view. Non-float arguments are reinterpreted bitwise.
    #[must_use]
    pub fn float_value(&self) -> f64 {
        match *self {
            Self::Float(v) => v,
            _ => f64::from_bits(self.register()),
        }
    }

    /// String view, if this is a string argument.
    #[must_use]
    pub fn str_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            #[inline]
            fn from(v: $t) -> Self {
                Self::SignedInt(v as i64)
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            #[inline]
            fn from(v: $t) -> Self {
                Self::UnsignedInt(v as u64)
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for FormatArg<'_> {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for FormatArg<'_> {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Truncated to its low byte, as `%c` does with an `int`.
impl From<char> for FormatArg<'_> {
    fn from(c: char) -> Self {
        Self::Char(c as u8)
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(s.as_bytes())
    }
}

impl<'a> From<&'a String> for FormatArg<'a> {
    fn from(s: &'a String) -> Self {
        Self::Str(s.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Self::Str(s)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for FormatArg<'a> {
    fn from(s: &'a [u8; N]) -> Self {
        Self::Str(s)
    }
}

impl<'a> From<&'a CStr> for FormatArg<'a> {
    fn from(s: &'a CStr) -> Self {
        Self::Str(s.to_bytes())
    }
}

/// `None` behaves like a null `char *`.
impl<'a> From<Option<&'a str>> for FormatArg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        match s {
            Some(s) => Self::Str(s.as_bytes()),
            None => Self::Pointer(0),
        }
    }
}

impl<T> From<*const T> for FormatArg<'_> {
    fn from(p: *const T) -> Self {
        Self::Pointer(p as usize)
    }
}

impl<T> From<*mut T> for FormatArg<'_> {
    fn from(p: *mut T) -> Self {
        Self::Pointer(p as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_pick_signedness_from_type() {
        assert_eq!(FormatArg::from(-3i32), FormatArg::SignedInt(-3));
        assert_eq!(FormatArg::from(7u16), FormatArg::UnsignedInt(7));
        assert_eq!(FormatArg::from(usize::MAX), FormatArg::UnsignedInt(u64::MAX));
    }

    #[test]
    fn register_image_sign_extends() {
        assert_eq!(FormatArg::SignedInt(-1).register(), u64::MAX);
        assert_eq!(FormatArg::Char(b'A').register(), 65);
        assert_eq!(FormatArg::Str(b"x").register(), 0);
    }

    #[test]
    fn float_view_reinterprets_bits() {
        assert_eq!(FormatArg::Float(1.5).float_value(), 1.5);
        let bits = 2.0f64.to_bits();
        assert_eq!(FormatArg::UnsignedInt(bits).float_value(), 2.0);
    }

    #[test]
    fn strings_borrow_bytes() {
        let owned = String::from("owned");
        assert_eq!(FormatArg::from("hi").str_bytes(), Some(&b"hi"[..]));
        assert_eq!(FormatArg::from(&owned).str_bytes(), Some(&b"owned"[..]));
        assert_eq!(FormatArg::from(c"cstr").str_bytes(), Some(&b"cstr"[..]));
        assert_eq!(FormatArg::from(None::<&str>), FormatArg::Pointer(0));
    }

    #[test]
    fn char_truncates_to_low_byte() {
        assert_eq!(FormatArg::from('A'), FormatArg::Char(b'A'));
        assert_eq!(FormatArg::from('\u{141}'), FormatArg::Char(0x41));
    }
}
