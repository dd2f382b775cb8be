#![cfg(target_os = "linux")]

use std::ffi::{CStr, c_char, c_int};

use strfmt_abi::{strfmt_format_raw, strfmt_snprintf};

/// Run `strfmt_format_raw`, copy the result out, and free it.
fn format_raw(fmt: &CStr, regs: &[u64]) -> Option<Vec<u8>> {
    let ptr = unsafe { strfmt_format_raw(fmt.as_ptr(), regs.as_ptr(), regs.len()) };
    if ptr.is_null() {
        return None;
    }
    let bytes = unsafe { CStr::from_ptr(ptr) }.to_bytes().to_vec();
    unsafe { libc::free(ptr.cast()) };
    Some(bytes)
}

/// Format with the host C library for comparison.
macro_rules! host_snprintf {
    ($fmt:expr $(, $arg:expr)*) => {{
        let mut buf = [0 as c_char; 256];
        let n = unsafe { libc::snprintf(buf.as_mut_ptr(), buf.len(), $fmt.as_ptr() $(, $arg)*) };
        assert!(n >= 0 && (n as usize) < buf.len());
        unsafe { CStr::from_ptr(buf.as_ptr()) }.to_bytes().to_vec()
    }};
}

#[test]
fn formats_two_integers() {
    assert_eq!(format_raw(c"%d-%d", &[3, 7]).unwrap(), b"3-7");
}

#[test]
fn formats_c_string_argument() {
    let hello = c"hello";
    let out = format_raw(c"%s", &[hello.as_ptr() as usize as u64]).unwrap();
    assert_eq!(out, b"hello");
}

#[test]
fn empty_template_gives_empty_string() {
    assert_eq!(format_raw(c"", &[]).unwrap(), b"");
}

#[test]
fn null_template_returns_null() {
    let ptr = unsafe { strfmt_format_raw(std::ptr::null(), std::ptr::null(), 0) };
    assert!(ptr.is_null());
}

#[test]
fn null_args_with_no_directives_is_fine() {
    let ptr = unsafe { strfmt_format_raw(c"static".as_ptr(), std::ptr::null(), 0) };
    assert!(!ptr.is_null());
    assert_eq!(unsafe { CStr::from_ptr(ptr) }.to_bytes(), b"static");
    unsafe { libc::free(ptr.cast()) };
}

#[test]
fn snprintf_truncates_and_reports_full_length() {
    let mut buf = [0x55 as c_char; 4];
    let regs = [12345u64];
    let n = unsafe {
        strfmt_snprintf(buf.as_mut_ptr(), buf.len(), c"%d".as_ptr(), regs.as_ptr(), 1)
    };
    assert_eq!(n, 5);
    assert_eq!(unsafe { CStr::from_ptr(buf.as_ptr()) }.to_bytes(), b"123");
}

#[test]
fn snprintf_measures_with_null_buffer() {
    let regs = [1.5f64.to_bits()];
    let n = unsafe {
        strfmt_snprintf(std::ptr::null_mut(), 0, c"%f".as_ptr(), regs.as_ptr(), 1)
    };
    assert_eq!(n, 8);
    let n = unsafe {
        strfmt_snprintf(std::ptr::null_mut(), 0, std::ptr::null(), regs.as_ptr(), 1)
    };
    assert_eq!(n, -1);
}

#[test]
fn matches_host_for_integers() {
    let expected = host_snprintf!(c"[%5d|%-5d|%05d|%+d|% d]", 42 as c_int, 42 as c_int, -42 as c_int, 7 as c_int, 7 as c_int);
    let regs = [42, 42, (-42i64) as u64, 7, 7];
    assert_eq!(format_raw(c"[%5d|%-5d|%05d|%+d|% d]", &regs).unwrap(), expected);
}

#[test]
fn matches_host_for_unsigned_bases() {
    let expected = host_snprintf!(c"%x %X %#x %o %#o %u", 255 as c_int, 255 as c_int, 255 as c_int, 8 as c_int, 8 as c_int, 4000000000u32);
    let regs = [255, 255, 255, 8, 8, 4_000_000_000];
    assert_eq!(format_raw(c"%x %X %#x %o %#o %u", &regs).unwrap(), expected);
}

#[test]
fn matches_host_for_length_modifiers() {
    let expected = host_snprintf!(c"%hhd %hu %ld %lld", 300 as c_int, 70000 as c_int, -5_000_000_000i64 as libc::c_long, 9_000_000_000i64 as libc::c_longlong);
    let regs = [300, 70000, (-5_000_000_000i64) as u64, 9_000_000_000];
    assert_eq!(format_raw(c"%hhd %hu %ld %lld", &regs).unwrap(), expected);
}

#[test]
fn matches_host_for_floats() {
    let expected = host_snprintf!(c"%f|%.2f|%08.3f|%e|%.3E|%g|%g|%g", 1.23456f64, 1.23456f64, -2.5f64, 12345.678f64, 0.00015f64, 100000.0f64, 1000000.0f64, 0.0001f64);
    let regs = [
        1.23456f64.to_bits(),
        1.23456f64.to_bits(),
        (-2.5f64).to_bits(),
        12345.678f64.to_bits(),
        0.00015f64.to_bits(),
        100000.0f64.to_bits(),
        1000000.0f64.to_bits(),
        0.0001f64.to_bits(),
    ];
    assert_eq!(
        format_raw(c"%f|%.2f|%08.3f|%e|%.3E|%g|%g|%g", &regs).unwrap(),
        expected
    );
}

#[test]
fn matches_host_for_hex_floats_and_specials() {
    let expected = host_snprintf!(c"%a %a %A %f %F", 1.0f64, 3.0f64, 0.5f64, f64::INFINITY, f64::NEG_INFINITY);
    let regs = [
        1.0f64.to_bits(),
        3.0f64.to_bits(),
        0.5f64.to_bits(),
        f64::INFINITY.to_bits(),
        f64::NEG_INFINITY.to_bits(),
    ];
    assert_eq!(format_raw(c"%a %a %A %f %F", &regs).unwrap(), expected);
}

#[test]
fn matches_host_for_strings_chars_and_star() {
    let word = c"formatting";
    let expected = host_snprintf!(c"[%-12s|%.4s|%c|%*d|%%]", word.as_ptr(), word.as_ptr(), b'Z' as c_int, 6 as c_int, 99 as c_int);
    let regs = [
        word.as_ptr() as usize as u64,
        word.as_ptr() as usize as u64,
        u64::from(b'Z'),
        6,
        99,
    ];
    assert_eq!(format_raw(c"[%-12s|%.4s|%c|%*d|%%]", &regs).unwrap(), expected);
}

#[test]
fn matches_host_for_pointer() {
    let expected = host_snprintf!(c"%p", 0xdead_beef_usize as *const libc::c_void);
    assert_eq!(format_raw(c"%p", &[0xdead_beef]).unwrap(), expected);
}

#[test]
fn precision_stops_reading_unterminated_array() {
    let bytes: [c_char; 3] = [b'a' as c_char, b'b' as c_char, b'c' as c_char];
    let addr = bytes.as_ptr() as usize as u64;
    assert_eq!(format_raw(c"<%.3s>", &[addr]).unwrap(), b"<abc>");
    assert_eq!(format_raw(c"<%5.2s>", &[addr]).unwrap(), b"<   ab>");
    assert_eq!(format_raw(c"<%.*s>", &[3, addr]).unwrap(), b"<abc>");
}

#[test]
fn many_arguments_are_all_consumed() {
    let template = "%d,".repeat(40);
    let template = std::ffi::CString::new(template).unwrap();
    let regs: Vec<u64> = (0..40).collect();
    let expected: String = (0..40).map(|i| format!("{i},")).collect();
    assert_eq!(format_raw(&template, &regs).unwrap(), expected.as_bytes());
}

#[test]
fn count_directive_consumes_without_writing() {
    let mut slot: c_int = -1;
    let regs = [&raw mut slot as usize as u64, 5];
    assert_eq!(format_raw(c"ab%nc%d", &regs).unwrap(), b"abc5");
    assert_eq!(slot, -1);
}

#[cfg(feature = "c-variadic")]
#[test]
fn variadic_entry_reads_every_argument() {
    let template = std::ffi::CString::new("%d ".repeat(34)).unwrap();
    let ptr = unsafe {
        strfmt_abi::string_fmt(
            template.as_ptr(),
            0 as c_int, 1 as c_int, 2 as c_int, 3 as c_int, 4 as c_int, 5 as c_int, 6 as c_int, 7 as c_int,
            8 as c_int, 9 as c_int, 10 as c_int, 11 as c_int, 12 as c_int, 13 as c_int, 14 as c_int, 15 as c_int,
            16 as c_int, 17 as c_int, 18 as c_int, 19 as c_int, 20 as c_int, 21 as c_int, 22 as c_int, 23 as c_int,
            24 as c_int, 25 as c_int, 26 as c_int, 27 as c_int, 28 as c_int, 29 as c_int, 30 as c_int, 31 as c_int,
            32 as c_int, 33 as c_int,
        )
    };
    assert!(!ptr.is_null());
    let expected: String = (0..34).map(|i| format!("{i} ")).collect();
    assert_eq!(unsafe { CStr::from_ptr(ptr) }.to_bytes(), expected.as_bytes());
    unsafe { libc::free(ptr.cast()) };
}

#[cfg(feature = "c-variadic")]
#[test]
fn variadic_entry_formats_into_malloc_block() {
    let ptr = unsafe {
        strfmt_abi::string_fmt(c"%d-%s-%.1f".as_ptr(), 3 as c_int, c"x".as_ptr(), 2.25f64)
    };
    assert!(!ptr.is_null());
    let expected = host_snprintf!(c"%d-%s-%.1f", 3 as c_int, c"x".as_ptr(), 2.25f64);
    assert_eq!(unsafe { CStr::from_ptr(ptr) }.to_bytes(), expected.as_slice());
    unsafe { libc::free(ptr.cast()) };
}
