#![no_main]
use libfuzzer_sys::fuzz_target;
use strfmt_core::{CappedAllocator, FormatArg, FormatError, format_into, format_string_in, measure};

/// Outputs above this are checked through the allocation-failure path.
const MAX_OUTPUT: usize = 1 << 22;

fuzz_target!(|data: &[u8]| {
    // First byte splits the input into a template and argument bytes.
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (template, raw_args) = rest.split_at(split);

    let star = template.contains(&b'*');

    let mut args = Vec::new();
    for chunk in raw_args.chunks_exact(9) {
        let mut word = [0u8; 8];
        word.copy_from_slice(&chunk[1..]);
        let v = u64::from_le_bytes(word);
        if star {
            args.push(FormatArg::SignedInt((v as i64) % 200_000));
            continue;
        }
        args.push(match chunk[0] % 6 {
            0 => FormatArg::SignedInt(v as i64),
            1 => FormatArg::UnsignedInt(v),
            2 => FormatArg::Float(f64::from_bits(v)),
            3 => FormatArg::Char(v as u8),
            4 => FormatArg::Str(&chunk[1..]),
            _ => FormatArg::Pointer(v as usize),
        });
    }

    let measured = measure(template, &args);
    let out = match format_string_in(&CappedAllocator::new(MAX_OUTPUT), template, &args) {
        Ok(out) => out,
        Err(FormatError::AllocationFailure { requested }) => {
            assert!(measured >= MAX_OUTPUT);
            assert_eq!(requested, measured.checked_add(1).unwrap_or(usize::MAX));
            return;
        }
    };
    assert_eq!(out.len(), measured);
    assert_eq!(out.as_bytes_with_nul().last(), Some(&0));

    let mut buf = [0u8; 32];
    let total = format_into(&mut buf, template, &args);
    assert_eq!(total, out.len());
    let kept = total.min(buf.len() - 1);
    assert_eq!(&buf[..kept], &out.as_bytes()[..kept]);
});
