#![no_main]

use libfuzzer_sys::fuzz_target;
use trendtable_format::{format_number_with_options, FormatOptions, Locale};

/// Host patterns are short; anything longer only slows the fuzzer down.
const MAX_PATTERN_BYTES: usize = 256;

fuzz_target!(|data: &[u8]| {
    // 8 bytes of value, 1 selector byte, then the pattern.
    if data.len() < 9 {
        return;
    }

    let mut raw = [0u8; 8];
    raw.copy_from_slice(&data[..8]);
    let value = f64::from_le_bytes(raw);

    let locale = match data[8] % 3 {
        0 => Locale::en_us(),
        1 => Locale::de_de(),
        _ => Locale::fr_fr(),
    };
    let options = FormatOptions::with_locale(locale);

    let rest = &data[9..];
    let rest = &rest[..rest.len().min(MAX_PATTERN_BYTES)];
    let pattern = String::from_utf8_lossy(rest);

    let rendered = format_number_with_options(value, Some(&*pattern), &options);
    assert!(!rendered.is_empty());
    let _ = format_number_with_options(value, None, &options);
});
