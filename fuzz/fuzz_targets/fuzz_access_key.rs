#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = dfe::AccessKey::verify(s);
        let _ = dfe::mod11_check_digit(s);
        let _ = dfe::format_decimal(&dfe::Numeric::from(s), 2);
    }
});
