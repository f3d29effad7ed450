//! Modulus-11 check digit used by NF-e and CT-e access keys.

/// Compute the modulus-11 check digit of a digit sequence.
///
/// Digits are weighted right-to-left with 2, 3, ..., 9, then back to 2. A
/// remainder of 0 or 1 yields 0, anything else `11 - remainder`. Non-digit
/// bytes are skipped; the caller is expected to pass digits only.
///
/// ```
/// use dfe::core::mod11_check_digit;
///
/// assert_eq!(mod11_check_digit("123456789"), 7);
/// ```
pub fn mod11_check_digit(digits: &str) -> u8 {
    let mut weight: u32 = 2;
    let mut sum: u32 = 0;
    for byte in digits.bytes().rev() {
        if !byte.is_ascii_digit() {
            continue;
        }
        sum += u32::from(byte - b'0') * weight;
        weight = if weight == 9 { 2 } else { weight + 1 };
    }
    match sum % 11 {
        0 | 1 => 0,
        rem => (11 - rem) as u8,
    }
}

/// True if the last digit of `sequence` is the check digit of the rest.
pub fn mod11_is_valid(sequence: &str) -> bool {
    let bytes = sequence.as_bytes();
    let Some((&last, body)) = bytes.split_last() else {
        return false;
    };
    if body.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let body = &sequence[..body.len()];
    mod11_check_digit(body) == last - b'0'
}
