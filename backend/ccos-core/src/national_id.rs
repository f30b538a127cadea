// src/national_id.rs
//! Brazilian CPF helpers: digit extraction, canonical formatting and the
//! two-digit mod-11 checksum.

/// Sentinel stored on a person record when no national ID was found.
pub const MISSING_ID: &str = "-";

const CPF_LEN: usize = 11;

/// Keeps only ASCII digits.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats exactly 11 digits as `XXX.XXX.XXX-XX`. Anything else yields `None`.
pub fn format(raw: &str) -> Option<String> {
    let d = digits(raw);
    if d.len() != CPF_LEN {
        return None;
    }
    Some(format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]))
}

/// Checksum validation. Advisory only: callers flag, never discard.
pub fn is_valid(raw: &str) -> bool {
    let d: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if d.len() != CPF_LEN {
        return false;
    }
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }

    check_digit(&d[..9]) == d[9] && check_digit(&d[..10]) == d[10]
}

// Weights run from len+1 down to 2; a remainder of 10 maps to 0.
fn check_digit(prefix: &[u32]) -> u32 {
    let top = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, &digit)| digit * (top - i as u32))
        .sum();
    let remainder = (sum * 10) % 11;
    if remainder == 10 {
        0
    } else {
        remainder
    }
}
