// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message identifier generation.
//!
//! Identifiers are `base36(<seconds><6-digit-zero-padded-microseconds>)`
//! followed by 22 random alphanumeric characters. The numeric prefix makes
//! identifiers sort consistently with generation order; the suffix keeps
//! identifiers generated within the same microsecond distinct.

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::types::StoreTime;

/// Length of the random identifier suffix.
pub const SUFFIX_LEN: usize = 22;

/// Decimal text of `num`, left-padded with zeros to `count` digits.
///
/// Returns the plain decimal text unchanged when it already has `count`
/// or more digits.
pub fn zero_pad(num: u64, count: usize) -> String {
    let text = num.to_string();
    if text.len() >= count {
        return text;
    }
    format!("{}{}", "0".repeat(count - text.len()), text)
}

/// Lowercase base-36 encoding of `n`.
pub fn base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}

/// `len` random characters drawn from `[A-Za-z0-9]`.
pub fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates a unique, time-ordered message identifier from a store clock
/// reading.
///
/// The numeric prefix is the base-36 form of the decimal concatenation
/// `<seconds><zero_pad(micros, 6)>`, which equals
/// `seconds * 1_000_000 + micros`.
pub fn generate(time: StoreTime) -> String {
    let stamp = time.seconds as u128 * 1_000_000 + time.micros as u128;
    let mut id = base36(stamp);
    id.push_str(&random_suffix(SUFFIX_LEN));
    id
}
