//! BigInt parsing and mixed BigInt/Number comparison

use super::number::trim_js_whitespace;
use num_bigint::BigInt;
use num_traits::Zero;
use std::cmp::Ordering;

/// StringToBigInt: `None` when the text is not a StringIntegerLiteral
pub fn string_to_bigint(s: &str) -> Option<BigInt> {
    let s = trim_js_whitespace(s);
    if s.is_empty() {
        return Some(BigInt::zero());
    }
    let bytes = s.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            let digits = &bytes[2..];
            if !digits.iter().all(|&b| char::from(b).is_digit(radix)) {
                return None;
            }
            return BigInt::parse_bytes(digits, radix);
        }
    }
    let (negative, digits) = match bytes[0] {
        b'-' => (true, &bytes[1..]),
        b'+' => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let magnitude = BigInt::parse_bytes(digits, 10)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// BigInt::toString(10)
pub fn bigint_to_string(n: &BigInt) -> String {
    n.to_str_radix(10)
}

/// Exact BigInt for a finite, integral double
pub fn bigint_from_integral_f64(n: f64) -> BigInt {
    debug_assert!(n.is_finite() && n.trunc() == n);
    let bits = n.to_bits();
    let negative = bits >> 63 == 1;
    let exponent = ((bits >> 52) & 0x7ff) as i64;
    if exponent == 0 {
        return BigInt::zero();
    }
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    let shift = exponent - 1075;
    let magnitude = if shift >= 0 {
        BigInt::from(mantissa) << (shift as usize)
    } else {
        BigInt::from(mantissa.checked_shr((-shift) as u32).unwrap_or(0))
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Compare a BigInt with a Number; `None` when the Number is NaN
pub fn compare_bigint_number(x: &BigInt, y: f64) -> Option<Ordering> {
    if y.is_nan() {
        return None;
    }
    if y == f64::INFINITY {
        return Some(Ordering::Less);
    }
    if y == f64::NEG_INFINITY {
        return Some(Ordering::Greater);
    }
    let floor = y.floor();
    match x.cmp(&bigint_from_integral_f64(floor)) {
        Ordering::Equal if floor < y => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}
