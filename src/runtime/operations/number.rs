//! Number conversions that never call back into user code
//!
//! String-to-number parsing (`StringToNumber`), Number::toString, and the
//! fixed-width integer conversions used by `ToInt32` and friends.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

const TWO_32: f64 = 4_294_967_296.0;

/// WhiteSpace or LineTerminator code point
pub fn is_js_whitespace(c: char) -> bool {
    match c {
        '\u{0009}' | '\u{000B}' | '\u{000C}' | ' ' | '\u{00A0}' | '\u{FEFF}' => true,
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => true,
        '\u{0085}' => false,
        c => c.is_whitespace(),
    }
}

/// Trim leading and trailing WhiteSpace and LineTerminators
pub fn trim_js_whitespace(s: &str) -> &str {
    s.trim_matches(is_js_whitespace)
}

/// StringToNumber: parse a StringNumericLiteral, NaN on any mismatch
pub fn string_to_number(s: &str) -> f64 {
    let s = trim_js_whitespace(s);
    if s.is_empty() {
        return 0.0;
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
            return parse_radix_integer(&s[2..], radix);
        }
    }
    parse_decimal(s)
}

fn parse_radix_integer(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return f64::NAN;
    }
    BigUint::parse_bytes(digits.as_bytes(), radix)
        .and_then(|n| n.to_f64())
        .unwrap_or(f64::NAN)
}

fn parse_decimal(s: &str) -> f64 {
    let (negative, body) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = if body == "Infinity" {
        f64::INFINITY
    } else {
        match normalize_decimal(body) {
            Some(normalized) => {
                lexical_core::parse::<f64>(normalized.as_bytes()).unwrap_or(f64::NAN)
            }
            None => return f64::NAN,
        }
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Validate an unsigned decimal literal and rewrite it as `int.frac[e±exp]`
fn normalize_decimal(body: &str) -> Option<String> {
    let bytes = body.as_bytes();
    let mut pos = 0;
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &body[int_start..pos];
    let mut frac_part = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        frac_part = &body[frac_start..pos];
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let mut exponent = "";
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let exp_start = pos + 1;
        pos += 1;
        if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
            pos += 1;
        }
        let digits_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == digits_start {
            return None;
        }
        exponent = &body[exp_start..pos];
    }
    if pos != bytes.len() {
        return None;
    }
    let mut normalized = String::with_capacity(body.len() + 4);
    normalized.push_str(if int_part.is_empty() { "0" } else { int_part });
    normalized.push('.');
    normalized.push_str(if frac_part.is_empty() { "0" } else { frac_part });
    if !exponent.is_empty() {
        normalized.push('e');
        normalized.push_str(exponent);
    }
    Some(normalized)
}

/// Number::toString(x) for radix 10
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 2_147_483_648.0 {
        return (n as i32).to_string();
    }
    let mut buffer = ryu_js::Buffer::new();
    buffer.format_finite(n).to_string()
}

/// ToInteger on a number: NaN to +0, infinities and zeros unchanged, truncate otherwise
pub fn double_to_integer(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else if n.is_infinite() || n == 0.0 {
        n
    } else {
        n.trunc()
    }
}

/// ToUint32 on a number
pub fn double_to_uint32(n: f64) -> u32 {
    if !n.is_finite() || n == 0.0 {
        return 0;
    }
    if n >= 0.0 && n < TWO_32 {
        return n as u32;
    }
    n.trunc().rem_euclid(TWO_32) as u32
}

/// ToInt32 on a number
pub fn double_to_int32(n: f64) -> i32 {
    double_to_uint32(n) as i32
}

/// ToUint16 on a number
pub fn double_to_uint16(n: f64) -> u16 {
    double_to_uint32(n) as u16
}

/// ToInt16 on a number
pub fn double_to_int16(n: f64) -> i16 {
    double_to_uint32(n) as u16 as i16
}

/// ToUint8 on a number
pub fn double_to_uint8(n: f64) -> u8 {
    double_to_uint32(n) as u8
}

/// ToInt8 on a number
pub fn double_to_int8(n: f64) -> i8 {
    double_to_uint32(n) as u8 as i8
}

/// ToUint8Clamp on a number: clamp to 0..=255, ties to even
pub fn double_to_uint8_clamp(n: f64) -> u8 {
    if n.is_nan() || n <= 0.0 {
        return 0;
    }
    if n >= 255.0 {
        return 255;
    }
    let floor = n.floor();
    let rounded = if n - floor < 0.5 {
        floor
    } else if n - floor > 0.5 || floor % 2.0 != 0.0 {
        floor + 1.0
    } else {
        floor
    };
    rounded as u8
}
