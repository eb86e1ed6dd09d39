//! Lenient decimal input and display formatting.
//!
//! Amounts are plain `f64`. User input never fails to parse: whatever numeric
//! prefix the text starts with is taken, anything else becomes `0`. Rounding
//! happens only when formatting for display, never while summing.
//!
//! ```rust
//! use tabsplit_splitting::{format_amount, parse_amount};
//!
//! assert_eq!(parse_amount("2.50"), 2.5);
//! assert_eq!(parse_amount("1."), 1.0);
//! assert_eq!(parse_amount("abc"), 0.0);
//! assert_eq!(format_amount(10.0 / 3.0, 2), "3.33");
//! ```

/// Result of parsing user-typed text as an amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LenientAmount {
    /// The stored value: finite and non-negative.
    pub value: f64,
    /// `true` when the text was not a clean number and had to be truncated
    /// or replaced by `0`.
    pub coerced: bool,
}

impl LenientAmount {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let prefix = numeric_prefix(trimmed);

        let parsed = if prefix.is_empty() {
            None
        } else {
            normalize(prefix).parse::<f64>().ok()
        };

        match parsed {
            Some(v) if v.is_finite() && v >= 0.0 => Self {
                // `-0` is stored as plain zero.
                value: v + 0.0,
                coerced: prefix.len() != trimmed.len(),
            },
            _ => Self {
                value: 0.0,
                coerced: true,
            },
        }
    }
}

/// Parse user input as a non-negative decimal, degrading to `0`.
pub fn parse_amount(raw: &str) -> f64 {
    LenientAmount::parse(raw).value
}

/// Clamp an already-numeric value into the stored domain (finite, `>= 0`).
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Format an amount for display with a fixed number of decimals.
pub fn format_amount(value: f64, decimals: usize) -> String {
    let rounded = format!("{value:.decimals$}");
    // Avoid printing "-0.00" for tiny negative drift.
    if rounded.starts_with('-') && rounded[1..].chars().all(|c| c == '0' || c == '.') {
        rounded[1..].to_string()
    } else {
        rounded
    }
}

/// Longest leading slice shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Turn `"1."` / `".5"` / `"+2"` into forms `f64::from_str` accepts everywhere.
fn normalize(prefix: &str) -> String {
    let (sign, body) = match prefix.as_bytes().first() {
        Some(b'-') => ("-", &prefix[1..]),
        Some(b'+') => ("", &prefix[1..]),
        _ => ("", prefix),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => body.split_at(pos),
        None => (body, ""),
    };

    let mut out = String::with_capacity(prefix.len() + 2);
    out.push_str(sign);
    if mantissa.starts_with('.') {
        out.push('0');
    }
    out.push_str(mantissa.strip_suffix('.').unwrap_or(mantissa));
    out.push_str(exponent);
    out
}
