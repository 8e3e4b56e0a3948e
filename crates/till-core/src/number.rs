//! # Numeric Coercion
//!
//! Turns the raw text of the quantity and price fields into numbers.
//!
//! The register never rejects a submission: text that is not a number
//! becomes zero. Accepted forms:
//!
//! | Input            | Result |
//! |------------------|--------|
//! | `""`, `"   "`    | 0      |
//! | `" 2 "`          | 2      |
//! | `"3.50"`, `".5"` | 3.50, 0.5 |
//! | `"1.5e2"`        | 150    |
//! | `"0x1F"`         | 31     |
//! | `"abc"`, `"1,5"` | 0      |

use rust_decimal::Decimal;
use std::str::FromStr;

const MAX_EXPONENT: i64 = 28;

/// Coerces operator text into a decimal number, falling back to zero.
///
/// ## Example
/// ```rust
/// use till_core::number::coerce_decimal;
/// use till_core::Decimal;
///
/// assert_eq!(coerce_decimal("2"), Decimal::from(2));
/// assert_eq!(coerce_decimal("two"), Decimal::ZERO);
/// ```
pub fn coerce_decimal(input: &str) -> Decimal {
    parse_number(input).unwrap_or(Decimal::ZERO)
}

/// Strict parse used by the coercion functions. `None` means "not a number".
fn parse_number(input: &str) -> Option<Decimal> {
    let text = input.trim();
    if text.is_empty() {
        return Some(Decimal::ZERO);
    }

    if let Some(value) = parse_radix_literal(text) {
        return Some(value);
    }

    let (mantissa, exponent) = split_exponent(text)?;
    if !is_decimal_literal(mantissa) {
        return None;
    }

    let mantissa = normalize_mantissa(mantissa);
    match exponent {
        None => Decimal::from_str(&mantissa).ok(),
        // Decimal holds at most 28 fractional digits and values below ~7.9e28.
        Some(exp) if exp.abs() > MAX_EXPONENT => None,
        Some(exp) => Decimal::from_scientific(&format!("{}e{}", mantissa, exp)).ok(),
    }
}

/// Unsigned `0x` / `0o` / `0b` integer literals.
fn parse_radix_literal(text: &str) -> Option<Decimal> {
    let lower = text.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else {
        return None;
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok().map(Decimal::from)
}

/// Splits `1.5e-3` into (`1.5`, Some(`-3`)). Returns `None` for a malformed
/// exponent so the whole input is rejected.
fn split_exponent(text: &str) -> Option<(&str, Option<i64>)> {
    match text.find(&['e', 'E'][..]) {
        None => Some((text, None)),
        Some(pos) => {
            let exp_text = &text[pos + 1..];
            let digits = exp_text.strip_prefix(&['+', '-'][..]).unwrap_or(exp_text);
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let exponent = exp_text.trim_start_matches('+').parse::<i64>().ok()?;
            Some((&text[..pos], Some(exponent)))
        }
    }
}

/// Optional sign, then digits with at most one `.`, and at least one digit.
fn is_decimal_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    let mut seen_digit = false;
    let mut seen_dot = false;

    for c in unsigned.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

/// `.5` → `0.5`, `5.` → `5`, keeping the sign.
fn normalize_mantissa(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    let unsigned = unsigned.strip_suffix('.').unwrap_or(unsigned);
    if unsigned.starts_with('.') {
        format!("{}0{}", sign, unsigned)
    } else {
        format!("{}{}", sign, unsigned)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
