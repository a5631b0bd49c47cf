//! Display masks applied while the buyer types.
//!
//! Every function here is pure and total: input that already carries the
//! mask is re-masked to the same text, and input with more digits than the
//! mask expects is returned unchanged rather than rejected. Validation is
//! a separate concern, handled by [`crate::validate`].

use crate::types::{CurrencyCode, Price};

/// Strip everything that is not an ASCII digit.
#[must_use]
pub fn only_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Mask a CPF as `###.###.###-##`.
///
/// The mask applies once all 11 digits are present; shorter input is
/// returned as bare digits, longer input unchanged.
#[must_use]
pub fn format_document(value: &str) -> String {
    let digits = only_digits(value);
    if digits.len() > 11 {
        return value.to_string();
    }
    if digits.len() < 11 {
        return digits;
    }
    let mut out = String::with_capacity(14);
    for (i, c) in digits.chars().enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Mask a mobile phone as `(##) #####-####`.
///
/// Applies at 11 digits (two-digit area code plus nine-digit number);
/// 10-digit landlines are left as bare digits.
#[must_use]
pub fn format_phone(value: &str) -> String {
    let digits = only_digits(value);
    if digits.len() > 11 {
        return value.to_string();
    }
    if digits.len() < 11 {
        return digits;
    }
    let mut out = String::with_capacity(15);
    out.push('(');
    for (i, c) in digits.chars().enumerate() {
        match i {
            2 => out.push_str(") "),
            7 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Mask a CEP as `#####-###`.
#[must_use]
pub fn format_zipcode(value: &str) -> String {
    let digits = only_digits(value);
    if digits.len() > 8 {
        return value.to_string();
    }
    if digits.len() < 8 {
        return digits;
    }
    let mut out = String::with_capacity(9);
    for (i, c) in digits.chars().enumerate() {
        if i == 5 {
            out.push('-');
        }
        out.push(c);
    }
    out
}

/// Group a card number into blocks of four digits.
///
/// Unlike the fixed-width masks, grouping is progressive: it applies to
/// partial input as well, up to 16 digits.
#[must_use]
pub fn format_card_number(value: &str) -> String {
    let digits = only_digits(value);
    if digits.len() > 16 {
        return value.to_string();
    }
    let mut out = String::with_capacity(19);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Mask a combined expiration field as `MM/YY` once 4 digits are present.
#[must_use]
pub fn format_expiration(value: &str) -> String {
    let digits = only_digits(value);
    if digits.len() > 4 {
        return value.to_string();
    }
    if digits.len() < 4 {
        return digits;
    }
    let mut out = String::with_capacity(5);
    for (i, c) in digits.chars().enumerate() {
        if i == 2 {
            out.push('/');
        }
        out.push(c);
    }
    out
}

/// Render an amount in centavos as pt-BR currency text, e.g. `"R$ 59,90"`.
#[must_use]
pub fn format_currency(cents: i64) -> String {
    Price::from_cents(cents, CurrencyCode::BRL).display()
}
