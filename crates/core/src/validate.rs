//! Field validation rules.
//!
//! Each rule is a pure predicate over the raw (or masked) input string.
//! The [`crate::types::Field`] table maps these predicates to the
//! human-readable messages shown under each form input, so the
//! per-keystroke path and the per-step path share one rule body.

use chrono::Datelike;

use crate::format::only_digits;

/// The 27 Brazilian federative unit codes.
pub const BR_STATES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Validate a CPF via its two check digits.
///
/// Rejects anything that is not exactly 11 digits or that repeats a single
/// digit (those pass the checksum but are not issued).
#[must_use]
pub fn validate_cpf(document: &str) -> bool {
    let digits: Vec<u32> = only_digits(document)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 11 {
        return false;
    }
    let Some(&first) = digits.first() else {
        return false;
    };
    if digits.iter().all(|&d| d == first) {
        return false;
    }

    check_digit_matches(&digits, 9) && check_digit_matches(&digits, 10)
}

/// Verify the CPF check digit at `position` against the weighted sum of the
/// digits before it (weights `position + 1` down to 2).
fn check_digit_matches(digits: &[u32], position: usize) -> bool {
    let Some(&expected) = digits.get(position) else {
        return false;
    };
    let weight_start = position as u32 + 1;
    let sum: u32 = digits
        .iter()
        .take(position)
        .zip((2..=weight_start).rev())
        .map(|(&d, w)| d * w)
        .sum();
    let mut remainder = (sum * 10) % 11;
    if remainder >= 10 {
        remainder = 0;
    }
    remainder == expected
}

/// Permissive email shape check: non-space text around an `@` and a dot in
/// the domain. Intentionally not RFC validation.
#[must_use]
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty()
        && !host.is_empty()
        && !tld.is_empty()
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
}

/// Phones carry 10 (landline) or 11 (mobile) digits.
#[must_use]
pub fn validate_phone(phone: &str) -> bool {
    let len = only_digits(phone).len();
    (10..=11).contains(&len)
}

/// CEPs carry exactly 8 digits.
#[must_use]
pub fn validate_zipcode(zipcode: &str) -> bool {
    only_digits(zipcode).len() == 8
}

/// Card number length plus the Luhn checksum.
#[must_use]
pub fn validate_card_number(number: &str) -> bool {
    let digits = only_digits(number);
    if !(13..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, mut d)| {
            if i % 2 == 1 {
                d *= 2;
                if d > 9 {
                    d -= 9;
                }
            }
            d
        })
        .sum();

    sum % 10 == 0
}

/// CVVs carry 3 or 4 digits.
#[must_use]
pub fn validate_cvv(cvv: &str) -> bool {
    let len = only_digits(cvv).len();
    (3..=4).contains(&len)
}

/// The card must not be expired as of today, and the month must be a real
/// calendar month.
#[must_use]
pub fn validate_expiration(month: &str, year: &str) -> bool {
    let today = chrono::Local::now().date_naive();
    expiration_valid_at(month, year, today.year(), today.month())
}

fn expiration_valid_at(month: &str, year: &str, current_year: i32, current_month: u32) -> bool {
    if month.trim().is_empty() || year.trim().is_empty() {
        return false;
    }
    let Ok(exp_month) = month.trim().parse::<u32>() else {
        return false;
    };
    let Ok(exp_year) = year.trim().parse::<i32>() else {
        return false;
    };

    if !(1..=12).contains(&exp_month) {
        return false;
    }
    if exp_year < current_year {
        return false;
    }
    !(exp_year == current_year && exp_month < current_month)
}

/// Names need at least 2 characters and only letters, accents and spaces.
#[must_use]
pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.chars().count() >= 2
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphabetic() || ('\u{C0}'..='\u{FF}').contains(&c) || c == ' ')
}

/// Street names need at least 3 characters.
#[must_use]
pub fn validate_street(street: &str) -> bool {
    street.trim().chars().count() >= 3
}

/// Street numbers only need to be non-empty ("s/n" is a valid answer).
#[must_use]
pub fn validate_street_number(number: &str) -> bool {
    !number.trim().is_empty()
}

/// Neighborhoods need at least 2 characters.
#[must_use]
pub fn validate_neighborhood(neighborhood: &str) -> bool {
    neighborhood.trim().chars().count() >= 2
}

/// Cities need at least 2 characters.
#[must_use]
pub fn validate_city(city: &str) -> bool {
    city.trim().chars().count() >= 2
}

/// States must be one of the 27 federative unit codes.
#[must_use]
pub fn validate_state(state: &str) -> bool {
    BR_STATES.contains(&state.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpf_known_valid() {
        assert!(validate_cpf("52998224725"));
        assert!(validate_cpf("529.982.247-25"));
    }

    #[test]
    fn test_cpf_rejects_repeated_digits() {
        for d in 0..=9 {
            let cpf = d.to_string().repeat(11);
            assert!(!validate_cpf(&cpf), "repdigit {cpf} must fail");
        }
    }

    #[test]
    fn test_cpf_rejects_bad_check_digit() {
        assert!(!validate_cpf("52998224726"));
        assert!(!validate_cpf("52998224735"));
    }

    #[test]
    fn test_cpf_rejects_wrong_length() {
        assert!(!validate_cpf("5299822472"));
        assert!(!validate_cpf("529982247255"));
        assert!(!validate_cpf(""));
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("maria@example.com"));
        assert!(validate_email("maria+presente@sub.example.com.br"));
        assert!(!validate_email("maria"));
        assert!(!validate_email("maria@example"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("maria@.com"));
        assert!(!validate_email("maria@example."));
        assert!(!validate_email("maria silva@example.com"));
        assert!(!validate_email("maria@exa mple.com"));
    }

    #[test]
    fn test_phone_lengths() {
        assert!(validate_phone("1133334444"));
        assert!(validate_phone("(11) 98765-4321"));
        assert!(!validate_phone("113333444"));
        assert!(!validate_phone("119876543210"));
    }

    #[test]
    fn test_zipcode_length() {
        assert!(validate_zipcode("01310-100"));
        assert!(!validate_zipcode("01310"));
        assert!(!validate_zipcode("013101000"));
    }

    #[test]
    fn test_luhn_known_numbers() {
        assert!(validate_card_number("4532015112830366"));
        assert!(!validate_card_number("4532015112830367"));
        // Masked input validates the same
        assert!(validate_card_number("4532 0151 1283 0366"));
    }

    #[test]
    fn test_card_number_length_bounds() {
        assert!(!validate_card_number("453201511283"));
        assert!(!validate_card_number("45320151128303661234"));
        // 13-digit Visa test number
        assert!(validate_card_number("4222222222222"));
    }

    #[test]
    fn test_cvv_lengths() {
        assert!(validate_cvv("123"));
        assert!(validate_cvv("1234"));
        assert!(!validate_cvv("12"));
        assert!(!validate_cvv("12345"));
    }

    #[test]
    fn test_expiration_past_year() {
        assert!(!expiration_valid_at("01", "2020", 2026, 8));
    }

    #[test]
    fn test_expiration_current_month_is_valid() {
        assert!(expiration_valid_at("8", "2026", 2026, 8));
        assert!(!expiration_valid_at("7", "2026", 2026, 8));
    }

    #[test]
    fn test_expiration_month_range() {
        assert!(!expiration_valid_at("0", "2030", 2026, 8));
        assert!(!expiration_valid_at("13", "2030", 2026, 8));
        assert!(expiration_valid_at("12", "2030", 2026, 8));
    }

    #[test]
    fn test_expiration_requires_both_parts() {
        assert!(!expiration_valid_at("", "2030", 2026, 8));
        assert!(!expiration_valid_at("12", "", 2026, 8));
        assert!(!expiration_valid_at("ab", "2030", 2026, 8));
    }

    #[test]
    fn test_expiration_against_wall_clock() {
        // Far-future card is always valid; long-past card never is.
        assert!(validate_expiration("12", "2099"));
        assert!(!validate_expiration("01", "2020"));
    }

    #[test]
    fn test_name_accepts_accents() {
        assert!(validate_name("João da Silva"));
        assert!(validate_name("Ana"));
        assert!(!validate_name("A"));
        assert!(!validate_name("Maria 2"));
        assert!(!validate_name("  "));
    }

    #[test]
    fn test_address_lengths() {
        assert!(validate_street("Rua A"));
        assert!(!validate_street("Ru"));
        assert!(validate_street_number("s/n"));
        assert!(!validate_street_number("  "));
        assert!(validate_neighborhood("Sé"));
        assert!(!validate_city("X"));
    }

    #[test]
    fn test_state_membership() {
        assert!(validate_state("SP"));
        assert!(validate_state("TO"));
        assert!(!validate_state("XX"));
        assert!(!validate_state("sp"));
        assert!(!validate_state("S"));
    }
}
