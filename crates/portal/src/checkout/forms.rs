//! Payment input normalization.
//!
//! Pure string transforms with no hidden state: strip non-digits, truncate
//! to the field's cap, and re-group for display. Applied server-side before
//! the payment request is built so the payments service always sees
//! canonical values no matter what the form submitted.

/// Maximum digits in a card number.
const CARD_NUMBER_MAX_DIGITS: usize = 16;

/// Digits shown per group in a formatted card number.
const CARD_GROUP_SIZE: usize = 4;

/// Maximum digits in a CVV.
const CVV_MAX_DIGITS: usize = 4;

/// Exact length of an ABA routing number.
const ROUTING_MAX_DIGITS: usize = 9;

/// Keep only ASCII digits, truncated to `max` when given.
fn digits(input: &str, max: Option<usize>) -> String {
    let iter = input.chars().filter(char::is_ascii_digit);
    match max {
        Some(max) => iter.take(max).collect(),
        None => iter.collect(),
    }
}

/// Format a card number into space-separated 4-digit groups, capped at 16
/// digits.
///
/// `"4242-4242 4242abcd4242"` becomes `"4242 4242 4242 4242"`.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let stripped = digits(input, Some(CARD_NUMBER_MAX_DIGITS));
    let groups: Vec<String> = stripped
        .as_bytes()
        .chunks(CARD_GROUP_SIZE)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect();
    groups.join(" ")
}

/// A card number with display grouping removed, ready for the wire.
#[must_use]
pub fn card_number_digits(input: &str) -> String {
    digits(input, Some(CARD_NUMBER_MAX_DIGITS))
}

/// Normalize an expiry to `MM/YY`.
///
/// Two or more digits get the slash inserted after the month; fewer pass
/// through unchanged so partial input is not mangled while typing.
#[must_use]
pub fn format_expiry(input: &str) -> String {
    let stripped = digits(input, Some(4));
    match (stripped.get(..2), stripped.get(2..)) {
        (Some(month), Some(year)) => format!("{month}/{year}"),
        _ => stripped,
    }
}

/// Digits-only CVV, capped at four digits.
#[must_use]
pub fn normalize_cvv(input: &str) -> String {
    digits(input, Some(CVV_MAX_DIGITS))
}

/// Digits-only routing number, capped at nine digits.
#[must_use]
pub fn normalize_routing_number(input: &str) -> String {
    digits(input, Some(ROUTING_MAX_DIGITS))
}

/// Digits-only account number, uncapped.
#[must_use]
pub fn normalize_account_number(input: &str) -> String {
    digits(input, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_groups_in_fours() {
        assert_eq!(
            format_card_number("4242424242424242"),
            "4242 4242 4242 4242"
        );
    }

    #[test]
    fn test_card_number_strips_non_digits() {
        assert_eq!(
            format_card_number("4242-4242 4242abcd4242"),
            "4242 4242 4242 4242"
        );
    }

    #[test]
    fn test_card_number_truncates_past_sixteen() {
        assert_eq!(
            format_card_number("42424242424242429999"),
            "4242 4242 4242 4242"
        );
    }

    #[test]
    fn test_card_number_partial_input() {
        assert_eq!(format_card_number("42424"), "4242 4");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_card_number_digits_for_wire() {
        assert_eq!(card_number_digits("4242 4242 4242 4242"), "4242424242424242");
    }

    #[test]
    fn test_expiry_inserts_slash() {
        assert_eq!(format_expiry("1228"), "12/28");
        assert_eq!(format_expiry("12/28"), "12/28");
    }

    #[test]
    fn test_expiry_partial_input() {
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12/");
    }

    #[test]
    fn test_expiry_truncates_extra_digits() {
        assert_eq!(format_expiry("122834"), "12/28");
    }

    #[test]
    fn test_cvv_caps_at_four() {
        assert_eq!(normalize_cvv("12345"), "1234");
        assert_eq!(normalize_cvv("1a2b3"), "123");
    }

    #[test]
    fn test_routing_caps_at_nine() {
        assert_eq!(normalize_routing_number("110000000123"), "110000000");
    }

    #[test]
    fn test_account_number_uncapped() {
        assert_eq!(normalize_account_number("000123456789000"), "000123456789000");
        assert_eq!(normalize_account_number("00-0123"), "000123");
    }
}
