//! # Validation Module
//!
//! Field validators and progressive input formatters for the enrollment
//! wizard.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Field Lifecycle                                    │
//! │                                                                         │
//! │  Keystroke ──► formatter (phone, card, expiry, cvc) ──► stored value    │
//! │                                                                         │
//! │  Blur ───────► field marked touched ──► validator ──► error map         │
//! │                                                                         │
//! │  Change ─────► validator runs ONLY if field already touched             │
//! │                                                                         │
//! │  Next/Submit ► every field of the step forced touched ──► validators    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators are pure: they classify a value and never mutate anything.
//! The wizard decides when to run them and owns the resulting errors.
//!
//! ## Usage
//! ```rust
//! use academy_core::validation::{format_phone, validate_phone};
//!
//! let phone = format_phone("555.123.4567");
//! assert_eq!(phone, "(555) 123-4567");
//! assert!(validate_phone(&phone).is_ok());
//! ```

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationResult};

/// Minimum trimmed length for athlete and parent names.
pub const MIN_NAME_LEN: usize = 2;

/// Length of a fully formatted phone number: `(XXX) XXX-XXXX`.
pub const PHONE_FORMATTED_LEN: usize = 14;

/// Digits in a complete card number; input is capped here too.
pub const CARD_DIGITS: usize = 16;

/// Fewest digits a CVC may have.
pub const MIN_CVC_DIGITS: usize = 3;

const MAX_CVC_DIGITS: usize = 4;
const PHONE_DIGITS: usize = 10;
const EXPIRY_DIGITS: usize = 4;

// =============================================================================
// Field Labels
// =============================================================================

pub const ATHLETE_NAME: &str = "Athlete name";
pub const DATE_OF_BIRTH: &str = "Date of birth";
pub const PARENT_NAME: &str = "Parent name";
pub const EMAIL: &str = "Email";
pub const PHONE: &str = "Phone";
pub const CARD_NUMBER: &str = "Card number";
pub const EXPIRY: &str = "Expiry";
pub const CVC: &str = "CVC";
pub const WAIVER_SIGNATURE: &str = "Signature";

// =============================================================================
// Name Validators
// =============================================================================

fn validate_name(name: &str, field: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min: MIN_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an athlete's full name.
///
/// ## Rules
/// - Must not be blank
/// - At least 2 characters after trimming
///
/// ## Example
/// ```rust
/// use academy_core::validation::validate_athlete_name;
///
/// assert!(validate_athlete_name("Mia Doe").is_ok());
/// assert!(validate_athlete_name("   ").is_err());
/// assert!(validate_athlete_name(" M ").is_err());
/// ```
pub fn validate_athlete_name(name: &str) -> ValidationResult<()> {
    validate_name(name, ATHLETE_NAME)
}

/// Validates the parent's legal name. Same rules as the athlete name.
pub fn validate_parent_name(name: &str) -> ValidationResult<()> {
    validate_name(name, PARENT_NAME)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates a date of birth against `today`.
///
/// No lower or upper age bound is enforced here; session eligibility takes
/// care of that.
pub fn validate_date_of_birth(dob: Option<NaiveDate>, today: NaiveDate) -> ValidationResult<()> {
    let dob = dob.ok_or_else(|| ValidationError::Required {
        field: DATE_OF_BIRTH.to_string(),
    })?;

    if dob > today {
        return Err(ValidationError::FutureDate {
            field: DATE_OF_BIRTH.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Contact Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be blank
/// - `local@domain.tld` shape: no whitespace, exactly one `@`, and a `.`
///   after it with characters on both sides
///
/// ## Example
/// ```rust
/// use academy_core::validation::validate_email;
///
/// assert!(validate_email("jane@x.com").is_ok());
/// assert!(validate_email("jane@localhost").is_err());
/// assert!(validate_email("jane @x.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required {
            field: EMAIL.to_string(),
        });
    }

    if !is_well_formed_email(email) {
        return Err(ValidationError::InvalidFormat {
            field: EMAIL.to_string(),
            reason: "expected name@domain.tld".to_string(),
        });
    }

    Ok(())
}

fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() {
        return false;
    }

    // Needs a dot with at least one character on each side of it.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Validates a formatted phone number.
///
/// ## Rules
/// - Must not be empty
/// - Must be fully formatted: `(XXX) XXX-XXXX` is 14 characters
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: PHONE.to_string(),
        });
    }

    if phone.chars().count() < PHONE_FORMATTED_LEN {
        return Err(ValidationError::Incomplete {
            field: PHONE.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Payment Validators
// =============================================================================

/// Validates a card number (spaces allowed between groups).
///
/// ## Rules
/// - Must not be empty once spaces are removed
/// - At least 16 digits
pub fn validate_card_number(card: &str) -> ValidationResult<()> {
    let digits: String = card.chars().filter(|c| *c != ' ').collect();

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: CARD_NUMBER.to_string(),
        });
    }

    if digits.chars().count() < CARD_DIGITS {
        return Err(ValidationError::TooShort {
            field: CARD_NUMBER.to_string(),
            min: CARD_DIGITS,
        });
    }

    Ok(())
}

/// Validates a card expiry in `MM/YY` form.
///
/// ## Rules
/// - Must not be empty
/// - Exactly two digits, `/`, two digits
/// - Month in 1-12
///
/// Expiry is never compared with today's date, so an already expired card
/// passes here and is left for the payment processor to decline.
pub fn validate_expiry(expiry: &str) -> ValidationResult<()> {
    if expiry.is_empty() {
        return Err(ValidationError::Required {
            field: EXPIRY.to_string(),
        });
    }

    let bytes = expiry.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b'/'
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[3..].iter().all(u8::is_ascii_digit);
    if !well_formed {
        return Err(ValidationError::Format {
            field: EXPIRY.to_string(),
            pattern: "MM/YY".to_string(),
        });
    }

    let month: u32 = expiry[..2].parse().unwrap_or(0);
    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidMonth {
            field: EXPIRY.to_string(),
        });
    }

    Ok(())
}

/// Validates a card security code.
///
/// ## Rules
/// - Must not be empty
/// - At least 3 digits
pub fn validate_cvc(cvc: &str) -> ValidationResult<()> {
    if cvc.is_empty() {
        return Err(ValidationError::Required {
            field: CVC.to_string(),
        });
    }

    if cvc.chars().filter(char::is_ascii_digit).count() < MIN_CVC_DIGITS {
        return Err(ValidationError::TooShort {
            field: CVC.to_string(),
            min: MIN_CVC_DIGITS,
        });
    }

    Ok(())
}

// =============================================================================
// Waiver Validator
// =============================================================================

/// Validates the waiver signature against the parent's name.
///
/// ## Rules
/// - Must not be empty
/// - Case-insensitive match, whitespace exact: nothing is trimmed, so a
///   trailing space is a mismatch
///
/// ## Example
/// ```rust
/// use academy_core::validation::validate_waiver_signature;
///
/// assert!(validate_waiver_signature("John Smith", "john smith").is_ok());
/// assert!(validate_waiver_signature("John Smith ", "John Smith").is_err());
/// ```
pub fn validate_waiver_signature(signature: &str, parent_name: &str) -> ValidationResult<()> {
    if signature.is_empty() {
        return Err(ValidationError::Required {
            field: WAIVER_SIGNATURE.to_string(),
        });
    }

    if signature.to_lowercase() != parent_name.to_lowercase() {
        return Err(ValidationError::SignatureMismatch);
    }

    Ok(())
}

// =============================================================================
// Input Formatters
// =============================================================================

fn digits(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Re-formats raw phone input as `(XXX) XXX-XXXX` while digits are typed.
///
/// ## Example
/// ```rust
/// use academy_core::validation::format_phone;
///
/// assert_eq!(format_phone("555"), "555");
/// assert_eq!(format_phone("55512"), "(555) 12");
/// assert_eq!(format_phone("555-123-45678"), "(555) 123-4567");
/// ```
pub fn format_phone(raw: &str) -> String {
    let d = digits(raw, PHONE_DIGITS);
    match d.len() {
        0..=3 => d,
        4..=6 => format!("({}) {}", &d[..3], &d[3..]),
        _ => format!("({}) {}-{}", &d[..3], &d[3..6], &d[6..]),
    }
}

/// Formats card input as space-separated groups of four digits.
pub fn format_card_number(raw: &str) -> String {
    let d = digits(raw, CARD_DIGITS);
    d.as_bytes()
        .chunks(4)
        .map(|group| String::from_utf8_lossy(group).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats expiry input, inserting `/` after the month digits.
pub fn format_expiry(raw: &str) -> String {
    let d = digits(raw, EXPIRY_DIGITS);
    if d.len() > 2 {
        format!("{}/{}", &d[..2], &d[2..])
    } else {
        d
    }
}

/// Keeps only the digits of a security code.
pub fn format_cvc(raw: &str) -> String {
    digits(raw, MAX_CVC_DIGITS)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn code<T>(result: ValidationResult<T>) -> &'static str {
        match result {
            Ok(_) => "",
            Err(e) => e.code(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_names() {
        assert_eq!(code(validate_athlete_name("Mia Doe")), "");
        assert_eq!(code(validate_athlete_name("Al")), "");
        assert_eq!(code(validate_athlete_name("")), "REQUIRED");
        assert_eq!(code(validate_athlete_name("   ")), "REQUIRED");
        assert_eq!(code(validate_athlete_name(" M ")), "TOO_SHORT");
        assert_eq!(code(validate_parent_name("J")), "TOO_SHORT");
    }

    #[test]
    fn test_validate_date_of_birth() {
        let today = date(2026, 10, 19);
        assert_eq!(code(validate_date_of_birth(None, today)), "REQUIRED");
        assert_eq!(code(validate_date_of_birth(Some(today), today)), "");
        assert_eq!(
            code(validate_date_of_birth(Some(date(2026, 10, 20)), today)),
            "FUTURE_DATE"
        );
        assert_eq!(code(validate_date_of_birth(Some(date(1950, 1, 1)), today)), "");
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(code(validate_email("jane@x.com")), "");
        assert_eq!(code(validate_email("a.b@c.d.e")), "");
        assert_eq!(code(validate_email("")), "REQUIRED");
        assert_eq!(code(validate_email("   ")), "REQUIRED");
        assert_eq!(code(validate_email("jane")), "INVALID_FORMAT");
        assert_eq!(code(validate_email("jane@x")), "INVALID_FORMAT");
        assert_eq!(code(validate_email("jane@x.")), "INVALID_FORMAT");
        assert_eq!(code(validate_email("jane@.com")), "INVALID_FORMAT");
        assert_eq!(code(validate_email("@x.com")), "INVALID_FORMAT");
        assert_eq!(code(validate_email("jane@doe@x.com")), "INVALID_FORMAT");
        assert_eq!(code(validate_email("ja ne@x.com")), "INVALID_FORMAT");
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(code(validate_phone("(555) 123-4567")), "");
        assert_eq!(code(validate_phone("")), "REQUIRED");
        assert_eq!(code(validate_phone("(555) 123-456")), "INCOMPLETE");
    }

    #[test]
    fn test_validate_card_number() {
        assert_eq!(code(validate_card_number("4242 4242 4242 4242")), "");
        assert_eq!(code(validate_card_number("4242424242424242")), "");
        assert_eq!(code(validate_card_number("")), "REQUIRED");
        assert_eq!(code(validate_card_number("   ")), "REQUIRED");
        assert_eq!(code(validate_card_number("4242 4242 4242 424")), "TOO_SHORT");
    }

    #[test]
    fn test_validate_expiry() {
        assert_eq!(code(validate_expiry("12/26")), "");
        assert_eq!(code(validate_expiry("01/20")), ""); // past dates are not checked
        assert_eq!(code(validate_expiry("")), "REQUIRED");
        assert_eq!(code(validate_expiry("1/26")), "FORMAT");
        assert_eq!(code(validate_expiry("1226")), "FORMAT");
        assert_eq!(code(validate_expiry("12/2")), "FORMAT");
        assert_eq!(code(validate_expiry("13/26")), "INVALID_MONTH");
        assert_eq!(code(validate_expiry("00/26")), "INVALID_MONTH");
    }

    #[test]
    fn test_validate_cvc() {
        assert_eq!(code(validate_cvc("123")), "");
        assert_eq!(code(validate_cvc("1234")), "");
        assert_eq!(code(validate_cvc("")), "REQUIRED");
        assert_eq!(code(validate_cvc("12")), "TOO_SHORT");
    }

    #[test]
    fn test_waiver_signature_matching() {
        assert_eq!(code(validate_waiver_signature("John Smith", "john smith")), "");
        assert_eq!(code(validate_waiver_signature("JANE DOE", "Jane Doe")), "");
        assert_eq!(
            code(validate_waiver_signature("John Smith ", "John Smith")),
            "SIGNATURE_MISMATCH"
        );
        assert_eq!(
            code(validate_waiver_signature("John  Smith", "John Smith")),
            "SIGNATURE_MISMATCH"
        );
        assert_eq!(code(validate_waiver_signature("", "John Smith")), "REQUIRED");
    }

    #[test]
    fn test_format_phone_progressively() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("5"), "5");
        assert_eq!(format_phone("555"), "555");
        assert_eq!(format_phone("5551"), "(555) 1");
        assert_eq!(format_phone("555123"), "(555) 123");
        assert_eq!(format_phone("5551234"), "(555) 123-4");
        assert_eq!(format_phone("(555) 123-4567"), "(555) 123-4567");
        assert_eq!(format_phone("555 123 4567 99"), "(555) 123-4567");
        assert_eq!(format_phone("abc"), "");
    }

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4242"), "4242");
        assert_eq!(format_card_number("42424"), "4242 4");
        assert_eq!(format_card_number("4242-4242-4242-4242"), "4242 4242 4242 4242");
        assert_eq!(format_card_number("4242 4242 4242 4242 1"), "4242 4242 4242 4242");
    }

    #[test]
    fn test_format_expiry_and_cvc() {
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12");
        assert_eq!(format_expiry("122"), "12/2");
        assert_eq!(format_expiry("12/26"), "12/26");
        assert_eq!(format_expiry("122699"), "12/26");
        assert_eq!(format_cvc("1a2b3"), "123");
        assert_eq!(format_cvc("123456"), "1234");
    }
}
