use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use time::{macros::format_description, Date, OffsetDateTime};

// `YYYY-MM-DD` (de)serialization for `time::Date` fields in DTOs and rows.
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Per-field validation errors. The first error reported for a field wins;
/// later issues on an already-failed field are dropped.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Return `value` when no errors were collected, otherwise the errors.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

/// Trimmed, non-empty string or a field error.
pub fn required(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, message);
    }
    trimmed.to_string()
}

pub fn max_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(field, format!("Must be at most {max} characters long"));
    }
}

/// Parse a `YYYY-MM-DD` date, recording a field error on failure.
pub fn parse_date(errors: &mut FieldErrors, field: &str, value: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    match Date::parse(value.trim(), &format) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, "Invalid date, expected YYYY-MM-DD");
            None
        }
    }
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Minimum strength score a password must reach. Scores are estimated
/// entropy bits (charset size ^ length), discounted when the password
/// contains the owner's own name or email local part.
pub const MIN_PASSWORD_SCORE: u32 = 40;

pub fn password_score(password: &str, identity: &[&str]) -> u32 {
    let mut charset = 0u32;
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        charset += 26;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        charset += 26;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        charset += 10;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        charset += 32;
    }
    let mut bits = (password.chars().count() as f64 * f64::from(charset.max(1)).log2()) as u32;

    // Knowing their own name buys an attacker most of the password.
    let lowered = password.to_lowercase();
    for part in identity {
        let part = part.trim().to_lowercase();
        let part = part.split('@').next().unwrap_or("");
        if part.len() >= 3 && lowered.contains(part) {
            bits /= 3;
        }
    }
    bits
}

/// Full password check: length first, then the strength heuristic. The two
/// failures carry distinct messages.
pub fn check_password(errors: &mut FieldErrors, password: &str, identity: &[&str]) {
    if password.chars().count() < 8 {
        errors.push("password", "Password must be at least 8 characters long");
        return;
    }
    if password_score(password, identity) < MIN_PASSWORD_SCORE {
        errors.push("password", "Password is too weak");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_wins_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("email", "Email is required");
        errors.push("email", "Invalid email");
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[test]
    fn into_result_returns_value_when_clean() {
        let errors = FieldErrors::new();
        assert_eq!(errors.into_result(42), Ok(42));
    }

    #[test]
    fn into_result_returns_errors_when_dirty() {
        let mut errors = FieldErrors::new();
        errors.push("title", "Title is required");
        let err = errors.into_result(42).unwrap_err();
        assert_eq!(err.get("title"), Some("Title is required"));
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn phone_validation() {
        assert!(is_valid_phone("9812345678"));
        assert!(is_valid_phone("+9779812345678"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("not a phone"));
    }

    #[test]
    fn parse_date_accepts_iso_and_rejects_garbage() {
        let mut errors = FieldErrors::new();
        assert!(parse_date(&mut errors, "deadline", "2030-01-15").is_some());
        assert!(errors.is_empty());

        assert!(parse_date(&mut errors, "deadline", "15/01/2030").is_none());
        assert_eq!(errors.get("deadline"), Some("Invalid date, expected YYYY-MM-DD"));
    }

    #[test]
    fn short_password_gets_length_message() {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "abc", &[]);
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters long")
        );
    }

    #[test]
    fn password_containing_own_name_is_weak() {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "sulav1234", &["Sulav", "Maharjan"]);
        assert_eq!(errors.get("password"), Some("Password is too weak"));
    }

    #[test]
    fn strong_password_passes() {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "tr0ub4dor&Staple!", &["Sulav", "Maharjan"]);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn strength_message_differs_from_length_message() {
        let mut short = FieldErrors::new();
        check_password(&mut short, "abc", &[]);
        let mut weak = FieldErrors::new();
        check_password(&mut weak, "aaaaaaaa", &[]);
        assert_ne!(short.get("password"), weak.get("password"));
    }
}
