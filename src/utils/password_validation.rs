use regex::Regex;
use std::sync::OnceLock;

use crate::utils::error::CustomError;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_pattern() -> Result<&'static Regex, CustomError> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    if let Some(pattern) = EMAIL.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(EMAIL_PATTERN).map_err(|e| {
        log::error!("Email pattern failed to compile: {}", e);
        CustomError::InternalServerError("Email validation is unavailable".to_string())
    })?;
    Ok(EMAIL.get_or_init(|| pattern))
}

pub fn validate_email(email: &str) -> Result<(), CustomError> {
    if !email_pattern()?.is_match(email) {
        return Err(CustomError::ValidationError(
            "Invalid email format".to_string(),
        ));
    }
    Ok(())
}

/// At least 8 characters, letters and digits only, with at least one of each.
pub fn validate_password(password: &str) -> Result<(), CustomError> {
    let only_alphanumeric = password.chars().all(|c| c.is_ascii_alphanumeric());
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if password.len() < 8 || !only_alphanumeric || !has_letter || !has_digit {
        return Err(CustomError::ValidationError(
            "Password must be at least 8 characters with letters and numbers".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_letters_and_digits() {
        assert!(validate_password("abcd1234").is_ok());
        assert!(validate_password("Password9").is_ok());
    }

    #[test]
    fn rejects_weak_passwords() {
        assert!(validate_password("short1").is_err());
        assert!(validate_password("lettersonly").is_err());
        assert!(validate_password("123456789").is_err());
        assert!(validate_password("with space1").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane@example").is_err());
        assert!(validate_email("jane example.com").is_err());
    }

    #[test]
    fn email_pattern_compiles_once() {
        let first = email_pattern().unwrap();
        let second = email_pattern().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(matches!(
            validate_email("@example.com"),
            Err(CustomError::ValidationError(_))
        ));
    }
}
