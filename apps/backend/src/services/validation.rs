//! Input normalisation and checks shared by the auth operations.

use unicode_normalization::UnicodeNormalization;

use crate::errors::domain::{DomainError, InputField};

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_BYTES: usize = 1024;
pub const MAX_EMAIL_BYTES: usize = 254;
pub const MAX_PROFILE_CHARS: usize = 256;

/// Trim, NFKC-normalise and lowercase so that visually identical addresses
/// compare equal.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Normalise `email` and check it has the shape `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = normalize_email(email);
    let invalid = |detail: &str| DomainError::invalid_input(InputField::Email, detail);

    if email.is_empty() {
        return Err(invalid("email is required"));
    }
    if email.len() > MAX_EMAIL_BYTES {
        return Err(invalid("email is too long"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("email must not contain whitespace"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("email must contain '@'"));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("email is malformed"));
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(email),
        _ => Err(invalid("email domain is malformed")),
    }
}

/// Registration password policy.
pub fn validate_new_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(DomainError::invalid_input(
            InputField::Password,
            format!("password must be at least {MIN_PASSWORD_CHARS} characters"),
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(DomainError::invalid_input(
            InputField::Password,
            "password is too long",
        ));
    }
    Ok(())
}

/// Trimmed, non-empty, bounded profile text.
pub fn validate_profile_field(name: &str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::invalid_input(
            InputField::Profile,
            format!("{name} is required"),
        ));
    }
    if value.chars().count() > MAX_PROFILE_CHARS {
        return Err(DomainError::invalid_input(
            InputField::Profile,
            format!("{name} must be at most {MAX_PROFILE_CHARS} characters"),
        ));
    }
    Ok(value.to_string())
}

pub fn validate_radius(radius_km: f64) -> Result<f64, DomainError> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(DomainError::invalid_input(
            InputField::Radius,
            "radius must be a finite, non-negative number of kilometres",
        ));
    }
    Ok(radius_km)
}
