use std::sync::OnceLock;

use regex::Regex;

use crate::error::AuthError;
use crate::models::{SignInRequest, SignUpRequest};

pub const MIN_PASSWORD_LENGTH: usize = 8;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
    })
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::MissingField("email"));
    }
    if email.len() > 254 || !email_regex().is_match(email) {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }

    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        Err(AuthError::WeakPassword)
    }
}

/// Sign-in only checks presence; the backend decides on the credentials.
pub fn validate_sign_in(request: &SignInRequest) -> Result<(), AuthError> {
    if request.email.trim().is_empty() {
        return Err(AuthError::MissingField("email"));
    }
    if request.password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }
    Ok(())
}

pub fn validate_sign_up(request: &SignUpRequest) -> Result<(), AuthError> {
    if request.full_name.trim().is_empty() {
        return Err(AuthError::MissingField("full_name"));
    }
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    if request.password != request.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}
