use thiserror::Error;

use shared_models::error::AppError;

use crate::i18n::{classify_backend_message, translate, Locale, MessageKey};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Raw text from the auth backend; classified when shown to the user.
    #[error("{0}")]
    Backend(String),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password does not meet requirements")]
    WeakPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session expired")]
    SessionExpired,

    #[error("Two-factor challenge not found")]
    ChallengeNotFound,

    #[error("Two-factor challenge expired")]
    ChallengeExpired,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("Too many verification attempts")]
    TooManyAttempts,

    #[error("Organization not found: {0}")]
    OrganizationNotFound(String),

    #[error("Profile not found for user {0}")]
    ProfileNotFound(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Backend(err.to_string())
    }
}

impl AuthError {
    pub fn message_key(&self) -> MessageKey {
        match self {
            AuthError::Backend(message) => classify_backend_message(message),
            AuthError::InvalidEmail => MessageKey::InvalidEmail,
            AuthError::WeakPassword => MessageKey::WeakPassword,
            AuthError::PasswordMismatch => MessageKey::PasswordMismatch,
            AuthError::MissingField(_) => MessageKey::MissingField,
            AuthError::SessionNotFound => MessageKey::SessionNotFound,
            AuthError::SessionExpired => MessageKey::SessionExpired,
            // an unknown challenge id behaves like an expired one from the user's side
            AuthError::ChallengeNotFound | AuthError::ChallengeExpired => MessageKey::ChallengeExpired,
            AuthError::InvalidCode => MessageKey::InvalidCode,
            AuthError::TooManyAttempts => MessageKey::TooManyAttempts,
            AuthError::OrganizationNotFound(_) => MessageKey::OrganizationNotFound,
            AuthError::ProfileNotFound(_) => MessageKey::ProfileNotFound,
        }
    }

    /// HTTP error carrying the localized message.
    pub fn into_app_error(self, locale: Locale) -> AppError {
        let key = self.message_key();
        let message = translate(key, locale).to_string();

        match key {
            MessageKey::InvalidCredentials
            | MessageKey::EmailNotConfirmed
            | MessageKey::SessionExpired
            | MessageKey::SessionNotFound
            | MessageKey::ChallengeExpired
            | MessageKey::InvalidCode
            | MessageKey::TooManyAttempts => AppError::Auth(message),
            MessageKey::UserAlreadyRegistered => AppError::Conflict(message),
            MessageKey::WeakPassword
            | MessageKey::InvalidEmail
            | MessageKey::PasswordMismatch
            | MessageKey::MissingField => AppError::ValidationError(message),
            MessageKey::RateLimited => AppError::BadRequest(message),
            MessageKey::OrganizationNotFound | MessageKey::ProfileNotFound => AppError::NotFound(message),
            MessageKey::NetworkError | MessageKey::Generic => AppError::ExternalService(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_backend_error_is_localized() {
        let err = AuthError::Backend("API error (400): Invalid login credentials".to_string());
        assert_matches!(
            err.into_app_error(Locale::Es),
            AppError::Auth(msg) if msg == "Correo electrónico o contraseña incorrectos."
        );
    }

    #[test]
    fn test_unknown_backend_error_falls_through_to_generic() {
        let err = AuthError::Backend("API error (500): boom".to_string());
        assert_matches!(
            err.into_app_error(Locale::En),
            AppError::ExternalService(msg) if msg == "Something went wrong. Please try again."
        );
    }

    #[test]
    fn test_domain_errors_map_to_status_families() {
        assert_matches!(AuthError::PasswordMismatch.into_app_error(Locale::En), AppError::ValidationError(_));
        assert_matches!(AuthError::SessionExpired.into_app_error(Locale::En), AppError::Auth(_));
        assert_matches!(
            AuthError::OrganizationNotFound("x".into()).into_app_error(Locale::En),
            AppError::NotFound(_)
        );
        assert_matches!(
            AuthError::Backend("User already registered".into()).into_app_error(Locale::En),
            AppError::Conflict(_)
        );
    }
}
