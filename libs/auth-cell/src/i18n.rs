//! User-facing messages for auth failures.
//!
//! Backend errors arrive as free text. They are mapped to a [`MessageKey`] by
//! substring (first rule wins); anything unrecognised becomes
//! [`MessageKey::Generic`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Locale::En),
            "es" => Some(Locale::Es),
            _ => None,
        }
    }

    /// First supported language in an `Accept-Language` header, by q-weight.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, usize, Locale)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, part)| {
                let mut pieces = part.split(';');
                let locale = Locale::parse(pieces.next()?)?;
                let weight = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((weight, position, locale))
            })
            .filter(|(weight, _, _)| *weight > 0.0)
            .collect();

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        candidates.first().map(|(_, _, locale)| *locale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    InvalidCredentials,
    EmailNotConfirmed,
    UserAlreadyRegistered,
    NetworkError,
    WeakPassword,
    RateLimited,
    InvalidEmail,
    PasswordMismatch,
    MissingField,
    SessionExpired,
    SessionNotFound,
    ChallengeExpired,
    InvalidCode,
    TooManyAttempts,
    OrganizationNotFound,
    ProfileNotFound,
    Generic,
}

const BACKEND_RULES: &[(&str, MessageKey)] = &[
    ("Failed to fetch", MessageKey::NetworkError),
    ("NetworkError", MessageKey::NetworkError),
    ("Invalid login credentials", MessageKey::InvalidCredentials),
    ("invalid_grant", MessageKey::InvalidCredentials),
    ("Email not confirmed", MessageKey::EmailNotConfirmed),
    ("User already registered", MessageKey::UserAlreadyRegistered),
    ("already been registered", MessageKey::UserAlreadyRegistered),
    ("Password should be at least", MessageKey::WeakPassword),
    ("Rate limit exceeded", MessageKey::RateLimited),
    ("For security purposes", MessageKey::RateLimited),
    ("Unable to validate email address", MessageKey::InvalidEmail),
];

pub fn classify_backend_message(message: &str) -> MessageKey {
    BACKEND_RULES
        .iter()
        .find(|(pattern, _)| message.contains(pattern))
        .map(|(_, key)| *key)
        .unwrap_or(MessageKey::Generic)
}

pub fn localize_backend_message(message: &str, locale: Locale) -> &'static str {
    translate(classify_backend_message(message), locale)
}

pub fn translate(key: MessageKey, locale: Locale) -> &'static str {
    use MessageKey::*;

    match locale {
        Locale::En => match key {
            InvalidCredentials => "Invalid email or password.",
            EmailNotConfirmed => "Please confirm your email address before signing in.",
            UserAlreadyRegistered => "An account with this email already exists.",
            NetworkError => "Unable to reach the server. Check your connection and try again.",
            WeakPassword => "Password must be at least 8 characters and contain a letter and a number.",
            RateLimited => "Too many requests. Please wait a moment and try again.",
            InvalidEmail => "Please enter a valid email address.",
            PasswordMismatch => "Passwords do not match.",
            MissingField => "Please fill in all required fields.",
            SessionExpired => "Your session has expired. Please sign in again.",
            SessionNotFound => "You are not signed in.",
            ChallengeExpired => "The verification code has expired. Please sign in again.",
            InvalidCode => "The verification code is incorrect.",
            TooManyAttempts => "Too many incorrect codes. Please sign in again.",
            OrganizationNotFound => "The selected organization is not available.",
            ProfileNotFound => "User profile not found.",
            Generic => "Something went wrong. Please try again.",
        },
        Locale::Es => match key {
            InvalidCredentials => "Correo electrónico o contraseña incorrectos.",
            EmailNotConfirmed => "Confirma tu correo electrónico antes de iniciar sesión.",
            UserAlreadyRegistered => "Ya existe una cuenta con este correo electrónico.",
            NetworkError => "No se puede conectar con el servidor. Revisa tu conexión e inténtalo de nuevo.",
            WeakPassword => "La contraseña debe tener al menos 8 caracteres e incluir una letra y un número.",
            RateLimited => "Demasiadas solicitudes. Espera un momento e inténtalo de nuevo.",
            InvalidEmail => "Introduce un correo electrónico válido.",
            PasswordMismatch => "Las contraseñas no coinciden.",
            MissingField => "Completa todos los campos obligatorios.",
            SessionExpired => "Tu sesión ha caducado. Inicia sesión de nuevo.",
            SessionNotFound => "No has iniciado sesión.",
            ChallengeExpired => "El código de verificación ha caducado. Inicia sesión de nuevo.",
            InvalidCode => "El código de verificación es incorrecto.",
            TooManyAttempts => "Demasiados códigos incorrectos. Inicia sesión de nuevo.",
            OrganizationNotFound => "La organización seleccionada no está disponible.",
            ProfileNotFound => "No se encontró el perfil del usuario.",
            Generic => "Algo salió mal. Inténtalo de nuevo.",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_messages_by_substring() {
        assert_eq!(
            classify_backend_message("API error (400 Bad Request): {\"error_description\":\"Invalid login credentials\"}"),
            MessageKey::InvalidCredentials
        );
        assert_eq!(
            classify_backend_message("Failed to fetch: error sending request"),
            MessageKey::NetworkError
        );
        assert_eq!(classify_backend_message("something new"), MessageKey::Generic);
    }

    #[test]
    fn test_first_rule_wins() {
        // a network failure whose text also mentions credentials is still a network failure
        assert_eq!(
            classify_backend_message("Failed to fetch while checking Invalid login credentials"),
            MessageKey::NetworkError
        );
    }

    #[test]
    fn test_localized_strings() {
        assert_eq!(
            localize_backend_message("Email not confirmed", Locale::Es),
            "Confirma tu correo electrónico antes de iniciar sesión."
        );
        assert_eq!(localize_backend_message("???", Locale::En), "Something went wrong. Please try again.");
    }

    #[test]
    fn test_accept_language() {
        assert_eq!(Locale::from_accept_language("es-ES,es;q=0.9,en;q=0.8"), Some(Locale::Es));
        assert_eq!(Locale::from_accept_language("fr-FR, en;q=0.5, es;q=0.7"), Some(Locale::Es));
        assert_eq!(Locale::from_accept_language("de, fr"), None);
        assert_eq!(Locale::from_accept_language("es;q=0, en"), Some(Locale::En));
        assert_eq!(Locale::parse("EN_us"), Some(Locale::En));
    }
}
