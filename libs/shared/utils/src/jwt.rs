use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JwtError {
    #[error("JWT secret is not set")]
    MissingSecret,
    #[error("Invalid token format")]
    Malformed,
    #[error("Invalid signature encoding")]
    SignatureEncoding,
    #[error("Invalid token signature")]
    BadSignature,
    #[error("Invalid claims encoding")]
    ClaimsEncoding,
    #[error("Invalid claims format")]
    ClaimsFormat,
    #[error("Token expired")]
    Expired,
}

fn split_token(token: &str) -> Result<(&str, &str, &str), JwtError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(claims), Some(signature), None) => Ok((header, claims, signature)),
        _ => Err(JwtError::Malformed),
    }
}

fn decode_claims(claims_b64: &str) -> Result<JwtClaims, JwtError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| JwtError::ClaimsEncoding)?;
    let json = String::from_utf8(bytes).map_err(|_| JwtError::ClaimsEncoding)?;

    serde_json::from_str(&json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        JwtError::ClaimsFormat
    })
}

/// Verifies an HS256 token issued by the auth backend and maps its claims to a [`User`].
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, JwtError> {
    if jwt_secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let (header_b64, claims_b64, signature_b64) = split_token(token)?;

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        JwtError::SignatureEncoding
    })?;

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| JwtError::MissingSecret)?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(JwtError::BadSignature);
    }

    let claims = decode_claims(claims_b64)?;

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err(JwtError::Expired);
        }
    }

    let created_at = claims
        .iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let user = User {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        metadata: claims.user_metadata,
        created_at,
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

/// Reads `exp` without checking the signature. Only for tokens just received from the backend.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let (_, claims_b64, _) = split_token(token).ok()?;
    let exp = decode_claims(claims_b64).ok()?.exp?;
    Utc.timestamp_opt(exp as i64, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{JwtTestUtils, TestUser};
    use assert_matches::assert_matches;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_valid_token_maps_claims() {
        let user = TestUser::doctor("doc@example.com");
        let token = JwtTestUtils::create_test_token(&user, SECRET, Some(1));

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated.id, user.id);
        assert_eq!(validated.email.as_deref(), Some("doc@example.com"));
        assert_eq!(validated.role.as_deref(), Some("doctor"));
        assert!(validated.created_at.is_some());
    }

    #[test]
    fn test_rejections() {
        let user = TestUser::default();

        assert_matches!(validate_token("x.y.z", ""), Err(JwtError::MissingSecret));
        assert_matches!(validate_token("only.two", SECRET), Err(JwtError::Malformed));
        assert_matches!(validate_token("a.b.c.d", SECRET), Err(JwtError::Malformed));
        assert_matches!(
            validate_token(&JwtTestUtils::create_invalid_signature_token(&user), SECRET),
            Err(JwtError::BadSignature)
        );
        assert_matches!(
            validate_token(&JwtTestUtils::create_expired_token(&user, SECRET), SECRET),
            Err(JwtError::Expired)
        );
    }

    #[test]
    fn test_token_expiry_reads_exp() {
        let user = TestUser::default();
        let token = JwtTestUtils::create_test_token(&user, SECRET, Some(2));

        let expiry = token_expiry(&token).unwrap();
        let remaining = expiry - Utc::now();
        assert!(remaining > chrono::Duration::minutes(110));
        assert!(remaining <= chrono::Duration::hours(2));

        assert!(token_expiry("garbage").is_none());
    }
}
