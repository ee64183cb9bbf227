//! Bearer token inspection
//!
//! Tokens are issued and verified by the backend. The portal only reads the
//! claims it needs locally (who signed in, and when the token lapses), so
//! signatures are not checked here.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims the portal reads from a token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    #[serde(default, alias = "id", alias = "userId")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Tokens without an `exp` claim never lapse locally
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
}

/// Read the claims of `token` without verifying its signature
pub fn inspect_token(token: &str) -> Result<Claims, TokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Missing);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| TokenError::Invalid(e.to_string()))?;
    Ok(data.claims)
}

/// Like [`inspect_token`], but rejects a token whose `exp` has passed
pub fn inspect_live_token(token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    let claims = inspect_token(token)?;
    if claims.is_expired_at(now) {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, rest) = authorization.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(rest.trim()).filter(|t| !t.is_empty())
    } else {
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub(crate) fn token_for(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"backend-secret-the-portal-never-sees"),
        )
        .unwrap()
    }

    #[test]
    fn test_inspect_reads_claims() {
        let claims = Claims {
            sub: Some("u1".into()),
            exp: Some(4_102_444_800),
            iat: Some(1_700_000_000),
            email: Some("asha@ayursutra.in".into()),
            name: Some("Asha Menon".into()),
            role: Some("admin".into()),
        };
        let read = inspect_token(&token_for(&claims)).unwrap();
        assert_eq!(read, claims);
        assert_eq!(read.expires_at().unwrap().timestamp(), 4_102_444_800);
    }

    #[test]
    fn test_expired_token_rejected_by_live_check() {
        let claims = Claims {
            sub: Some("u1".into()),
            exp: Some(1_000),
            ..Default::default()
        };
        let token = token_for(&claims);
        assert!(inspect_token(&token).is_ok());
        assert!(matches!(
            inspect_live_token(&token, Utc::now()),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_token_without_exp_never_expires() {
        let claims = Claims {
            sub: Some("u1".into()),
            ..Default::default()
        };
        assert!(!claims.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_garbage_and_empty_tokens() {
        assert!(matches!(inspect_token("   "), Err(TokenError::Missing)));
        assert!(matches!(inspect_token("not-a-jwt"), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
