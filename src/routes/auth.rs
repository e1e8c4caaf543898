use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::AuthSettings;

/// Bearer token failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Session claims; the user id may arrive as `sub` or `userId`, as a
/// number or a numeric string
#[derive(Debug, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<Value>,
    #[serde(default, rename = "userId", alias = "user_id", alias = "id")]
    pub user_id: Option<Value>,
    pub exp: u64,
}

impl Claims {
    pub fn user_id(&self) -> Option<u64> {
        self.user_id
            .as_ref()
            .or(self.sub.as_ref())
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
    }
}

/// HS256 verifier for session tokens issued by the auth service
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation.leeway = 60;

        Self {
            key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verify a raw token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> Result<u64, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        data.claims
            .user_id()
            .ok_or_else(|| AuthError::InvalidToken("token carries no user id".to_string()))
    }

    /// Verify the `Authorization: Bearer` header of a request
    pub fn authenticate(&self, req: &HttpRequest) -> Result<u64, AuthError> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.verify(token)
    }
}
