use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};
use crate::utils::crypto::verify_password;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Checks the single admin account and issues/validates its bearer tokens.
#[derive(Clone)]
pub struct AuthService {
    admin_username: String,
    admin_password_hash: String,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        admin_username: String,
        admin_password_hash: String,
        jwt_secret: String,
        token_ttl: Duration,
    ) -> Self {
        Self {
            admin_username,
            admin_password_hash,
            jwt_secret,
            token_ttl,
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken> {
        let username_ok: bool = username
            .as_bytes()
            .ct_eq(self.admin_username.as_bytes())
            .into();
        let password_ok = verify_password(password, &self.admin_password_hash).map_err(|e| {
            tracing::error!(error = %e, "stored admin password hash is unusable");
            Error::Internal("Authentication is misconfigured".to_string())
        })?;

        if !(username_ok && password_ok) {
            tracing::warn!(username, "rejected admin login");
            return Err(invalid_credentials());
        }

        let expires_at = Utc::now() + self.token_ttl;
        let claims = Claims {
            sub: self.admin_username.clone(),
            exp: expires_at.timestamp() as usize,
            role: Some(ADMIN_ROLE.to_string()),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))?;

        tracing::info!(username, "admin logged in");
        Ok(IssuedToken { token, expires_at })
    }

    /// Decodes a bearer token and requires the admin role.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| Error::Unauthorized("invalid_token".to_string()))?;

        let role = data.claims.role.clone().unwrap_or_default();
        if !role.eq_ignore_ascii_case(ADMIN_ROLE) {
            return Err(Error::Unauthorized("forbidden".to_string()));
        }
        Ok(data.claims)
    }
}

fn invalid_credentials() -> Error {
    Error::Unauthorized("Invalid username or password".to_string())
}
