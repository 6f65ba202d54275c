//! JWT verification
//!
//! Tokens are issued by the external identity service; this server only
//! verifies them (HS256, issuer and audience pinned).

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token verification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared HS256 secret (at least 32 bytes)
    pub secret: String,
    /// Pinned issuer
    pub issuer: String,
    /// Pinned audience
    pub audience: String,
}

impl JwtConfig {
    /// Load verification settings from the environment
    ///
    /// In release builds a missing or short `JWT_SECRET` is fatal; in
    /// debug builds a random throwaway secret is generated so the server
    /// can start without any identity service around.
    pub fn from_env() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, generating throwaway key", e);
                    generate_printable_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tablier-identity".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "tablier-api".to_string()),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Claims carried by identity-service tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Stable user id (subject)
    pub sub: String,
    /// Account email, absent for guests
    #[serde(default)]
    pub email: Option<String>,
    /// Role claim; absent claims fall back to the employee record
    #[serde(default)]
    pub role: Option<String>,
    /// Guest flag
    #[serde(default)]
    pub guest: bool,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Load the shared secret from the environment
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => Ok(secret),
        Ok(_) => Err(JwtError::ConfigError(
            "JWT_SECRET must be at least 32 characters long".to_string(),
        )),
        Err(_) => Err(JwtError::ConfigError(
            "JWT_SECRET environment variable not set".to_string(),
        )),
    }
}

/// Generate a printable random secret for development runs
fn generate_printable_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut key = String::with_capacity(64);

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "TablierDevelopmentOnlySecret-ReplaceMe-0123456789".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        if let Some(c) = allowed_chars.chars().nth(idx) {
            key.push(c);
        }
    }

    key
}

/// Verifies and decodes bearer tokens
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            decoding_key,
        }
    }

    /// Verify and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::with_config(JwtConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            issuer: "tablier-identity".to_string(),
            audience: "tablier-api".to_string(),
        }
    }

    fn mint(config: &JwtConfig, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_for(config: &JwtConfig, sub: &str, role: Option<&str>, exp_offset: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: sub.to_string(),
            email: Some(format!("{}@example.test", sub)),
            role: role.map(|r| r.to_string()),
            guest: false,
            exp: now + exp_offset,
            iat: now,
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
        }
    }

    #[test]
    fn test_validate_round_trip() {
        let config = test_config();
        let service = JwtService::with_config(config.clone());
        let token = mint(&config, &claims_for(&config, "u-1", Some("chef"), 600));

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.role.as_deref(), Some("chef"));
        assert!(!claims.guest);
    }

    #[test]
    fn test_expired_token() {
        let config = test_config();
        let service = JwtService::with_config(config.clone());
        let token = mint(&config, &claims_for(&config, "u-1", None, -600));

        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let config = test_config();
        let service = JwtService::with_config(config.clone());
        let mut claims = claims_for(&config, "u-1", None, 600);
        claims.aud = "someone-else".to_string();
        let token = mint(&config, &claims);

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let token = mint(&config, &claims_for(&config, "u-1", None, 600));

        let mut other = test_config();
        other.secret = "ffffffffffffffffffffffffffffffff".to_string();
        let service = JwtService::with_config(other);

        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }
}
