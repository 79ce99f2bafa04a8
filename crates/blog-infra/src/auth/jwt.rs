//! HS256 access tokens for authors.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_core::ports::{AccessToken, AuthError, TokenClaims, TokenService};

/// Secret used when none is configured. Only acceptable for local runs.
pub const DEFAULT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl JwtConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "blog".to_string(),
        }
    }
}

/// Registered claims plus the author's email.
#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    sub: Uuid,
    email: String,
    iat: i64,
    exp: i64,
    iss: String,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: TimeDelta,
    issuer: String,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let lifetime = TimeDelta::try_hours(config.expiration_hours).unwrap_or_else(|| {
            let fallback = JwtConfig::default().expiration_hours;
            tracing::warn!(
                expiration_hours = config.expiration_hours,
                fallback,
                "Token lifetime out of range, using default"
            );
            TimeDelta::hours(fallback)
        });

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            lifetime,
            issuer: config.issuer,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: Uuid, email: &str) -> Result<AccessToken, AuthError> {
        let now = Utc::now();
        let payload = Payload {
            sub: user_id,
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            iss: self.issuer.clone(),
        };

        let value = encode(&Header::default(), &payload, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(AccessToken {
            value,
            lifetime_secs: self.lifetime.num_seconds(),
        })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data =
            decode::<Payload>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::Malformed(e.to_string()),
                }
            })?;

        let expires_at = DateTime::from_timestamp(data.claims.exp, 0)
            .ok_or_else(|| AuthError::Malformed("exp out of range".to_string()))?;

        Ok(TokenClaims {
            user_id: data.claims.sub,
            email: data.claims.email,
            expires_at,
        })
    }
}
