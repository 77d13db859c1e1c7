// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs. Expiry is checked against an injected [`Clock`]
//! with zero leeway instead of jsonwebtoken's built-in wall-clock check.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::claims::{IdentityClaims, TokenClaims};
use super::clock::{Clock, SystemClock};

/// Secret used when none is configured.
pub const FALLBACK_SECRET: &str = "supersecretkey";

/// Default token lifetime in days.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 14;

/// Longest accepted token lifetime in days.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3_650;

const SECS_PER_DAY: i64 = 86_400;

// =============================================================================
// TokenError
// =============================================================================

/// Token codec failures.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token string could not be parsed.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token is past its expiry.
    #[error("token expired")]
    Expired,

    /// The signature does not match the payload.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Signing failed.
    #[error("failed to encode token: {0}")]
    Encode(String),

    /// No secret configured and the fallback is disallowed.
    #[error("JWT secret is not configured")]
    MissingSecret,

    /// Configured lifetime outside one day to [`MAX_TOKEN_TTL_DAYS`].
    #[error("token lifetime of {0}s is out of range (1 to {MAX_TOKEN_TTL_DAYS} days)")]
    InvalidLifetime(i64),
}

impl TokenError {
    /// Short tag for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed(_) => "malformed",
            TokenError::Expired => "expired",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Encode(_) => "encode",
            TokenError::MissingSecret => "missing_secret",
            TokenError::InvalidLifetime(_) => "invalid_lifetime",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

// =============================================================================
// JwtConfig
// =============================================================================

/// Token codec configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Signing secret. Falls back to [`FALLBACK_SECRET`] when absent.
    #[serde(skip_serializing)]
    pub secret: Option<String>,

    /// Refuse to start without an explicit secret.
    pub require_secret: bool,

    /// Token lifetime in seconds.
    pub token_ttl_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            require_secret: false,
            token_ttl_secs: DEFAULT_TOKEN_TTL_DAYS * SECS_PER_DAY,
        }
    }
}

impl JwtConfig {
    /// Creates a configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Sets whether an explicit secret is mandatory.
    pub fn with_require_secret(mut self, require: bool) -> Self {
        self.require_secret = require;
        self
    }

    /// Sets the token lifetime in days.
    ///
    /// Out-of-range values are kept and rejected by [`JwtConfig::token_ttl`].
    pub fn with_token_ttl_days(mut self, days: i64) -> Self {
        self.token_ttl_secs = days.saturating_mul(SECS_PER_DAY);
        self
    }

    /// Returns the validated token lifetime.
    pub fn token_ttl(&self) -> Result<Duration, TokenError> {
        let secs = self.token_ttl_secs;
        if !(SECS_PER_DAY..=MAX_TOKEN_TTL_DAYS * SECS_PER_DAY).contains(&secs) {
            return Err(TokenError::InvalidLifetime(secs));
        }
        Duration::try_seconds(secs).ok_or(TokenError::InvalidLifetime(secs))
    }

    /// Returns the secret to sign with.
    pub fn resolve_secret(&self) -> Result<String, TokenError> {
        match self.secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Ok(secret.to_string()),
            None if self.require_secret => Err(TokenError::MissingSecret),
            None => {
                tracing::warn!("JWT_SECRET is not set, signing tokens with the built-in fallback secret");
                Ok(FALLBACK_SECRET.to_string())
            }
        }
    }
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec from configuration and a time source.
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        let ttl = config.token_ttl()?;
        let secret = config.resolve_secret()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
            ttl,
            clock,
        })
    }

    /// Creates a codec on the system clock.
    pub fn with_system_clock(config: &JwtConfig) -> Result<Self, TokenError> {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Signs `identity` into a token valid for the configured lifetime.
    pub fn issue(&self, identity: &IdentityClaims) -> Result<String, TokenError> {
        let now = self.clock.now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Encode("expiry is out of range".to_string()))?;
        let claims = TokenClaims {
            identity: identity.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: uuid::Uuid::now_v7().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }

    /// Returns the configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
