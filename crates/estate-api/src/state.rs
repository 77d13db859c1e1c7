// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{Clock, SystemClock, TokenCodec};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::store::{InMemoryUserStore, UserStore};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token codec.
    pub codec: Arc<TokenCodec>,
    /// Account store.
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Returns the account store.
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    codec: Option<Arc<TokenCodec>>,
    clock: Option<Arc<dyn Clock>>,
    users: Option<Arc<dyn UserStore>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            codec: None,
            clock: None,
            users: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a prebuilt token codec. Overrides `clock`.
    pub fn codec(mut self, codec: Arc<TokenCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Sets the clock used when the codec is built from configuration.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the account store.
    pub fn users(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    /// Builds the AppState.
    ///
    /// Fails when the codec has to be built and no secret is available while
    /// one is required.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let codec = match self.codec {
            Some(codec) => codec,
            None => {
                let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
                let codec = TokenCodec::new(&config.jwt, clock)
                    .map_err(|e| ApiError::internal(e.to_string()))?;
                Arc::new(codec)
            }
        };

        let users = self
            .users
            .unwrap_or_else(|| Arc::new(InMemoryUserStore::new()));

        Ok(AppState {
            config: Arc::new(config),
            codec,
            users,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(state: &AppState) -> Self {
        state.codec.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn UserStore> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{IdentityClaims, JwtConfig, ManualClock, Role};

    #[tokio::test]
    async fn test_builder_defaults() {
        let state = AppState::builder().build().unwrap();
        assert_eq!(state.config.port, 5000);
        assert!(state.users().list().await.unwrap().is_empty());
    }

    #[test]
    fn test_builder_uses_clock() {
        let clock = Arc::new(ManualClock::starting_now());
        let state = AppState::builder()
            .config(ApiConfig::default().with_jwt(JwtConfig::new("state-secret")))
            .clock(clock.clone())
            .build()
            .unwrap();

        let token = state.codec().issue(&IdentityClaims::new(1, Role::Admin)).unwrap();
        let claims = state.codec().verify(&token).unwrap();
        assert_eq!(claims.iat, clock.now().timestamp());
    }

    #[test]
    fn test_builder_fails_without_required_secret() {
        let config = ApiConfig::default().with_jwt(JwtConfig::default().with_require_secret(true));
        assert!(AppState::builder().config(config).build().is_err());
    }
}
