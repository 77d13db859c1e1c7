// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-api
//!
//! Authentication and authorization core for the estate access service.
//!
//! This crate provides bearer token issuance and verification, role
//! normalization, the authentication and role-guard middleware, and the HTTP
//! server that hosts the login and roster endpoints.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use estate_api::{ApiConfig, ApiServer, InMemoryUserStore, JwtConfig};
//!
//! let config = ApiConfig::default().with_jwt(JwtConfig::new("secret"));
//! let server = ApiServer::builder()
//!     .config(config)
//!     .users(Arc::new(InMemoryUserStore::new()))
//!     .build()?;
//! server.run().await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;
pub mod store;

pub use auth::{
    IdentityClaims, IdentityContext, JwtConfig, Role, SubjectId, TokenClaims, TokenCodec,
    TokenError,
};
pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult, AuthError};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::AppState;
pub use store::{Account, InMemoryUserStore, StoreError, UserStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
