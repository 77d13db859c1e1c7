// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Estate Integration Tests
//!
//! Shared fixtures and a request harness for the integration suites.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p estate-tests
//!
//! # Run a single suite
//! cargo test -p estate-tests --test integration_token
//! cargo test -p estate-tests --test integration_http
//! ```
//!
//! ## Test Categories
//!
//! ### Token Tests (`integration_token.rs`)
//! - Issue/verify round trip and the 14-day window
//! - Tampering, wrong secrets and malformed input
//! - Role normalization at the token boundary
//!
//! ### HTTP Tests (`integration_http.rs`)
//! - Login contract and credential failures
//! - Authentication middleware outcomes
//! - Role guard decisions on the roster routes
//!
//! ```rust,ignore
//! use estate_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new().await;
//!     let token = app.login_token(AccountFixtures::ADMIN_EMAIL).await;
//!     let (status, body) = app.get("/api/users", Some(&token)).await;
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::init_test_logging;
}
