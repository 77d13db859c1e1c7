// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! [`TestApp`] wires the fixture store and a manual clock into a real
//! [`ApiServer`] router and drives it in-process.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use estate_api::auth::{ManualClock, TokenCodec};
use estate_api::{ApiConfig, ApiServer, UserStore};
use serde_json::Value;
use tower::ServiceExt;

use super::fixtures::{AccountFixtures, CodecFixtures, TEST_PASSWORD};
use super::init_test_logging;

/// Upper bound on response bodies read by the harness.
const BODY_LIMIT: usize = 1024 * 1024;

/// An in-process application with a controllable clock.
pub struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
    codec: Arc<TokenCodec>,
}

impl TestApp {
    /// Builds an app over the fixture accounts.
    pub fn new() -> Self {
        Self::with_store(Arc::new(AccountFixtures::store()))
    }

    /// Builds an app over `users`.
    pub fn with_store(users: Arc<dyn UserStore>) -> Self {
        init_test_logging();

        let config = ApiConfig::default().with_jwt(CodecFixtures::config());
        let clock = CodecFixtures::clock();
        let codec = Arc::new(CodecFixtures::codec_with(&config.jwt, clock.clone()));

        let server = ApiServer::builder()
            .config(config)
            .codec(codec.clone())
            .users(users)
            .build()
            .expect("build test server");

        Self {
            router: server.router(),
            clock,
            codec,
        }
    }

    /// The codec the server signs and verifies with.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Moves the server clock forward.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Sends `request` and returns the status and JSON body (`Null` if empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }

    /// Sends a GET, with a bearer token when given.
    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).expect("request"))
            .await
    }

    /// Posts a login body.
    pub async fn login(&self, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    /// Logs in as `email` with the fixture password and returns the token.
    pub async fn login_token(&self, email: &str) -> String {
        let (status, body) = self
            .login(serde_json::json!({ "Email": email, "Password": TEST_PASSWORD }))
            .await;
        assert_eq!(status, StatusCode::OK, "login as {email} failed: {body}");
        body["accessToken"]
            .as_str()
            .expect("accessToken in login response")
            .to_string()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
