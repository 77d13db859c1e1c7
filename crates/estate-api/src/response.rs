// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::Role;

// =============================================================================
// ApiResponse
// =============================================================================

/// Success envelope for data endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`; failures go through [`ApiError`](crate::error::ApiError).
    pub success: bool,
    /// Response data.
    pub data: T,
    /// Additional metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response with data.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    /// Adds metadata to the response.
    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Total number of items.
    pub total: usize,
}

impl ResponseMeta {
    /// Metadata for a list of `total` items.
    pub fn total(total: usize) -> Self {
        Self { total }
    }
}

// =============================================================================
// Health
// =============================================================================

/// Liveness response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Service version.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

// =============================================================================
// Login
// =============================================================================

/// Body returned by a successful login.
///
/// The browser client stores these fields verbatim, so names are fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// Display name.
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    /// Email.
    pub email: String,
    /// Normalized role.
    pub role: Role,
    /// Numeric role id.
    #[serde(rename = "roleId")]
    pub role_id: i32,
    /// Phone number.
    pub phone: Option<String>,
    /// National identity number.
    #[serde(rename = "NationalID")]
    pub national_id: Option<String>,
    /// Account id.
    #[serde(rename = "userId")]
    pub user_id: i64,
}
