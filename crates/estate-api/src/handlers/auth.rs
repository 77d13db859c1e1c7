// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{CurrentIdentity, ValidatedJson};
use crate::response::{ApiResponse, LoginResponse};
use crate::state::AppState;
use crate::store::{verify_password, verify_password_decoy};

/// Message for unknown email or wrong password. The two are not distinguished.
const MSG_BAD_CREDENTIALS: &str = "Invalid email or password";

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    #[serde(rename = "Email", alias = "email", default)]
    pub email: String,
    /// Password.
    #[serde(rename = "Password", alias = "password", default)]
    pub password: String,
}

/// POST /api/auth/login
///
/// Checks credentials against the account store and returns a bearer token
/// together with the profile fields the client caches.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let Some(account) = state.users().find_by_email(email).await? else {
        verify_password_decoy(request.password).await?;
        tracing::debug!("Login failed: unknown account");
        return Err(ApiError::unauthorized(MSG_BAD_CREDENTIALS));
    };

    let valid = verify_password(request.password, account.password_hash.clone()).await?;
    if !valid {
        tracing::debug!(user_id = account.user_id, "Login failed: wrong password");
        return Err(ApiError::unauthorized(MSG_BAD_CREDENTIALS));
    }

    if !account.is_active() {
        tracing::info!(user_id = account.user_id, status = %account.status, "Login refused: account not active");
        return Err(ApiError::forbidden("Account is not active"));
    }

    let claims = account.identity_claims();
    let token = state.codec().issue(&claims)?;

    tracing::info!(user_id = account.user_id, role = %claims.role, "User logged in");

    Ok(Json(LoginResponse {
        access_token: token,
        full_name: account.full_name,
        email: account.email,
        role: claims.role,
        role_id: claims.role_id.unwrap_or_else(|| claims.role.id()),
        phone: account.phone,
        national_id: account.national_id,
        user_id: account.user_id,
    }))
}

// =============================================================================
// Current identity
// =============================================================================

/// GET /api/auth/me
///
/// Returns the identity carried by the caller's token.
pub async fn me(CurrentIdentity(ctx): CurrentIdentity) -> impl IntoResponse {
    ApiResponse::success(ctx)
}
