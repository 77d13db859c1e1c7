// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account roster handlers. Routed behind role guards.

use axum::{extract::State, response::IntoResponse};

use crate::auth::Role;
use crate::error::ApiResult;
use crate::extractors::CurrentIdentity;
use crate::response::{ApiResponse, ResponseMeta};
use crate::state::AppState;

/// GET /api/users
///
/// All accounts, without password hashes.
pub async fn list_users(
    State(state): State<AppState>,
    CurrentIdentity(ctx): CurrentIdentity,
) -> ApiResult<impl IntoResponse> {
    let accounts = state.users().list().await?;
    tracing::debug!(request_id = %ctx.request_id, count = accounts.len(), "Listing accounts");

    let total = accounts.len();
    Ok(ApiResponse::success(accounts).with_meta(ResponseMeta::total(total)))
}

/// GET /api/residents
///
/// Accounts whose resolved role is resident.
pub async fn list_residents(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let residents: Vec<_> = state
        .users()
        .list()
        .await?
        .into_iter()
        .filter(|a| a.role() == Role::Resident)
        .collect();

    let total = residents.len();
    Ok(ApiResponse::success(residents).with_meta(ResponseMeta::total(total)))
}
