// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`AuthMiddleware`]: bearer token authentication
//! - [`RoleGuard`]: role-based access control, layered inside authentication

mod auth;
mod guard;

pub use auth::{authenticate, AuthLayer, AuthMiddleware};
pub use guard::{
    authorize, require_admin, require_admin_or_security, require_role, RoleGuard, RoleGuardLayer,
};
