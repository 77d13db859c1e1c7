// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: liveness
//! - [`login`], [`me`]: authentication
//! - [`list_users`], [`list_residents`]: role-guarded rosters

mod auth;
mod health;
mod users;

pub use auth::*;
pub use health::*;
pub use users::*;
