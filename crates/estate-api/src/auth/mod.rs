// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization core.
//!
//! This module provides:
//! - Bearer token issuance and verification
//! - Role normalization
//! - The per-request identity context

mod claims;
mod clock;
mod codec;
mod context;
mod role;

pub use claims::{IdentityClaims, SubjectId, TokenClaims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{JwtConfig, TokenCodec, TokenError, DEFAULT_TOKEN_TTL_DAYS, FALLBACK_SECRET};
pub use context::IdentityContext;
pub use role::{derive_resident_id, normalize_role, role_from_id, Role};
